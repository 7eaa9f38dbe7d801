//! # Scene Management Module
//!
//! Node hierarchy, transforms, lights and the GPU-side mesh data that the
//! render engine draws.
//!
//! ## Key Components
//!
//! - [`Scene`] - owns the node graph, geometries, materials, textures and camera
//! - [`SceneGraph`] - arena of [`Node`]s addressed by [`NodeId`]
//! - [`Transform`] - position, Euler rotation and scale of a node
//! - [`Light`] - directional, ambient and point lights
//! - [`Vertex3D`] - vertex layout shared by every geometry
//!
//! ## Usage
//!
//! ```
//! use pinwheel::gfx::camera::{Camera, Projection};
//! use pinwheel::gfx::geometry::generate_box;
//! use pinwheel::gfx::scene::{Scene, Transform};
//! use pinwheel::gfx::resources::Material;
//! use pinwheel::gfx::color::Color;
//!
//! let camera = Camera::new(Projection::perspective(cgmath::Deg(50.0), 1.0, 0.1, 100.0));
//! let mut scene = Scene::new(camera);
//! let cube = scene.add_geometry("cube", &generate_box(0.6, 0.6, 0.6));
//! scene.add_material(Material::new("blue", Color::from_hex(0x4550DE)));
//!
//! let root = scene.root();
//! scene.add_mesh(root, "cube", cube, "blue", Transform::from_position(1.0, 0.0, 0.0));
//! assert_eq!(scene.meshes().count(), 1);
//! ```

pub mod graph;
pub mod light;
pub mod mesh;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod vertex;

// Re-export main types
pub use graph::{Node, NodeId, NodeKind, SceneGraph};
pub use light::{Light, LightSet};
pub use mesh::{DrawGeometry, Geometry, GeometryId};
pub use scene::{Scene, SceneStatistics};
pub use transform::Transform;
pub use vertex::Vertex3D;
