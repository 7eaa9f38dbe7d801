//! # Pinwheel Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use pinwheel::prelude::*;
//! ```
//!
//! ```no_run
//! use pinwheel::prelude::*;
//!
//! fn main() -> pinwheel::Result<()> {
//!     let config = AppConfig::default().with_title("Spinner");
//!     let camera = Camera::new(Projection::perspective(Deg(50.0), config.aspect(), 0.1, 100.0))
//!         .with_position(0.0, 2.0, 6.0);
//!
//!     let mut scene = Scene::new(camera);
//!     let cube = scene.add_geometry("cube", &generate_box(1.0, 1.0, 1.0));
//!     scene.add_material(Material::new("red", Color::from_hex(0xE04040)));
//!     let root = scene.root();
//!     let node = scene.add_mesh(root, "cube", cube, "red", Transform::default());
//!     scene.add_light(root, "sun", Light::directional(Color::WHITE, 1.0, Vector3::new(1.0, 1.0, 1.0)), Transform::default());
//!
//!     let stage = Stage::new(scene).with_animated(Spin::around_y(node, 0.01));
//!     PinwheelApp::new(config, stage)?.run()
//! }
//! ```

// Re-export core application types
pub use crate::animation::{Animated, FrameLoop, Spin, Stage};
pub use crate::app::PinwheelApp;
pub use crate::config::AppConfig;
pub use crate::error::PinwheelError;

// Re-export graphics and scene types
pub use crate::gfx::camera::{Camera, OrbitControls, Projection};
pub use crate::gfx::color::Color;
pub use crate::gfx::geometry::{
    generate_box, generate_cylinder, generate_sphere, CylinderParams, GeometryData, SphereParams,
};
pub use crate::gfx::resources::{Material, TextureData, TextureLoader};
pub use crate::gfx::scene::{Light, NodeId, Scene, SceneGraph, Transform};

// Re-export the demo scenes
pub use crate::scenes::{BoxField, BoxFieldConfig, Fan, FanConfig, FanField, FanFieldConfig};

// Re-export common external dependencies
pub use cgmath::{Deg, Vector3};
