//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes the demo scenes are assembled from, so no
//! model files are needed. All generators follow a Y-up convention.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned box with independent width, height and depth
//! - **Sphere**: UV sphere, optionally restricted to a φ/θ window
//! - **Cylinder**: Y-aligned cylinder or cone frustum, optionally a partial
//!   sector around the axis
//!
//! ## Usage
//!
//! ```rust
//! use pinwheel::gfx::geometry::{generate_box, generate_cylinder, CylinderParams};
//!
//! let cube = generate_box(0.6, 0.6, 0.6);
//! let pipe = generate_cylinder(&CylinderParams::new(0.12, 0.12, 2.2, 30));
//! assert_eq!(cube.triangle_count(), 12);
//! assert!(pipe.vertex_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions, normals and texture coordinates into the
    /// vertex layout consumed by the render pipeline.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}
