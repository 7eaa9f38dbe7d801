//! # Graphics Module
//!
//! Everything needed to put a [`Scene`] on screen: cameras and orbit
//! controls, procedural geometry, materials and textures, the scene graph and
//! the wgpu render engine.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Perspective/orthographic cameras and orbit controls
//! - **Geometry** ([`geometry`]) - Box, sphere and cylinder generators
//! - **Rendering Pipeline** ([`rendering`]) - Blinn-Phong forward renderer
//! - **Scene Management** ([`scene`]) - Node arena, lights and meshes
//! - **Resource Management** ([`resources`]) - Materials, textures and global uniforms
//!
//! ## Usage
//!
//! ```no_run
//! use pinwheel::gfx::{RenderEngine, scene::Scene};
//!
//! // The render engine is created by PinwheelApp once the window exists
//! // let render_engine = RenderEngine::new(window, width, height, true).await?;
//! ```
//!
//! [`Scene`]: scene::Scene

pub mod camera;
pub mod color;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{Camera, OrbitControls, Projection};
pub use color::Color;
pub use rendering::render_engine::RenderEngine;
