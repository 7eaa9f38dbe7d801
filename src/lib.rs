//! Pinwheel
//!
//! Two small animated 3D scenes, a rotating cube field and a row of desk
//! fans, on a compact wgpu/winit scene graph.

pub mod animation;
pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod scenes;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::PinwheelApp;
pub use error::{PinwheelError, Result};
