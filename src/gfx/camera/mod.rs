pub mod camera_utils;
pub mod orbit_controls;

// Re-export main types
pub use camera_utils::{Camera, CameraUniform, Projection};
pub use orbit_controls::OrbitControls;
