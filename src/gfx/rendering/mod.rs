//! Rendering: the wgpu render engine, its pipeline cache and the Phong shader

pub mod pipeline_manager;
pub mod render_engine;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{RenderEngine, SceneLayouts};
