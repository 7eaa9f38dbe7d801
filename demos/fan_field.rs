//! # Fan Field Demo
//!
//! Three desk fans with spinning blades and swinging heads. The blade
//! texture is loaded first; the scene is only built once it has arrived.
//!
//! ## Usage:
//! ```bash
//! cargo run --example fan_field
//! ```
//!
//! Drag with the left button to orbit, shift-drag or right-drag to pan,
//! scroll to zoom. Escape quits.

use pinwheel::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::default()
        .with_title("Pinwheel - fan field")
        .with_env_overrides();

    let scene_config = FanFieldConfig::default();
    let texture_path =
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(&scene_config.texture_path);
    let scene_config = scene_config.with_texture_path(texture_path);

    let field = pollster::block_on(FanField::load(scene_config, config.aspect()))?;

    PinwheelApp::new(config, field.into())?.run()?;
    Ok(())
}
