//! # Box Field Demo
//!
//! One hundred cubes in two groups turning in opposite directions around a
//! slowly tumbling point light.
//!
//! ## Usage:
//! ```bash
//! cargo run --example box_field
//! PINWHEEL_SEED=7 RUST_LOG=debug cargo run --example box_field
//! ```
//!
//! Drag with the left button to orbit, shift-drag or right-drag to pan,
//! scroll to dolly. Escape quits.

use anyhow::Context;
use pinwheel::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

const SEED_ENV: &str = "PINWHEEL_SEED";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut rng = match std::env::var(SEED_ENV) {
        Ok(seed) => {
            let seed = seed
                .trim()
                .parse()
                .with_context(|| format!("{SEED_ENV} must be an unsigned integer"))?;
            log::info!("Seeding the box field with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        Err(_) => StdRng::from_os_rng(),
    };

    let config = AppConfig::default()
        .with_title("Pinwheel - box field")
        .with_env_overrides();
    let field = BoxField::build(BoxFieldConfig::default(), config.aspect(), &mut rng)?;

    PinwheelApp::new(config, field.into())?.run()?;
    Ok(())
}
