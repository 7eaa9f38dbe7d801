//! The two demo scenes
//!
//! Each scene is built into a [`Scene`](crate::gfx::scene::Scene) plus handles
//! to the nodes it animates, and converts into a [`Stage`](crate::animation::Stage)
//! that [`PinwheelApp`](crate::app::PinwheelApp) can run.

pub mod box_field;
pub mod fan;
pub mod fan_field;

pub use box_field::{BoxField, BoxFieldConfig};
pub use fan::{Fan, FanConfig};
pub use fan_field::{FanField, FanFieldConfig};
