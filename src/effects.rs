//! Per-clip adjustments derived from a placed timeline: motion compensation for rotated or
//! mismatched footage, speed remapping and music bed placement.

pub mod motion;
pub mod music;
pub mod remap;

pub use motion::MotionParams;
pub use music::MusicPlacement;
pub use remap::{Keyframe, SpeedRemap};

/// Render a display value rounded to two decimals (`177.78`, `100`, `50`).
pub fn two_decimals(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    format!("{rounded}")
}
