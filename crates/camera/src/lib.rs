//! First-person camera: data model, motion primitives, and the real-time
//! update loop.
//!
//! # Invariants
//! - The up vector stays non-parallel to the view direction (pitch is
//!   clamped short of the up axis).
//! - The loop's time accumulator is always in `[0, FIXED_STEP)` after a tick.
//! - Discrete movement advances at a fixed 60 Hz rate regardless of render
//!   frame rate; look/zoom apply once per rendered frame.

pub mod camera;
pub mod controller;

pub use camera::{Camera, CameraMode, Projection};
pub use controller::{
    CameraLoop, FIXED_STEP, InputSnapshot, LOOK_SENSITIVITY, STEP_DISTANCE, ZOOM_SENSITIVITY,
};

pub fn crate_info() -> &'static str {
    "walkabout-camera v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("camera"));
    }
}
