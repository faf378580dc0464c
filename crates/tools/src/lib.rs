//! Developer tooling: camera status reporting for the HUD and frame-time
//! statistics.

pub mod report;
pub mod stats;

pub use report::CameraReport;
pub use stats::FrameStats;

pub fn crate_info() -> &'static str {
    "walkabout-tools v0.1.0"
}
