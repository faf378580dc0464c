//! Desktop input: raw winit key/mouse state reduced to per-frame camera
//! snapshots and discrete host actions.
//!
//! # Invariants
//! - Mouse and wheel deltas are drained exactly once per frame.
//! - The camera loop only ever sees an [`InputSnapshot`], never raw events.

pub mod state;

pub use state::{HostAction, InputState, action_for_key};

pub fn crate_info() -> &'static str {
    "walkabout-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
