use glam::Vec2;
use std::collections::HashSet;
use walkabout_camera::{CameraMode, InputSnapshot};
use winit::keyboard::KeyCode;

/// A discrete host-level action triggered by a key press.
///
/// The host consumes these; none of them reach the camera loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    TogglePause,
    ToggleConsole,
    ToggleFullscreen,
    SetMode(CameraMode),
    ToggleProjection,
    Quit,
}

/// Map a pressed key to a host action, if it is bound to one.
pub fn action_for_key(key: KeyCode, ctrl_held: bool) -> Option<HostAction> {
    match key {
        KeyCode::Escape => Some(HostAction::TogglePause),
        KeyCode::Backquote => Some(HostAction::ToggleConsole),
        KeyCode::F11 => Some(HostAction::ToggleFullscreen),
        KeyCode::Digit1 => Some(HostAction::SetMode(CameraMode::Free)),
        KeyCode::Digit2 => Some(HostAction::SetMode(CameraMode::FirstPerson)),
        KeyCode::Digit3 => Some(HostAction::SetMode(CameraMode::ThirdPerson)),
        KeyCode::Digit4 => Some(HostAction::SetMode(CameraMode::Orbital)),
        KeyCode::KeyP => Some(HostAction::ToggleProjection),
        KeyCode::KeyQ if ctrl_held => Some(HostAction::Quit),
        _ => None,
    }
}

/// Accumulates raw input between frames and produces one immutable
/// [`InputSnapshot`] per frame.
#[derive(Debug, Default)]
pub struct InputState {
    keys_held: HashSet<KeyCode>,
    mouse_delta: Vec2,
    wheel_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_event(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn ctrl_held(&self) -> bool {
        self.is_held(KeyCode::ControlLeft) || self.is_held(KeyCode::ControlRight)
    }

    /// Drop all held keys. Called on focus loss so keys released while the
    /// window was unfocused don't stick.
    pub fn clear_held(&mut self) {
        if !self.keys_held.is_empty() {
            tracing::debug!(count = self.keys_held.len(), "clearing held keys");
            self.keys_held.clear();
        }
    }

    pub fn accumulate_mouse(&mut self, delta: (f64, f64)) {
        self.mouse_delta += Vec2::new(delta.0 as f32, delta.1 as f32);
    }

    pub fn accumulate_wheel(&mut self, delta: f32) {
        self.wheel_delta += delta;
    }

    /// Produce this frame's snapshot and drain the accumulated deltas.
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        InputSnapshot {
            forward: self.is_held(KeyCode::KeyW) || self.is_held(KeyCode::ArrowUp),
            back: self.is_held(KeyCode::KeyS) || self.is_held(KeyCode::ArrowDown),
            left: self.is_held(KeyCode::KeyA) || self.is_held(KeyCode::ArrowLeft),
            right: self.is_held(KeyCode::KeyD) || self.is_held(KeyCode::ArrowRight),
            mouse_delta: std::mem::take(&mut self.mouse_delta),
            wheel_delta: std::mem::take(&mut self.wheel_delta),
        }
    }

    /// Drain accumulated deltas without producing a snapshot. Used while
    /// paused so stale motion doesn't land on resume.
    pub fn discard_deltas(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.wheel_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_both_map() {
        let mut input = InputState::new();
        input.key_event(KeyCode::KeyW, true);
        assert!(input.take_snapshot().forward);

        let mut input = InputState::new();
        input.key_event(KeyCode::ArrowUp, true);
        assert!(input.take_snapshot().forward);
    }

    #[test]
    fn release_stops_axis() {
        let mut input = InputState::new();
        input.key_event(KeyCode::KeyA, true);
        assert!(input.take_snapshot().left);
        input.key_event(KeyCode::KeyA, false);
        assert!(!input.take_snapshot().left);
    }

    #[test]
    fn snapshot_drains_deltas() {
        let mut input = InputState::new();
        input.accumulate_mouse((3.0, -2.0));
        input.accumulate_mouse((1.0, 1.0));
        input.accumulate_wheel(0.5);

        let first = input.take_snapshot();
        assert_eq!(first.mouse_delta, Vec2::new(4.0, -1.0));
        assert_eq!(first.wheel_delta, 0.5);

        let second = input.take_snapshot();
        assert_eq!(second.mouse_delta, Vec2::ZERO);
        assert_eq!(second.wheel_delta, 0.0);
    }

    #[test]
    fn discard_deltas_keeps_held_keys() {
        let mut input = InputState::new();
        input.key_event(KeyCode::KeyD, true);
        input.accumulate_mouse((10.0, 10.0));
        input.discard_deltas();

        let snapshot = input.take_snapshot();
        assert!(snapshot.right);
        assert_eq!(snapshot.mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn clear_held_releases_everything() {
        let mut input = InputState::new();
        input.key_event(KeyCode::KeyW, true);
        input.key_event(KeyCode::ControlLeft, true);
        input.clear_held();
        assert!(!input.ctrl_held());
        assert!(!input.take_snapshot().forward);
    }

    #[test]
    fn quit_requires_ctrl() {
        assert_eq!(action_for_key(KeyCode::KeyQ, false), None);
        assert_eq!(action_for_key(KeyCode::KeyQ, true), Some(HostAction::Quit));
    }

    #[test]
    fn mode_keys_map_in_order() {
        assert_eq!(
            action_for_key(KeyCode::Digit1, false),
            Some(HostAction::SetMode(CameraMode::Free))
        );
        assert_eq!(
            action_for_key(KeyCode::Digit4, false),
            Some(HostAction::SetMode(CameraMode::Orbital))
        );
    }

    #[test]
    fn unbound_keys_are_none() {
        assert_eq!(action_for_key(KeyCode::KeyZ, false), None);
    }
}
