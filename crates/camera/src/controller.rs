use crate::camera::Camera;
use glam::Vec2;

/// Simulation step duration in seconds (60 Hz).
pub const FIXED_STEP: f64 = 1.0 / 60.0;
/// Displacement per axis per fixed step, in world units.
pub const STEP_DISTANCE: f32 = 0.1;
/// Yaw/pitch degrees applied per pixel of mouse delta.
pub const LOOK_SENSITIVITY: f32 = 0.05;
/// Target-distance change per unit of wheel delta.
pub const ZOOM_SENSITIVITY: f32 = 2.0;

/// Per-frame immutable read of the input relevant to the camera.
///
/// Produced fresh each frame by the input layer; never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Mouse movement since the previous frame, in pixels.
    pub mouse_delta: Vec2,
    /// Scroll wheel movement since the previous frame.
    pub wheel_delta: f32,
}

impl InputSnapshot {
    /// Signed per-step displacement along the camera's forward/right axes.
    fn step_axes(&self) -> (f32, f32) {
        fn axis(positive: bool, negative: bool) -> f32 {
            f32::from(i8::from(positive) - i8::from(negative)) * STEP_DISTANCE
        }
        (axis(self.forward, self.back), axis(self.right, self.left))
    }
}

/// Real-time camera loop: fixed-rate discrete movement decoupled from
/// per-frame continuous look/zoom.
///
/// The accumulator is an explicit field so multiple independent instances
/// can exist and tests stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct CameraLoop {
    accumulator: f64,
}

impl CameraLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconsumed simulated time in seconds. Always in `[0, FIXED_STEP)`
    /// after a call to [`tick`](Self::tick).
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Advance the camera by `elapsed` wall-clock seconds of input.
    ///
    /// Drains the accumulator in `FIXED_STEP` increments, applying one
    /// discrete movement update per step from the boolean axes only. Then
    /// applies exactly one continuous look/zoom update from the mouse and
    /// wheel deltas, regardless of how many steps were drained.
    ///
    /// `elapsed` must be finite and non-negative; the caller guarantees a
    /// monotonic wall-clock source and well-formed deltas.
    pub fn tick(&mut self, camera: &mut Camera, elapsed: f64, input: &InputSnapshot) {
        debug_assert!(elapsed.is_finite() && elapsed >= 0.0);

        self.accumulator += elapsed;
        while self.accumulator >= FIXED_STEP {
            self.accumulator -= FIXED_STEP;
            let (forward, right) = input.step_axes();
            camera.move_relative(forward, right);
        }

        camera.rotate(
            input.mouse_delta.x * LOOK_SENSITIVITY,
            input.mouse_delta.y * LOOK_SENSITIVITY,
        );
        camera.move_to_target(input.wheel_delta * ZOOM_SENSITIVITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn forward_input() -> InputSnapshot {
        InputSnapshot {
            forward: true,
            ..InputSnapshot::default()
        }
    }

    #[test]
    fn exact_step_applies_one_move() {
        let mut camera = Camera::default();
        let mut cam_loop = CameraLoop::new();
        let start = camera.position;

        cam_loop.tick(&mut camera, FIXED_STEP, &forward_input());

        // Default camera looks down -Z, so one step moves 0.1 forward.
        let expected = start + Vec3::new(0.0, 0.0, -STEP_DISTANCE);
        assert!((camera.position - expected).length() < 1e-6);
        assert_eq!(cam_loop.accumulator(), 0.0);
    }

    #[test]
    fn two_half_steps_apply_one_move_total() {
        let mut camera = Camera::default();
        let mut cam_loop = CameraLoop::new();
        let start = camera.position;

        cam_loop.tick(&mut camera, FIXED_STEP / 2.0, &forward_input());
        assert_eq!(camera.position, start);

        cam_loop.tick(&mut camera, FIXED_STEP / 2.0, &forward_input());
        let moved = (camera.position - start).length();
        assert!((moved - STEP_DISTANCE).abs() < 1e-6);
        assert_eq!(cam_loop.accumulator(), 0.0);
    }

    #[test]
    fn accumulator_always_below_fixed_step() {
        let mut camera = Camera::default();
        let mut cam_loop = CameraLoop::new();

        for elapsed in [0.0, 0.001, 0.016, 0.3, 1.0 / 144.0, 0.25, 5.0] {
            cam_loop.tick(&mut camera, elapsed, &InputSnapshot::default());
            assert!(cam_loop.accumulator() >= 0.0);
            assert!(cam_loop.accumulator() < FIXED_STEP);
        }
    }

    #[test]
    fn displacement_counts_whole_steps_only() {
        let mut camera = Camera::default();
        let mut cam_loop = CameraLoop::new();
        let start = camera.position;

        // 150 frames at 240 fps = 0.625 s = 37.5 fixed steps.
        for _ in 0..150 {
            cam_loop.tick(&mut camera, 1.0 / 240.0, &forward_input());
        }

        let moved = (camera.position - start).length();
        assert!((moved - 37.0 * STEP_DISTANCE).abs() < 1e-4);
    }

    #[test]
    fn movement_is_frame_rate_independent() {
        let input = forward_input();

        let mut fast = Camera::default();
        let mut fast_loop = CameraLoop::new();
        for _ in 0..240 {
            fast_loop.tick(&mut fast, 1.0 / 240.0, &input);
        }

        let mut slow = Camera::default();
        let mut slow_loop = CameraLoop::new();
        for _ in 0..30 {
            slow_loop.tick(&mut slow, 1.0 / 30.0, &input);
        }

        // Same wall-clock second of held input, same distance covered.
        assert!((fast.position - slow.position).length() < 1e-4);
    }

    #[test]
    fn look_applies_once_per_tick_regardless_of_steps() {
        let input = InputSnapshot {
            mouse_delta: Vec2::new(40.0, 0.0),
            ..InputSnapshot::default()
        };

        // Drains 10 steps in one call.
        let mut many_steps = Camera::default();
        CameraLoop::new().tick(&mut many_steps, 10.0 * FIXED_STEP, &input);

        // Drains none.
        let mut no_steps = Camera::default();
        CameraLoop::new().tick(&mut no_steps, 0.0, &input);

        assert!((many_steps.forward() - no_steps.forward()).length() < 1e-6);

        // 40 px * 0.05 deg/px = 2 degrees of yaw.
        let expected = 2.0_f32.to_radians();
        let actual = no_steps.forward().angle_between(Camera::default().forward());
        assert!((actual - expected).abs() < 1e-4);
    }

    #[test]
    fn wheel_zooms_by_twice_the_delta() {
        let mut camera = Camera::default();
        let before = camera.position.distance(camera.target);

        let input = InputSnapshot {
            wheel_delta: 1.5,
            ..InputSnapshot::default()
        };
        CameraLoop::new().tick(&mut camera, 0.0, &input);

        let after = camera.position.distance(camera.target);
        assert!((after - before - 1.5 * ZOOM_SENSITIVITY).abs() < 1e-5);
    }

    #[test]
    fn strafe_axes_cancel() {
        let mut camera = Camera::default();
        let start = camera.position;
        let input = InputSnapshot {
            left: true,
            right: true,
            forward: true,
            back: true,
            ..InputSnapshot::default()
        };
        CameraLoop::new().tick(&mut camera, FIXED_STEP * 4.0, &input);
        assert!((camera.position - start).length() < 1e-6);
    }

    #[test]
    fn reset_clears_accumulator() {
        let mut camera = Camera::default();
        let mut cam_loop = CameraLoop::new();
        cam_loop.tick(&mut camera, 0.01, &InputSnapshot::default());
        assert!(cam_loop.accumulator() > 0.0);
        cam_loop.reset();
        assert_eq!(cam_loop.accumulator(), 0.0);
    }
}
