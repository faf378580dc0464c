use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Near clip plane distance.
const NEAR_PLANE: f32 = 0.1;
/// Far clip plane distance.
const FAR_PLANE: f32 = 1000.0;
/// Pitch stops this many radians short of the up axis.
const PITCH_MARGIN: f32 = 0.001;
/// Zoom never brings the eye closer to the target than this.
const MIN_TARGET_DISTANCE: f32 = 0.001;

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    Perspective,
    Orthographic,
}

impl Projection {
    pub fn label(self) -> &'static str {
        match self {
            Projection::Perspective => "PERSPECTIVE",
            Projection::Orthographic => "ORTHOGRAPHIC",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Projection::Perspective => Projection::Orthographic,
            Projection::Orthographic => Projection::Perspective,
        }
    }
}

/// Presentation-level camera mode. Selected with keys 1-4; the update path
/// is mode-independent, only the HUD and the player marker read this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    Free,
    FirstPerson,
    ThirdPerson,
    Orbital,
}

impl CameraMode {
    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Free => "FREE",
            CameraMode::FirstPerson => "FIRST_PERSON",
            CameraMode::ThirdPerson => "THIRD_PERSON",
            CameraMode::Orbital => "ORBITAL",
        }
    }
}

/// Free-flying/first-person camera state.
///
/// Mutated only through the motion primitives below and the
/// [`CameraLoop`](crate::CameraLoop) update step. The up vector must remain
/// non-parallel to the view direction; `rotate` preserves this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Look-at point in world space.
    pub target: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Vertical field of view in degrees. For orthographic projection this
    /// is the vertical extent of the view volume.
    pub fovy: f32,
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 4.0),
            target: Vec3::new(0.0, 2.0, 0.0),
            up: Vec3::Y,
            fovy: 90.0,
            projection: Projection::Perspective,
        }
    }
}

impl Camera {
    /// Normalized view direction.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Normalized right axis.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up.normalize()).normalize()
    }

    /// Translate along the camera's forward/right axes projected onto the
    /// world plane (no vertical component). Moves position and target
    /// together, preserving orientation. First-person ground movement.
    pub fn move_relative(&mut self, forward: f32, right: f32) {
        let fwd_dir = self.forward();
        let rgt_dir = self.right();
        let fwd = Vec3::new(fwd_dir.x, 0.0, fwd_dir.z).normalize_or_zero();
        let rgt = Vec3::new(rgt_dir.x, 0.0, rgt_dir.z).normalize_or_zero();
        let delta = fwd * forward + rgt * right;
        self.position += delta;
        self.target += delta;
    }

    /// Rotate the view direction: yaw about the up axis, pitch about the
    /// camera right axis. Positive yaw looks right, positive pitch looks
    /// down (mouse-delta convention). Pitch is clamped so the view never
    /// reaches the up axis.
    pub fn rotate(&mut self, yaw_degrees: f32, pitch_degrees: f32) {
        let up = self.up.normalize();
        let mut view = self.target - self.position;

        let max_up = up.angle_between(view) - PITCH_MARGIN;
        let max_down = -((-up).angle_between(view)) + PITCH_MARGIN;
        let pitch = (-pitch_degrees.to_radians()).clamp(max_down, max_up);

        let right = view.normalize().cross(up).normalize();
        view = Quat::from_axis_angle(right, pitch) * view;
        view = Quat::from_axis_angle(up, -yaw_degrees.to_radians()) * view;

        self.target = self.position + view;
    }

    /// Change the eye-to-target distance by `delta`, clamped to a small
    /// positive minimum. Positive delta moves the eye away from the target.
    pub fn move_to_target(&mut self, delta: f32) {
        let distance = (self.position.distance(self.target) + delta).max(MIN_TARGET_DISTANCE);
        self.position = self.target - self.forward() * distance;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(self.fovy.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
            }
            Projection::Orthographic => {
                let half_height = self.fovy / 2.0;
                let half_width = half_height * aspect;
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    NEAR_PLANE,
                    FAR_PLANE,
                )
            }
        }
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_looks_down_negative_z() {
        let camera = Camera::default();
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn move_relative_stays_in_world_plane() {
        let mut camera = Camera::default();
        // Pitch the view down first so forward has a vertical component.
        camera.rotate(0.0, 30.0);
        let y_before = camera.position.y;
        camera.move_relative(1.0, 0.5);
        assert_eq!(camera.position.y, y_before);
    }

    #[test]
    fn move_relative_preserves_orientation() {
        let mut camera = Camera::default();
        let view_before = camera.target - camera.position;
        camera.move_relative(0.3, -0.7);
        let view_after = camera.target - camera.position;
        assert!((view_before - view_after).length() < 1e-6);
    }

    #[test]
    fn yaw_right_turns_view_right() {
        let mut camera = Camera::default();
        camera.rotate(90.0, 0.0);
        // Looking down -Z with +X to the right, a 90 degree right turn
        // faces +X.
        assert!((camera.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped_short_of_up_axis() {
        let mut camera = Camera::default();
        camera.rotate(0.0, -10_000.0);
        let angle_to_up = camera.forward().angle_between(Vec3::Y);
        assert!(angle_to_up > 0.0);
        // View stayed a valid basis: right axis is still well-defined.
        assert!(camera.right().length() > 0.9);
    }

    #[test]
    fn repeated_pitch_never_flips() {
        let mut camera = Camera::default();
        for _ in 0..1000 {
            camera.rotate(0.0, 45.0);
        }
        let forward = camera.forward();
        assert!(forward.is_finite());
        // Converged toward straight down but never crossed it.
        assert!(forward.angle_between(-Vec3::Y) > 0.0);
        assert!(forward.z <= 0.0);
    }

    #[test]
    fn zoom_clamps_minimum_distance() {
        let mut camera = Camera::default();
        camera.move_to_target(-100.0);
        let distance = camera.position.distance(camera.target);
        assert!(distance > 0.0);
        assert!(distance < 0.01);
    }

    #[test]
    fn zoom_moves_eye_away() {
        let mut camera = Camera::default();
        let before = camera.position.distance(camera.target);
        camera.move_to_target(2.0);
        let after = camera.position.distance(camera.target);
        assert!((after - before - 2.0).abs() < 1e-5);
    }

    #[test]
    fn matrices_are_finite() {
        let camera = Camera::default();
        for projection in [Projection::Perspective, Projection::Orthographic] {
            let camera = Camera {
                projection,
                ..camera
            };
            let vp = camera.view_projection(16.0 / 9.0);
            assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn projection_toggle_round_trips() {
        assert_eq!(
            Projection::Perspective.toggled().toggled(),
            Projection::Perspective
        );
    }
}
