use glam::Vec3;
use walkabout_camera::{Camera, CameraMode, Projection};

/// Read-only snapshot of camera state for the status HUD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraReport {
    pub mode: CameraMode,
    pub projection: Projection,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl CameraReport {
    pub fn capture(camera: &Camera, mode: CameraMode) -> Self {
        Self {
            mode,
            projection: camera.projection,
            position: camera.position,
            target: camera.target,
            up: camera.up,
        }
    }

    /// The five status lines shown in the HUD box.
    pub fn lines(&self) -> [String; 5] {
        [
            format!("- Mode: {}", self.mode.label()),
            format!("- Projection: {}", self.projection.label()),
            format!("- Position: {}", triple(self.position)),
            format!("- Target: {}", triple(self.target)),
            format!("- Up: {}", triple(self.up)),
        ]
    }
}

impl std::fmt::Display for CameraReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

fn triple(v: Vec3) -> String {
    format!("({:06.3}, {:06.3}, {:06.3})", v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_reads_camera_state() {
        let camera = Camera::default();
        let report = CameraReport::capture(&camera, CameraMode::FirstPerson);
        assert_eq!(report.position, camera.position);
        assert_eq!(report.projection, Projection::Perspective);
    }

    #[test]
    fn lines_use_padded_triples() {
        let camera = Camera::default();
        let report = CameraReport::capture(&camera, CameraMode::FirstPerson);
        let lines = report.lines();
        assert_eq!(lines[0], "- Mode: FIRST_PERSON");
        assert_eq!(lines[1], "- Projection: PERSPECTIVE");
        assert_eq!(lines[2], "- Position: (00.000, 02.000, 04.000)");
    }

    #[test]
    fn display_joins_all_lines() {
        let report = CameraReport::capture(&Camera::default(), CameraMode::Free);
        let text = report.to_string();
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("- Up:"));
    }

    #[test]
    fn negative_components_keep_width() {
        let camera = Camera {
            position: Vec3::new(-1.5, 0.0, 0.0),
            ..Camera::default()
        };
        let report = CameraReport::capture(&camera, CameraMode::Free);
        assert!(report.lines()[2].contains("-1.500"));
    }
}
