use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading the application configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Application configuration, loaded from a YAML file.
///
/// Every field has a default so a partial (or absent) file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial window width in pixels.
    pub window_width: u32,
    /// Initial window height in pixels.
    pub window_height: u32,
    /// Window title.
    pub title: String,
    /// Path to the map image used for the cubicmap and ground texture.
    pub map_path: PathBuf,
    /// Seed for deterministic scene generation.
    pub seed: u64,
    /// Number of random columns to generate.
    pub columns: usize,
    /// Initial vertical field of view in degrees.
    pub fovy: f32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: 1366,
            window_height: 768,
            title: "walkabout".into(),
            map_path: PathBuf::from("assets/map.png"),
            seed: 42,
            columns: 12,
            fovy: 90.0,
            fullscreen: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_yaml::from_str(&data)?)
    }

    /// Save configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let data = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_window() {
        let config = AppConfig::default();
        assert_eq!(config.window_width, 1366);
        assert_eq!(config.window_height, 768);
        assert_eq!(config.columns, 12);
        assert_eq!(config.fovy, 90.0);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("seed: 7\ncolumns: 4\n").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.columns, 4);
        assert_eq!(config.window_width, AppConfig::default().window_width);
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut config = AppConfig::default();
        config.seed = 1234;
        config.fullscreen = true;
        config.save(tmp.path()).unwrap();

        let loaded = AppConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            AppConfig::load("does/not/exist.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
