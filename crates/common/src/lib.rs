//! Shared types and utilities for the walkabout demo.

pub mod color;
pub mod config;

pub use color::Color;
pub use config::{AppConfig, ConfigError};

pub fn crate_info() -> &'static str {
    "walkabout-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
