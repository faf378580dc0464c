//! Map image loading and a content-addressed texture registry.
//!
//! Images are identified by a hash of their pixel data; registering the
//! same content twice yields the same id. The registry can be persisted to
//! disk as JSON for inspection.

pub mod map;
pub mod store;

pub use map::{AssetId, MapImage};
pub use store::TextureStore;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pixel buffer length {actual} does not match {width}x{height} RGBA")]
    Dimensions {
        width: u32,
        height: u32,
        actual: usize,
    },
    #[error("texture not found: {0:?}")]
    NotFound(AssetId),
}

pub fn crate_info() -> &'static str {
    "walkabout-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
