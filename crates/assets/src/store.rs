use crate::map::{AssetId, MapImage};
use crate::AssetError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A registered texture with a human-readable name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureRecord {
    pub name: String,
    pub image: MapImage,
}

/// Content-addressed texture registry.
///
/// Registering identical pixel data twice yields the same id and a single
/// entry. The registry can be saved as JSON for inspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextureStore {
    textures: BTreeMap<AssetId, TextureRecord>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture and return its content-addressed id.
    pub fn register(&mut self, name: impl Into<String>, image: MapImage) -> AssetId {
        let id = image.id();
        let name = name.into();
        tracing::debug!(?id, %name, "registering texture");
        self.textures.entry(id).or_insert(TextureRecord { name, image });
        id
    }

    pub fn get(&self, id: AssetId) -> Option<&MapImage> {
        self.textures.get(&id).map(|record| &record.image)
    }

    pub fn name_of(&self, id: AssetId) -> Option<&str> {
        self.textures.get(&id).map(|record| record.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Save the registry to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a registry from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let store: Self = serde_json::from_reader(file)?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get() {
        let mut store = TextureStore::new();
        let id = store.register("map", MapImage::builtin());
        assert!(store.get(id).is_some());
        assert_eq!(store.name_of(id), Some("map"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn register_is_idempotent_per_content() {
        let mut store = TextureStore::new();
        let first = store.register("map", MapImage::builtin());
        let second = store.register("map-again", MapImage::builtin());
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
        // First registration wins the name.
        assert_eq!(store.name_of(first), Some("map"));
    }

    #[test]
    fn missing_id_is_none() {
        let store = TextureStore::new();
        assert!(store.get(AssetId(1)).is_none());
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut store = TextureStore::new();
        let id = store.register("map", MapImage::builtin());
        store.save(tmp.path()).unwrap();

        let loaded = TextureStore::load(tmp.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(id).unwrap().id(), id);
    }
}
