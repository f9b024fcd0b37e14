//! Owning store for configuration assets.

use std::collections::HashMap;
use std::path::Path;

use super::config::{ConfigurationAsset, CONFIG_ASSET_EXTENSION};
use crate::core::Result;

/// Non-owning lookup handle for an asset held by an [`AssetStore`].
///
/// Ids are never reused, so a handle to a removed asset simply stops
/// resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConfigId(pub u64);

/// Owns every configuration asset in a session.
#[derive(Debug, Default)]
pub struct AssetStore {
    assets: HashMap<ConfigId, ConfigurationAsset>,
    next_id: u64,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an asset and return its handle.
    pub fn insert(&mut self, asset: ConfigurationAsset) -> ConfigId {
        let id = ConfigId(self.next_id);
        self.next_id += 1;
        log::debug!("Registered configuration asset '{}' as {:?}", asset.name, id);
        self.assets.insert(id, asset);
        id
    }

    pub fn get(&self, id: ConfigId) -> Option<&ConfigurationAsset> {
        self.assets.get(&id)
    }

    /// Mutable access for asset edits. Nodes only observe the change on
    /// their next resync.
    pub fn get_mut(&mut self, id: ConfigId) -> Option<&mut ConfigurationAsset> {
        self.assets.get_mut(&id)
    }

    pub fn remove(&mut self, id: ConfigId) -> Option<ConfigurationAsset> {
        self.assets.remove(&id)
    }

    pub fn contains(&self, id: ConfigId) -> bool {
        self.assets.contains_key(&id)
    }

    /// Find the first asset with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<ConfigId> {
        let mut ids: Vec<_> = self
            .assets
            .iter()
            .filter(|(_, asset)| asset.name == name)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_by_key(|id| id.0);
        ids.first().copied()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Load a single asset file into the store.
    pub fn load_file(&mut self, path: &Path) -> Result<ConfigId> {
        let asset = ConfigurationAsset::load_sync(path)?;
        Ok(self.insert(asset))
    }

    /// Load every asset file in a directory. Files that fail to parse are
    /// skipped with a warning.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<ConfigId>> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == CONFIG_ASSET_EXTENSION)
            })
            .collect();
        paths.sort();

        let mut ids = Vec::with_capacity(paths.len());
        for path in paths {
            match self.load_file(&path) {
                Ok(id) => ids.push(id),
                Err(e) => log::warn!("Skipping asset {}: {}", path.display(), e),
            }
        }
        Ok(ids)
    }
}
