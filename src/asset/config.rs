//! Configuration asset data.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result, Rgba};

/// Current version of the configuration asset format
pub const CONFIG_ASSET_VERSION: u32 = 1;

/// File extension for configuration asset files
pub const CONFIG_ASSET_EXTENSION: &str = "json";

/// Opaque reference to an instantiable shape template.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeHandle(pub String);

impl ShapeHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to a texture resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureHandle(pub String);

impl TextureHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog of selectable shapes, textures and colors.
///
/// Read-only from a prototype node's point of view. Lists are index-addressed
/// and consumers must not assume a selection index is in range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationAsset {
    /// Format version for compatibility
    #[serde(default = "default_version")]
    pub version: u32,
    /// Display name (e.g. "greybox_walls")
    pub name: String,
    /// Shape templates, in selection order
    #[serde(default)]
    pub shape_variants: Vec<ShapeHandle>,
    /// Surface textures, in selection order
    #[serde(default)]
    pub textures: Vec<TextureHandle>,
    /// Surface colors (linear RGBA), in selection order
    #[serde(default)]
    pub colors: Vec<Rgba>,
}

fn default_version() -> u32 {
    CONFIG_ASSET_VERSION
}

impl ConfigurationAsset {
    /// Create an empty asset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: CONFIG_ASSET_VERSION,
            name: name.into(),
            shape_variants: Vec::new(),
            textures: Vec::new(),
            colors: Vec::new(),
        }
    }

    pub fn with_shapes<I, S>(mut self, shapes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shape_variants = shapes.into_iter().map(|s| ShapeHandle::new(s)).collect();
        self
    }

    pub fn with_textures<I, S>(mut self, textures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.textures = textures.into_iter().map(|t| TextureHandle::new(t)).collect();
        self
    }

    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Rgba>) -> Self {
        self.colors = colors.into_iter().collect();
        self
    }

    /// True when there is at least one shape to instantiate.
    pub fn has_shapes(&self) -> bool {
        !self.shape_variants.is_empty()
    }

    pub fn shape(&self, index: usize) -> Option<&ShapeHandle> {
        self.shape_variants.get(index)
    }

    pub fn texture(&self, index: usize) -> Option<&TextureHandle> {
        self.textures.get(index)
    }

    pub fn color(&self, index: usize) -> Option<Rgba> {
        self.colors.get(index).copied()
    }

    /// Save to file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file (sync)
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let asset: Self = serde_json::from_str(&json)?;
        if asset.version != CONFIG_ASSET_VERSION {
            return Err(Error::UnsupportedVersion {
                found: asset.version,
                expected: CONFIG_ASSET_VERSION,
            });
        }
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ConfigurationAsset {
        ConfigurationAsset::new("greybox")
            .with_shapes(["cube", "ramp"])
            .with_textures(["grid"])
            .with_colors([[1.0, 0.0, 0.0, 1.0]])
    }

    #[test]
    fn test_lookup_in_range() {
        let asset = sample();
        assert!(asset.has_shapes());
        assert_eq!(asset.shape(1).unwrap().as_str(), "ramp");
        assert_eq!(asset.texture(0).unwrap().as_str(), "grid");
        assert_eq!(asset.color(0), Some([1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_lookup_out_of_range_is_none() {
        let asset = sample();
        assert!(asset.shape(2).is_none());
        assert!(asset.texture(7).is_none());
        assert!(asset.color(1).is_none());
    }

    #[test]
    fn test_empty_asset_has_no_shapes() {
        assert!(!ConfigurationAsset::new("empty").has_shapes());
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let asset: ConfigurationAsset =
            serde_json::from_str(r#"{ "name": "bare", "shape_variants": ["cube"] }"#).unwrap();
        assert_eq!(asset.version, CONFIG_ASSET_VERSION);
        assert_eq!(asset.shape_variants.len(), 1);
        assert!(asset.textures.is_empty());
        assert!(asset.colors.is_empty());
    }

    #[test]
    fn test_asset_persistence() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("assets").join("greybox.json");

        let asset = sample();
        asset.save_sync(&path).expect("save failed");

        let loaded = ConfigurationAsset::load_sync(&path).expect("load failed");
        assert_eq!(loaded, asset);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("future.json");
        std::fs::write(&path, r#"{ "version": 99, "name": "future" }"#).unwrap();

        let err = ConfigurationAsset::load_sync(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion { found: 99, .. }));
    }
}
