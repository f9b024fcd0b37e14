//! Prototype behaviour settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::policy::ShapeIndexPolicy;
use crate::core::Result;
use crate::scene::{BASE_COLOR_SLOT, BASE_TEXTURE_SLOT};

/// Settings shared by every prototype node in a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrototypeSettings {
    /// How to recover from an out-of-range shape selection.
    pub shape_index_policy: ShapeIndexPolicy,
    /// Property-block slot receiving the selected texture.
    pub texture_slot: String,
    /// Property-block slot receiving the selected color.
    pub color_slot: String,
}

impl Default for PrototypeSettings {
    fn default() -> Self {
        Self {
            shape_index_policy: ShapeIndexPolicy::default(),
            texture_slot: BASE_TEXTURE_SLOT.to_string(),
            color_slot: BASE_COLOR_SLOT.to_string(),
        }
    }
}

impl PrototypeSettings {
    pub fn with_policy(mut self, policy: ShapeIndexPolicy) -> Self {
        self.shape_index_policy = policy;
        self
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

    /// Load from file (sync). Missing fields take their defaults.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
