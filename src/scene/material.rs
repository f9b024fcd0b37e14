//! Shared materials.
//!
//! Materials are shared by every renderer that references them. Per-instance
//! variation goes through a renderer's [`PropertyBlock`](super::PropertyBlock).

use std::collections::HashMap;

use super::node::{BASE_COLOR_SLOT, BASE_TEXTURE_SLOT};
use crate::asset::TextureHandle;
use crate::core::Rgba;

/// Handle to a material in a [`MaterialLibrary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// A shared surface description.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub base_texture: Option<TextureHandle>,
    pub base_color: Rgba,
    /// Property-block slot the material reads its texture override from.
    pub texture_slot: String,
    /// Property-block slot the material reads its color override from.
    pub color_slot: String,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_texture: None,
            base_color: [1.0, 1.0, 1.0, 1.0],
            texture_slot: BASE_TEXTURE_SLOT.to_string(),
            color_slot: BASE_COLOR_SLOT.to_string(),
        }
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.base_texture = Some(TextureHandle::new(texture));
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.base_color = color;
        self
    }

    /// Read overrides from custom property names instead of the base slots.
    pub fn with_slots(mut self, texture_slot: impl Into<String>, color_slot: impl Into<String>) -> Self {
        self.texture_slot = texture_slot.into();
        self.color_slot = color_slot.into();
        self
    }
}

/// All shared materials known to a scene.
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    materials: HashMap<MaterialId, Material>,
    next_id: u32,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.next_id);
        self.next_id += 1;
        self.materials.insert(id, material);
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
