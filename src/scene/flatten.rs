//! Flattened scene graph output.
//!
//! `FlatRenderEntry` is the result of walking the scene graph: one entry per
//! visible renderable instance with its overrides already resolved against
//! the shared material.

use glam::Mat4;

use super::node::SceneNodeId;
use crate::asset::{ShapeHandle, TextureHandle};
use crate::core::Rgba;

/// One entry in the flattened visible set.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatRenderEntry {
    /// The instance node this entry was produced from.
    pub node: SceneNodeId,
    /// Template the instance was created from.
    pub template: ShapeHandle,
    /// World matrix after hierarchy propagation.
    pub world: Mat4,
    /// Effective base texture (override, else material default).
    pub texture: Option<TextureHandle>,
    /// Effective base color (override, else material default).
    pub color: Rgba,
}
