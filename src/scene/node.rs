//! Scene graph node types
//!
//! Core types for the editor scene graph: node IDs, transforms, content
//! variants, renderers and nodes.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use super::material::MaterialId;
use crate::asset::{ShapeHandle, TextureHandle};
use crate::core::Rgba;

/// Property-block slot holding the surface texture.
pub const BASE_TEXTURE_SLOT: &str = "base_texture";

/// Property-block slot holding the surface color.
pub const BASE_COLOR_SLOT: &str = "base_color";

/// Unique identifier for a scene graph node. Never reused within a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneNodeId(pub u64);

/// Position, rotation and scale. Local to the parent when stored on a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Decompose an affine matrix.
    pub fn from_mat4(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Component-wise comparison within `epsilon`. Rotations are compared up
    /// to sign since `q` and `-q` describe the same orientation.
    pub fn approx_eq(&self, other: &Transform, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.scale.abs_diff_eq(other.scale, epsilon)
            && (self.rotation.abs_diff_eq(other.rotation, epsilon)
                || self.rotation.abs_diff_eq(-other.rotation, epsilon))
    }
}

/// Per-instance render overrides layered on top of a shared material.
///
/// Writing to a property block never touches the material itself, so every
/// other renderer using the same material is unaffected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBlock {
    textures: HashMap<String, TextureHandle>,
    colors: HashMap<String, Rgba>,
}

impl PropertyBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_texture(&mut self, slot: &str, texture: TextureHandle) {
        self.textures.insert(slot.to_string(), texture);
    }

    pub fn set_color(&mut self, slot: &str, color: Rgba) {
        self.colors.insert(slot.to_string(), color);
    }

    /// Remove any override in `slot`, falling back to the material default.
    pub fn clear(&mut self, slot: &str) {
        self.textures.remove(slot);
        self.colors.remove(slot);
    }

    pub fn texture(&self, slot: &str) -> Option<&TextureHandle> {
        self.textures.get(slot)
    }

    pub fn color(&self, slot: &str) -> Option<Rgba> {
        self.colors.get(slot).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty() && self.colors.is_empty()
    }
}

/// Render component: a shared material plus this instance's overrides.
#[derive(Clone, Debug, PartialEq)]
pub struct Renderer {
    pub material: MaterialId,
    pub overrides: PropertyBlock,
}

impl Renderer {
    pub fn new(material: MaterialId) -> Self {
        Self {
            material,
            overrides: PropertyBlock::new(),
        }
    }
}

/// What a scene node contains.
#[derive(Clone, Debug)]
pub enum NodeContent {
    /// A grouping node with no geometry of its own.
    Group,

    /// A live instance of a shape template.
    Instance {
        template: ShapeHandle,
        renderer: Option<Renderer>,
    },
}

/// A single node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: SceneNodeId,
    pub name: String,
    pub parent: Option<SceneNodeId>,
    pub children: Vec<SceneNodeId>,
    pub local_transform: Transform,
    pub visible: bool,
    pub content: NodeContent,
}

impl SceneNode {
    /// Create a new scene node.
    pub fn new(id: SceneNodeId, name: impl Into<String>, content: NodeContent) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local_transform: Transform::identity(),
            visible: true,
            content,
        }
    }

    /// The template this node was instantiated from, if any.
    pub fn template(&self) -> Option<&ShapeHandle> {
        match &self.content {
            NodeContent::Instance { template, .. } => Some(template),
            NodeContent::Group => None,
        }
    }

    pub fn renderer(&self) -> Option<&Renderer> {
        match &self.content {
            NodeContent::Instance { renderer, .. } => renderer.as_ref(),
            NodeContent::Group => None,
        }
    }

    pub fn renderer_mut(&mut self) -> Option<&mut Renderer> {
        match &mut self.content {
            NodeContent::Instance { renderer, .. } => renderer.as_mut(),
            NodeContent::Group => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_node_id_equality() {
        let a = SceneNodeId(1);
        let b = SceneNodeId(1);
        let c = SceneNodeId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_transform_identity() {
        let t = Transform::identity();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_mat4(), Mat4::IDENTITY);
    }

    #[test]
    fn test_transform_from_position() {
        let pos = Vec3::new(10.0, 5.0, -3.0);
        let t = Transform::from_position(pos);
        let (_, _, translation) = t.to_mat4().to_scale_rotation_translation();
        assert!((translation - pos).length() < 1e-5);
    }

    #[test]
    fn test_transform_matrix_round_trip() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.7),
            scale: Vec3::new(2.0, 1.0, 0.5),
        };
        assert!(Transform::from_mat4(t.to_mat4()).approx_eq(&t, 1e-4));
    }

    #[test]
    fn test_property_block_set_and_clear() {
        let mut block = PropertyBlock::new();
        assert!(block.is_empty());

        block.set_texture("base_texture", TextureHandle::new("grid"));
        block.set_color("base_color", [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(block.texture("base_texture").unwrap().as_str(), "grid");
        assert_eq!(block.color("base_color"), Some([1.0, 0.0, 0.0, 1.0]));

        block.clear("base_color");
        assert!(block.color("base_color").is_none());
        assert!(block.texture("base_texture").is_some());
    }

    #[test]
    fn test_group_has_no_renderer() {
        let node = SceneNode::new(SceneNodeId(0), "root", NodeContent::Group);
        assert!(node.renderer().is_none());
        assert!(node.template().is_none());
        assert!(node.visible);
        assert!(node.parent.is_none());
    }
}
