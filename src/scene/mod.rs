//! Editor scene: node hierarchy, shared materials and shape templates.

pub mod flatten;
pub mod graph;
pub mod material;
pub mod node;
pub mod template;

pub use flatten::FlatRenderEntry;
pub use graph::SceneGraph;
pub use material::{Material, MaterialId, MaterialLibrary};
pub use node::{
    NodeContent, PropertyBlock, Renderer, SceneNode, SceneNodeId, Transform, BASE_COLOR_SLOT,
    BASE_TEXTURE_SLOT,
};
pub use template::{Template, TemplateLibrary};
