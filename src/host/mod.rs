//! The edit host: the environment that owns the scene and performs
//! structural mutations on behalf of prototype nodes.

pub mod deferred;
pub mod scene_host;

pub use deferred::{DeferredQueue, DeferredResync};
pub use scene_host::{HostStats, SceneHost};

use crate::asset::{ShapeHandle, TextureHandle};
use crate::core::{Result, Rgba};
use crate::scene::{SceneNodeId, Transform};

/// Handle to the render component of an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RendererId(pub SceneNodeId);

/// Primitives a prototype node needs from its host.
///
/// All calls happen on the host's single edit thread.
pub trait EditHost {
    /// Create a live, unparented instance of a shape template.
    fn instantiate(&mut self, shape: &ShapeHandle) -> Result<SceneNodeId>;

    /// Move `instance` under `parent`, optionally keeping its world-space
    /// position, rotation and scale.
    fn set_parent(&mut self, instance: SceneNodeId, parent: SceneNodeId, preserve_world_transform: bool) -> Result<()>;

    /// Remove an instance (and anything under it) right away. Must tolerate
    /// instances that are already gone.
    fn destroy_immediate(&mut self, instance: SceneNodeId);

    fn renderer(&self, instance: SceneNodeId) -> Option<RendererId>;

    fn set_override_texture(&mut self, renderer: RendererId, slot: &str, texture: &TextureHandle);

    fn set_override_color(&mut self, renderer: RendererId, slot: &str, color: Rgba);

    /// Remove the override in `slot` so the shared material's value shows.
    fn clear_override(&mut self, renderer: RendererId, slot: &str);

    fn world_transform(&self, node: SceneNodeId) -> Option<Transform>;

    fn set_world_transform(&mut self, instance: SceneNodeId, transform: Transform);

    /// Queue `request` to run after the current edit-validation context.
    fn schedule_deferred(&mut self, request: DeferredResync);

    /// Take the queued requests once the validation context has unwound.
    fn drain_deferred(&mut self) -> Vec<DeferredResync>;

    /// Drop any queued requests for `node`.
    fn cancel_deferred(&mut self, node: SceneNodeId);

    fn is_alive(&self, node: SceneNodeId) -> bool;
}
