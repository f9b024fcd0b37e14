//! In-memory edit host backed by a [`SceneGraph`].

use super::deferred::{DeferredQueue, DeferredResync};
use super::{EditHost, RendererId};
use crate::asset::{ShapeHandle, TextureHandle};
use crate::core::{Error, Result, Rgba};
use crate::scene::{
    Material, MaterialId, NodeContent, Renderer, SceneGraph, SceneNodeId, Template, TemplateLibrary,
    Transform,
};

/// Counters for structural work done by the host (for diagnostics and tests).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostStats {
    pub instantiated: u64,
    pub destroyed: u64,
    pub scheduled: u64,
}

/// Edit host owning a scene graph, its shape templates and the deferred
/// request queue.
pub struct SceneHost {
    graph: SceneGraph,
    templates: TemplateLibrary,
    deferred: DeferredQueue,
    stats: HostStats,
}

impl SceneHost {
    pub fn new() -> Self {
        Self {
            graph: SceneGraph::new(),
            templates: TemplateLibrary::new(),
            deferred: DeferredQueue::new(),
            stats: HostStats::default(),
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn templates(&self) -> &TemplateLibrary {
        &self.templates
    }

    pub fn templates_mut(&mut self) -> &mut TemplateLibrary {
        &mut self.templates
    }

    pub fn stats(&self) -> HostStats {
        self.stats
    }

    /// Number of requests waiting for the validation context to unwind.
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Add a shared material to the scene.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.graph.materials_mut().add(material)
    }

    /// Register a rendered shape template using `material`.
    pub fn register_shape(&mut self, name: impl Into<String>, material: MaterialId) -> ShapeHandle {
        let handle = ShapeHandle::new(name);
        self.templates.register(handle.clone(), Template::rendered(material));
        handle
    }

    /// Create a plain scene entity under the root, e.g. to carry a prototype.
    pub fn spawn_entity(&mut self, name: impl Into<String>, transform: Transform) -> SceneNodeId {
        let root = self.graph.root();
        // The root always exists, so this cannot fail.
        let id = self
            .graph
            .add_child(root, name, NodeContent::Group)
            .unwrap_or(root);
        self.graph.set_transform(id, transform);
        id
    }
}

impl Default for SceneHost {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHost for SceneHost {
    fn instantiate(&mut self, shape: &ShapeHandle) -> Result<SceneNodeId> {
        let template = self
            .templates
            .get(shape)
            .cloned()
            .ok_or_else(|| Error::instantiation(shape.as_str(), "no such template"))?;

        let renderer = template.material.map(Renderer::new);
        let root = self.graph.root();
        let id = self
            .graph
            .add_child(
                root,
                shape.as_str(),
                NodeContent::Instance {
                    template: shape.clone(),
                    renderer,
                },
            )
            .ok_or_else(|| Error::instantiation(shape.as_str(), "scene has no root"))?;

        self.stats.instantiated += 1;
        Ok(id)
    }

    fn set_parent(&mut self, instance: SceneNodeId, parent: SceneNodeId, preserve_world_transform: bool) -> Result<()> {
        if !self.graph.contains(instance) {
            return Err(Error::UnknownNode(instance));
        }
        if !self.graph.contains(parent) {
            return Err(Error::UnknownNode(parent));
        }
        if !self.graph.reparent(instance, parent, preserve_world_transform) {
            return Err(Error::InvalidParent { child: instance, parent });
        }
        Ok(())
    }

    fn destroy_immediate(&mut self, instance: SceneNodeId) {
        let removed = self.graph.remove(instance);
        self.stats.destroyed += removed.len() as u64;
    }

    fn renderer(&self, instance: SceneNodeId) -> Option<RendererId> {
        self.graph
            .get(instance)
            .and_then(|node| node.renderer())
            .map(|_| RendererId(instance))
    }

    fn set_override_texture(&mut self, renderer: RendererId, slot: &str, texture: &TextureHandle) {
        if let Some(r) = self.graph.get_mut(renderer.0).and_then(|n| n.renderer_mut()) {
            r.overrides.set_texture(slot, texture.clone());
        }
    }

    fn set_override_color(&mut self, renderer: RendererId, slot: &str, color: Rgba) {
        if let Some(r) = self.graph.get_mut(renderer.0).and_then(|n| n.renderer_mut()) {
            r.overrides.set_color(slot, color);
        }
    }

    fn clear_override(&mut self, renderer: RendererId, slot: &str) {
        if let Some(r) = self.graph.get_mut(renderer.0).and_then(|n| n.renderer_mut()) {
            r.overrides.clear(slot);
        }
    }

    fn world_transform(&self, node: SceneNodeId) -> Option<Transform> {
        self.graph.world_transform(node)
    }

    fn set_world_transform(&mut self, instance: SceneNodeId, transform: Transform) {
        self.graph.set_world_transform(instance, transform);
    }

    fn schedule_deferred(&mut self, request: DeferredResync) {
        self.stats.scheduled += 1;
        self.deferred.push(request);
    }

    fn drain_deferred(&mut self) -> Vec<DeferredResync> {
        self.deferred.drain()
    }

    fn cancel_deferred(&mut self, node: SceneNodeId) {
        let cancelled = self.deferred.cancel(node);
        if cancelled > 0 {
            log::debug!("Cancelled {} deferred request(s) for {:?}", cancelled, node);
        }
    }

    fn is_alive(&self, node: SceneNodeId) -> bool {
        self.graph.contains(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::BASE_COLOR_SLOT;
    use glam::Vec3;

    fn host_with_cube() -> (SceneHost, ShapeHandle) {
        let mut host = SceneHost::new();
        let mat = host.add_material(Material::new("proto"));
        let cube = host.register_shape("cube", mat);
        (host, cube)
    }

    #[test]
    fn test_instantiate_known_template() {
        let (mut host, cube) = host_with_cube();
        let id = host.instantiate(&cube).expect("instantiate failed");

        let node = host.graph().get(id).unwrap();
        assert_eq!(node.template(), Some(&cube));
        assert_eq!(node.parent, Some(host.graph().root()));
        assert!(host.renderer(id).is_some());
        assert_eq!(host.stats().instantiated, 1);
    }

    #[test]
    fn test_instantiate_unknown_template_fails() {
        let mut host = SceneHost::new();
        let err = host.instantiate(&ShapeHandle::new("missing")).unwrap_err();
        assert!(matches!(err, Error::Instantiation { .. }));
        assert_eq!(host.graph().node_count(), 1);
    }

    #[test]
    fn test_template_without_material_has_no_renderer() {
        let mut host = SceneHost::new();
        let marker = ShapeHandle::new("marker");
        host.templates_mut().register(marker.clone(), Template::empty());

        let id = host.instantiate(&marker).unwrap();
        assert!(host.renderer(id).is_none());
    }

    #[test]
    fn test_set_parent_errors() {
        let (mut host, cube) = host_with_cube();
        let entity = host.spawn_entity("block", Transform::identity());
        let id = host.instantiate(&cube).unwrap();

        assert!(matches!(
            host.set_parent(SceneNodeId(999), entity, true),
            Err(Error::UnknownNode(_))
        ));

        // entity under the instance, then the instance under entity: a cycle
        host.set_parent(entity, id, true).expect("reparent failed");
        assert!(matches!(
            host.set_parent(id, entity, true),
            Err(Error::InvalidParent { .. })
        ));
    }

    #[test]
    fn test_destroy_immediate_is_idempotent() {
        let (mut host, cube) = host_with_cube();
        let id = host.instantiate(&cube).unwrap();

        host.destroy_immediate(id);
        host.destroy_immediate(id);

        assert!(!host.is_alive(id));
        assert_eq!(host.stats().destroyed, 1);
    }

    #[test]
    fn test_overrides_do_not_touch_shared_material() {
        let (mut host, cube) = host_with_cube();
        let a = host.instantiate(&cube).unwrap();
        let b = host.instantiate(&cube).unwrap();

        let renderer = host.renderer(a).unwrap();
        host.set_override_color(renderer, BASE_COLOR_SLOT, [1.0, 0.0, 0.0, 1.0]);

        let entries = host.graph().flatten();
        let color_of = |id| entries.iter().find(|e| e.node == id).unwrap().color;
        assert_eq!(color_of(a), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(color_of(b), [1.0, 1.0, 1.0, 1.0]);

        host.clear_override(renderer, BASE_COLOR_SLOT);
        let entries = host.graph().flatten();
        assert_eq!(entries.iter().find(|e| e.node == a).unwrap().color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_spawn_entity_places_transform() {
        let mut host = SceneHost::new();
        let id = host.spawn_entity("block", Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        let world = host.world_transform(id).unwrap();
        assert!((world.position - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_deferred_schedule_and_cancel() {
        let mut host = SceneHost::new();
        let node = host.spawn_entity("block", Transform::identity());

        host.schedule_deferred(DeferredResync { node, ticket: 1 });
        assert_eq!(host.pending_deferred(), 1);

        host.cancel_deferred(node);
        assert!(host.drain_deferred().is_empty());
        assert_eq!(host.stats().scheduled, 1);
    }
}
