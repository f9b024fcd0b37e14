//! Scene graph: editor-side hierarchy of nodes.
//!
//! The scene graph organizes groups and template instances with parent/child
//! relationships. World transforms are derived on demand from the parent
//! chain, so a child always follows its parent. `flatten()` walks the tree
//! and produces a flat `Vec<FlatRenderEntry>` with overrides resolved.

use std::collections::HashMap;

use glam::Mat4;

use super::flatten::FlatRenderEntry;
use super::material::MaterialLibrary;
use super::node::{NodeContent, SceneNode, SceneNodeId, Transform, BASE_COLOR_SLOT, BASE_TEXTURE_SLOT};

/// Editor scene graph.
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    root: SceneNodeId,
    next_id: u64,
    materials: MaterialLibrary,
}

impl SceneGraph {
    /// Create a new scene graph with a root Group node.
    pub fn new() -> Self {
        let root_id = SceneNodeId(0);
        let root_node = SceneNode::new(root_id, "root", NodeContent::Group);

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
            materials: MaterialLibrary::new(),
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    /// Allocate a fresh node ID.
    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a child node under `parent`. Returns the new node's ID, or `None`
    /// if `parent` does not exist.
    pub fn add_child(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        content: NodeContent,
    ) -> Option<SceneNodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }

        let id = self.alloc_id();
        let mut node = SceneNode::new(id, name, content);
        node.parent = Some(parent);

        self.nodes.insert(id, node);

        // Register as child of parent
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        Some(id)
    }

    /// Remove a node and its entire subtree. Cannot remove the root.
    /// Returns the removed IDs (empty if nothing was removed).
    pub fn remove(&mut self, id: SceneNodeId) -> Vec<SceneNodeId> {
        if id == self.root || !self.nodes.contains_key(&id) {
            return Vec::new();
        }

        // Collect subtree IDs (BFS)
        let mut to_remove = vec![id];
        let mut i = 0;
        while i < to_remove.len() {
            let current = to_remove[i];
            if let Some(node) = self.nodes.get(&current) {
                to_remove.extend_from_slice(&node.children);
            }
            i += 1;
        }

        self.detach(id);

        // Remove all nodes in subtree
        for nid in &to_remove {
            self.nodes.remove(nid);
        }

        to_remove
    }

    /// Move a node under a new parent.
    ///
    /// With `preserve_world` the node's local transform is rewritten so its
    /// world position, rotation and scale are unchanged by the move.
    /// Refuses to reparent the root, a missing node, or to create a cycle;
    /// returns whether the move happened.
    pub fn reparent(&mut self, id: SceneNodeId, new_parent: SceneNodeId, preserve_world: bool) -> bool {
        if id == self.root || !self.nodes.contains_key(&id) || !self.nodes.contains_key(&new_parent) {
            return false;
        }
        if self.is_ancestor_or_self(id, new_parent) {
            log::warn!("Refusing to parent {:?} under its own descendant {:?}", id, new_parent);
            return false;
        }

        let world = if preserve_world { self.world_matrix(id) } else { None };

        self.detach(id);

        // Attach to new parent
        if let Some(new_parent_node) = self.nodes.get_mut(&new_parent) {
            new_parent_node.children.push(id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(new_parent);
        }

        if let Some(world) = world {
            self.set_world_matrix(id, world);
        }

        true
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: SceneNodeId, transform: Transform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
        }
    }

    /// Place a node at a world-space transform, whatever its parent.
    pub fn set_world_transform(&mut self, id: SceneNodeId, transform: Transform) {
        self.set_world_matrix(id, transform.to_mat4());
    }

    /// Set the visibility of a node.
    pub fn set_visible(&mut self, id: SceneNodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
        }
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node.
    pub fn get_mut(&mut self, id: SceneNodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: SceneNodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: SceneNodeId) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Get a reference to the shared material library.
    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    /// Get a mutable reference to the shared material library.
    pub fn materials_mut(&mut self) -> &mut MaterialLibrary {
        &mut self.materials
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// World matrix of a node, composed from its parent chain.
    pub fn world_matrix(&self, id: SceneNodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(&id)?;
        let mut world = node.local_transform.to_mat4();
        // Bounded walk; `reparent` never creates cycles.
        for _ in 0..self.nodes.len() {
            let Some(parent_id) = node.parent else {
                return Some(world);
            };
            node = self.nodes.get(&parent_id)?;
            world = node.local_transform.to_mat4() * world;
        }
        Some(world)
    }

    /// World transform of a node, decomposed.
    pub fn world_transform(&self, id: SceneNodeId) -> Option<Transform> {
        self.world_matrix(id).map(Transform::from_mat4)
    }

    /// Walk the tree and collect all visible renderable instances.
    pub fn flatten(&self) -> Vec<FlatRenderEntry> {
        let mut out = Vec::new();
        self.collect_visible(self.root, Mat4::IDENTITY, &mut out);
        out
    }

    /// Remove `id` from its parent's child list.
    fn detach(&mut self, id: SceneNodeId) {
        if let Some(node) = self.nodes.get(&id) {
            if let Some(parent_id) = node.parent {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|c| *c != id);
                }
            }
        }
    }

    fn set_world_matrix(&mut self, id: SceneNodeId, world: Mat4) {
        let parent_world = self
            .nodes
            .get(&id)
            .and_then(|n| n.parent)
            .and_then(|p| self.world_matrix(p))
            .unwrap_or(Mat4::IDENTITY);
        let local = parent_world.inverse() * world;
        self.set_transform(id, Transform::from_mat4(local));
    }

    fn is_ancestor_or_self(&self, ancestor: SceneNodeId, id: SceneNodeId) -> bool {
        let mut current = Some(id);
        for _ in 0..=self.nodes.len() {
            match current {
                Some(c) if c == ancestor => return true,
                Some(c) => current = self.nodes.get(&c).and_then(|n| n.parent),
                None => return false,
            }
        }
        false
    }

    /// Recursively collect visible render entries.
    fn collect_visible(&self, node_id: SceneNodeId, parent_world: Mat4, out: &mut Vec<FlatRenderEntry>) {
        let node = match self.nodes.get(&node_id) {
            Some(n) => n,
            None => return,
        };

        if !node.visible {
            return;
        }

        let world = parent_world * node.local_transform.to_mat4();

        if let NodeContent::Instance { template, renderer: Some(renderer) } = &node.content {
            let material = self.materials.get(renderer.material);
            let (texture_slot, color_slot) = material
                .map(|m| (m.texture_slot.as_str(), m.color_slot.as_str()))
                .unwrap_or((BASE_TEXTURE_SLOT, BASE_COLOR_SLOT));
            let texture = renderer
                .overrides
                .texture(texture_slot)
                .cloned()
                .or_else(|| material.and_then(|m| m.base_texture.clone()));
            let color = renderer
                .overrides
                .color(color_slot)
                .or_else(|| material.map(|m| m.base_color))
                .unwrap_or([1.0, 1.0, 1.0, 1.0]);

            out.push(FlatRenderEntry {
                node: node_id,
                template: template.clone(),
                world,
                texture,
                color,
            });
        }

        // Recurse into children
        for &child_id in &node.children {
            self.collect_visible(child_id, world, out);
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
