//! Edit session: the host-facing surface for prototype nodes.
//!
//! User edits land here. Each edit mutates the node and lets it schedule a
//! deferred resync; nothing structural happens until [`EditSession::flush`]
//! runs, which is when the host's validation context has unwound.

use std::collections::HashMap;

use crate::asset::{AssetStore, ConfigId};
use crate::core::{Error, Result};
use crate::host::{EditHost, SceneHost};
use crate::prototype::{PrototypeNode, PrototypeSettings, ResyncOutcome, Selection};
use crate::scene::SceneNodeId;

/// What one [`EditSession::flush`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlushReport {
    /// Requests that ran a resync (whatever its outcome).
    pub executed: usize,
    /// Requests dropped because the node was gone or the request superseded.
    pub stale: usize,
    /// Resyncs that returned an error; the node kept its previous child.
    pub failed: usize,
    /// Per-node outcome of every executed resync, in execution order.
    pub outcomes: Vec<(SceneNodeId, ResyncOutcome)>,
}

/// Owns the host, the asset store and every prototype node in a scene.
pub struct EditSession<H: EditHost = SceneHost> {
    host: H,
    assets: AssetStore,
    settings: PrototypeSettings,
    nodes: HashMap<SceneNodeId, PrototypeNode>,
}

impl<H: EditHost> EditSession<H> {
    pub fn new(host: H, settings: PrototypeSettings) -> Self {
        Self {
            host,
            assets: AssetStore::new(),
            settings,
            nodes: HashMap::new(),
        }
    }

    pub fn with_assets(mut self, assets: AssetStore) -> Self {
        self.assets = assets;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Mutable asset access. Nodes see the change on their next resync; use
    /// [`refresh_config`](Self::refresh_config) to request one.
    pub fn assets_mut(&mut self) -> &mut AssetStore {
        &mut self.assets
    }

    pub fn settings(&self) -> &PrototypeSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: PrototypeSettings) {
        self.settings = settings;
    }

    pub fn node(&self, id: SceneNodeId) -> Option<&PrototypeNode> {
        self.nodes.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Entities carrying a prototype, in id order.
    pub fn node_ids(&self) -> Vec<SceneNodeId> {
        let mut ids: Vec<_> = self.nodes.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Attach an unconfigured prototype to a live scene entity.
    pub fn attach(&mut self, entity: SceneNodeId) -> Result<()> {
        if !self.host.is_alive(entity) {
            return Err(Error::UnknownNode(entity));
        }
        if self.nodes.contains_key(&entity) {
            return Err(Error::AlreadyAttached(entity));
        }
        self.nodes.insert(entity, PrototypeNode::new(entity));
        log::debug!("Attached prototype to {:?}", entity);
        Ok(())
    }

    /// Attach and configure in one step.
    pub fn attach_with(&mut self, entity: SceneNodeId, config: ConfigId, selection: Selection) -> Result<()> {
        self.attach(entity)?;
        self.set_config(entity, Some(config))?;
        self.set_selection(entity, selection)
    }

    /// Tear down the prototype on `entity`, releasing its child. The entity
    /// itself stays in the scene.
    pub fn detach(&mut self, entity: SceneNodeId) -> Result<()> {
        let mut node = self.nodes.remove(&entity).ok_or(Error::UnknownNode(entity))?;
        node.destroy(&mut self.host);
        self.host.cancel_deferred(entity);
        log::debug!("Detached prototype from {:?}", entity);
        Ok(())
    }

    /// Remove a scene entity. A prototype on it is torn down first.
    pub fn remove_entity(&mut self, entity: SceneNodeId) {
        if let Some(mut node) = self.nodes.remove(&entity) {
            node.destroy(&mut self.host);
            self.host.cancel_deferred(entity);
        }
        self.host.destroy_immediate(entity);
    }

    /// Point the prototype on `entity` at a stored asset, or at none.
    pub fn set_config(&mut self, entity: SceneNodeId, config: Option<ConfigId>) -> Result<()> {
        if let Some(id) = config {
            if !self.assets.contains(id) {
                return Err(Error::UnknownConfig(id));
            }
        }
        let node = self.nodes.get_mut(&entity).ok_or(Error::UnknownNode(entity))?;
        node.set_config(config, &mut self.host)
    }

    pub fn set_selection(&mut self, entity: SceneNodeId, selection: Selection) -> Result<()> {
        let node = self.nodes.get_mut(&entity).ok_or(Error::UnknownNode(entity))?;
        node.set_selection(selection, &mut self.host)
    }

    pub fn select_shape(&mut self, entity: SceneNodeId, index: usize) -> Result<()> {
        let node = self.nodes.get_mut(&entity).ok_or(Error::UnknownNode(entity))?;
        node.select_shape(index, &mut self.host)
    }

    pub fn select_texture(&mut self, entity: SceneNodeId, index: usize) -> Result<()> {
        let node = self.nodes.get_mut(&entity).ok_or(Error::UnknownNode(entity))?;
        node.select_texture(index, &mut self.host)
    }

    pub fn select_color(&mut self, entity: SceneNodeId, index: usize) -> Result<()> {
        let node = self.nodes.get_mut(&entity).ok_or(Error::UnknownNode(entity))?;
        node.select_color(index, &mut self.host)
    }

    /// Manual "update" action: resync right now, outside any validation
    /// context. A request still queued for the node becomes stale.
    pub fn update(&mut self, entity: SceneNodeId) -> Result<ResyncOutcome> {
        let node = self.nodes.get_mut(&entity).ok_or(Error::UnknownNode(entity))?;
        node.resync(&mut self.host, &self.assets, &self.settings)
    }

    /// Request a resync for every node that uses `config`, e.g. after the
    /// asset was edited. Returns how many requests were queued.
    pub fn refresh_config(&mut self, config: ConfigId) -> usize {
        let mut ids: Vec<_> = self
            .nodes
            .values()
            .filter(|n| n.config() == Some(config))
            .map(|n| n.id())
            .collect();
        ids.sort();

        let mut scheduled = 0;
        for id in ids {
            if let Some(node) = self.nodes.get_mut(&id) {
                if node.on_selection_changed(&mut self.host) {
                    scheduled += 1;
                }
            }
        }
        scheduled
    }

    /// Run every deferred request. Call once the host's validation context
    /// has completed.
    pub fn flush(&mut self) -> FlushReport {
        self.prune_dead();

        let mut report = FlushReport::default();
        loop {
            let batch = self.host.drain_deferred();
            if batch.is_empty() {
                break;
            }

            for request in batch {
                if !self.host.is_alive(request.node) {
                    // The entity can go away mid-flush, e.g. under another
                    // prototype's replaced child.
                    if let Some(mut node) = self.nodes.remove(&request.node) {
                        log::debug!("Entity {:?} removed during flush, tearing down prototype", request.node);
                        node.destroy(&mut self.host);
                    }
                    report.stale += 1;
                    continue;
                }
                let Some(node) = self.nodes.get_mut(&request.node) else {
                    log::debug!("Dropping deferred resync for missing node {:?}", request.node);
                    report.stale += 1;
                    continue;
                };

                match node.run_deferred(request, &mut self.host, &self.assets, &self.settings) {
                    Ok(ResyncOutcome::Stale) => report.stale += 1,
                    Ok(outcome) => {
                        report.executed += 1;
                        report.outcomes.push((request.node, outcome));
                    }
                    Err(e) => {
                        log::warn!("Resync of {:?} failed: {}", request.node, e);
                        report.failed += 1;
                    }
                }
            }
        }

        if report.executed + report.failed > 0 {
            log::debug!(
                "Flush: {} executed, {} stale, {} failed",
                report.executed,
                report.stale,
                report.failed
            );
        }
        report
    }

    /// Tear down nodes whose entity the host has already removed.
    fn prune_dead(&mut self) {
        let dead: Vec<_> = self
            .nodes
            .keys()
            .copied()
            .filter(|id| !self.host.is_alive(*id))
            .collect();

        for id in dead {
            if let Some(mut node) = self.nodes.remove(&id) {
                log::debug!("Entity {:?} was removed by the host, tearing down prototype", id);
                node.destroy(&mut self.host);
            }
        }
    }
}

impl EditSession<SceneHost> {
    /// Session over a fresh in-memory scene.
    pub fn in_memory(settings: PrototypeSettings) -> Self {
        Self::new(SceneHost::new(), settings)
    }
}
