//! The prototype node state machine.
//!
//! A prototype node sits on a scene entity and keeps exactly one child
//! instance in sync with its selection. Edits never touch the scene
//! directly: they schedule a deferred resync through the host, and a burst
//! of edits before that request runs collapses into a single resync that
//! reads the latest state.

use serde::{Deserialize, Serialize};

use super::overrides::{apply_overrides, AppliedOverrides};
use super::policy::ShapeChoice;
use super::settings::PrototypeSettings;
use crate::asset::{AssetStore, ConfigId};
use crate::core::{Error, Result};
use crate::host::{DeferredResync, EditHost};
use crate::scene::SceneNodeId;

/// Indices into the shape, texture and color lists of a configuration asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub shape: usize,
    pub texture: usize,
    pub color: usize,
}

impl Selection {
    pub fn new(shape: usize, texture: usize, color: usize) -> Self {
        Self { shape, texture, color }
    }
}

/// Lifecycle state of a prototype node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    Idle,
    ResyncPending,
    /// Transient; held only for the duration of [`PrototypeNode::resync`].
    Resyncing,
    /// Terminal.
    Destroyed,
}

/// Result of a resync attempt that did not fail.
#[derive(Clone, Debug, PartialEq)]
pub enum ResyncOutcome {
    /// A fresh child was created for shape `shape`.
    Applied {
        child: SceneNodeId,
        shape: usize,
        overrides: Option<AppliedOverrides>,
    },
    /// Shape index was out of range; the existing child was kept and its
    /// overrides refreshed.
    KeptPrevious {
        child: SceneNodeId,
        overrides: Option<AppliedOverrides>,
    },
    /// No configuration asset, or the asset has no shapes.
    Unconfigured,
    /// Nothing was done (out-of-range shape under a skipping policy).
    Skipped,
    /// The request no longer applies: the node was destroyed or a newer
    /// request superseded it.
    Stale,
}

/// Editor-time placeholder entity driven by a configuration asset.
#[derive(Debug)]
pub struct PrototypeNode {
    id: SceneNodeId,
    config: Option<ConfigId>,
    selection: Selection,
    current_child: Option<SceneNodeId>,
    state: NodeState,
    /// Ticket of the most recently scheduled request.
    ticket: u64,
    resync_count: u64,
}

impl PrototypeNode {
    /// Attach a new, unconfigured prototype to scene entity `id`.
    pub fn new(id: SceneNodeId) -> Self {
        Self {
            id,
            config: None,
            selection: Selection::default(),
            current_child: None,
            state: NodeState::Idle,
            ticket: 0,
            resync_count: 0,
        }
    }

    pub fn id(&self) -> SceneNodeId {
        self.id
    }

    pub fn config(&self) -> Option<ConfigId> {
        self.config
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn current_child(&self) -> Option<SceneNodeId> {
        self.current_child
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == NodeState::Destroyed
    }

    /// Number of resyncs that produced a new child.
    pub fn resync_count(&self) -> u64 {
        self.resync_count
    }

    /// Point the node at a configuration asset (or at none).
    pub fn set_config<H: EditHost + ?Sized>(&mut self, config: Option<ConfigId>, host: &mut H) -> Result<()> {
        self.ensure_live()?;
        self.config = config;
        self.on_selection_changed(host);
        Ok(())
    }

    pub fn set_selection<H: EditHost + ?Sized>(&mut self, selection: Selection, host: &mut H) -> Result<()> {
        self.ensure_live()?;
        self.selection = selection;
        self.on_selection_changed(host);
        Ok(())
    }

    pub fn select_shape<H: EditHost + ?Sized>(&mut self, index: usize, host: &mut H) -> Result<()> {
        let selection = Selection { shape: index, ..self.selection };
        self.set_selection(selection, host)
    }

    pub fn select_texture<H: EditHost + ?Sized>(&mut self, index: usize, host: &mut H) -> Result<()> {
        let selection = Selection { texture: index, ..self.selection };
        self.set_selection(selection, host)
    }

    pub fn select_color<H: EditHost + ?Sized>(&mut self, index: usize, host: &mut H) -> Result<()> {
        let selection = Selection { color: index, ..self.selection };
        self.set_selection(selection, host)
    }

    /// Notify the node that its config or selection changed.
    ///
    /// Schedules one deferred resync; further calls while that request is
    /// pending are coalesced into it. Returns whether a request was queued.
    pub fn on_selection_changed<H: EditHost + ?Sized>(&mut self, host: &mut H) -> bool {
        match self.state {
            NodeState::Destroyed => false,
            NodeState::ResyncPending => {
                log::debug!("{:?}: resync already pending, coalescing edit", self.id);
                false
            }
            NodeState::Idle | NodeState::Resyncing => {
                self.ticket += 1;
                host.schedule_deferred(DeferredResync {
                    node: self.id,
                    ticket: self.ticket,
                });
                self.state = NodeState::ResyncPending;
                log::debug!("{:?}: scheduled resync (ticket {})", self.id, self.ticket);
                true
            }
        }
    }

    /// Run a deferred request. Requests that no longer match the node's
    /// pending ticket, or that arrive after teardown, are dropped.
    pub fn run_deferred<H: EditHost + ?Sized>(
        &mut self,
        request: DeferredResync,
        host: &mut H,
        assets: &AssetStore,
        settings: &PrototypeSettings,
    ) -> Result<ResyncOutcome> {
        if request.node != self.id
            || self.state != NodeState::ResyncPending
            || request.ticket != self.ticket
        {
            log::debug!("{:?}: dropping stale request (ticket {})", self.id, request.ticket);
            return Ok(ResyncOutcome::Stale);
        }
        self.resync(host, assets, settings)
    }

    /// Rebuild the child instance from the current config and selection.
    ///
    /// Always does real destroy and recreate work; calling it twice with the
    /// same state yields an identical child. On failure the previous child
    /// is left in place.
    pub fn resync<H: EditHost + ?Sized>(
        &mut self,
        host: &mut H,
        assets: &AssetStore,
        settings: &PrototypeSettings,
    ) -> Result<ResyncOutcome> {
        if self.state == NodeState::Destroyed {
            return Ok(ResyncOutcome::Stale);
        }

        self.state = NodeState::Resyncing;
        let result = self.rebuild_child(host, assets, settings);
        self.finish_resync();
        result
    }

    /// Tear the node down, releasing its child. Any request still queued for
    /// it becomes stale.
    pub fn destroy<H: EditHost + ?Sized>(&mut self, host: &mut H) {
        if self.state == NodeState::Destroyed {
            return;
        }
        if let Some(child) = self.current_child.take() {
            host.destroy_immediate(child);
        }
        self.ticket += 1;
        self.state = NodeState::Destroyed;
        log::debug!("{:?}: destroyed", self.id);
    }

    /// Leave `Resyncing`. An edit that arrived mid-resync already moved the
    /// node to `ResyncPending` and its request must survive.
    fn finish_resync(&mut self) {
        if self.state == NodeState::Resyncing {
            self.state = NodeState::Idle;
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.state == NodeState::Destroyed {
            return Err(Error::NodeDestroyed(self.id));
        }
        Ok(())
    }

    fn rebuild_child<H: EditHost + ?Sized>(
        &mut self,
        host: &mut H,
        assets: &AssetStore,
        settings: &PrototypeSettings,
    ) -> Result<ResyncOutcome> {
        // A child removed behind our back is no longer ours to track.
        if let Some(child) = self.current_child {
            if !host.is_alive(child) {
                self.current_child = None;
            }
        }

        let Some(asset) = self.config.and_then(|id| assets.get(id)) else {
            log::debug!("{:?}: no configuration asset, nothing to build", self.id);
            return Ok(ResyncOutcome::Unconfigured);
        };
        if !asset.has_shapes() {
            log::debug!("{:?}: asset '{}' has no shapes", self.id, asset.name);
            return Ok(ResyncOutcome::Unconfigured);
        }

        let shape_count = asset.shape_variants.len();
        let index = match settings.shape_index_policy.resolve(self.selection.shape, shape_count) {
            ShapeChoice::Use(index) => index,
            ShapeChoice::KeepPrevious => {
                log::warn!(
                    "{:?}: shape index {} out of range ({} shapes), keeping current child",
                    self.id,
                    self.selection.shape,
                    shape_count
                );
                return Ok(match self.current_child {
                    Some(child) => ResyncOutcome::KeptPrevious {
                        child,
                        overrides: apply_overrides(host, child, asset, self.selection, settings),
                    },
                    None => ResyncOutcome::Skipped,
                });
            }
            ShapeChoice::Skip => {
                log::warn!(
                    "{:?}: shape index {} out of range ({} shapes), skipping resync",
                    self.id,
                    self.selection.shape,
                    shape_count
                );
                return Ok(ResyncOutcome::Skipped);
            }
        };
        if index != self.selection.shape {
            log::warn!(
                "{:?}: shape index {} out of range ({} shapes), using {}",
                self.id,
                self.selection.shape,
                shape_count,
                index
            );
        }

        let Some(shape) = asset.shape(index) else {
            return Ok(ResyncOutcome::Skipped);
        };

        let instance = host.instantiate(shape)?;

        if let Some(world) = host.world_transform(self.id) {
            host.set_world_transform(instance, world);
        }
        if let Err(e) = host.set_parent(instance, self.id, true) {
            host.destroy_immediate(instance);
            return Err(e);
        }

        if let Some(previous) = self.current_child.replace(instance) {
            host.destroy_immediate(previous);
        }
        self.resync_count += 1;

        let overrides = apply_overrides(host, instance, asset, self.selection, settings);
        log::debug!("{:?}: child {:?} built from '{}'", self.id, instance, shape);

        Ok(ResyncOutcome::Applied {
            child: instance,
            shape: index,
            overrides,
        })
    }
}
