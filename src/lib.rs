//! Protoblock - editor-time prototype blocks
//!
//! A prototype block is a placeholder scene entity whose single child
//! representation (shape, texture, color) is chosen by indices into a shared
//! [`ConfigurationAsset`](asset::ConfigurationAsset). Edits are coalesced
//! into deferred resyncs that replace the child without disturbing the rest
//! of the scene.

pub mod core;
pub mod asset;
pub mod scene;
pub mod host;
pub mod prototype;
pub mod editor;

pub use asset::{AssetStore, ConfigId, ConfigurationAsset};
pub use editor::{EditSession, FlushReport};
pub use host::{EditHost, SceneHost};
pub use prototype::{PrototypeNode, PrototypeSettings, ResyncOutcome, Selection, ShapeIndexPolicy};
