//! Error types for protoblock

use thiserror::Error;

use crate::scene::SceneNodeId;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to instantiate shape '{shape}': {reason}")]
    Instantiation { shape: String, reason: String },

    #[error("unknown scene node {0:?}")]
    UnknownNode(SceneNodeId),

    #[error("unknown configuration asset {0:?}")]
    UnknownConfig(crate::asset::ConfigId),

    #[error("cannot parent {child:?} under {parent:?}")]
    InvalidParent { child: SceneNodeId, parent: SceneNodeId },

    #[error("prototype node {0:?} has been destroyed")]
    NodeDestroyed(SceneNodeId),

    #[error("scene node {0:?} already carries a prototype")]
    AlreadyAttached(SceneNodeId),

    #[error("unsupported data version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build an instantiation error for a shape handle.
    pub fn instantiation(shape: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Instantiation {
            shape: shape.into(),
            reason: reason.into(),
        }
    }
}
