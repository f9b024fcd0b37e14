//! Configuration assets shared by prototype nodes.
//!
//! A [`ConfigurationAsset`] is a plain catalog of shape variants, textures and
//! colors. Assets are owned by the [`AssetStore`]; everything else refers to
//! them through a [`ConfigId`] lookup handle.

pub mod config;
pub mod store;

pub use config::{ConfigurationAsset, ShapeHandle, TextureHandle, CONFIG_ASSET_VERSION};
pub use store::{AssetStore, ConfigId};
