//! Prototype blocks: placeholder entities whose child representation is
//! rebuilt from a shared configuration asset whenever their selection
//! changes.

pub mod node;
pub mod overrides;
pub mod policy;
pub mod settings;

pub use node::{NodeState, PrototypeNode, ResyncOutcome, Selection};
pub use overrides::{apply_overrides, AppliedOverrides};
pub use policy::{ShapeChoice, ShapeIndexPolicy};
pub use settings::PrototypeSettings;
