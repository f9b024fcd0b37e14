//! Editor-facing session that routes user edits to prototype nodes.

pub mod session;

pub use session::{EditSession, FlushReport};
