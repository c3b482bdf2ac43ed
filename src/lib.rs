//! Workspace umbrella crate: re-exports `gazetteer-core` so the demos can be
//! run from the repository root.
pub use gazetteer_core::*;
