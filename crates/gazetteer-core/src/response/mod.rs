// crates/gazetteer-core/src/response/mod.rs

//! # Response Parser
//!
//! Reads a WFS `FeatureCollection` into [`RawFeature`] values. A broken
//! document fails as a whole; a broken member is skipped and logged.

mod parser;
mod raw;

pub use parser::parse_feature_collection;
pub use raw::{FeatureError, ParsedCollection, RawFeature, RawGeometry, RawType, REFERENCE_MARKER};
