// crates/gazetteer-core/src/lib.rs

//! # gazetteer-core
//!
//! Location lookup against an OGC Web Feature Service gazetteer.
//!
//! A term search or id lookup becomes an OGC filter (`filter`), is wrapped
//! into a WFS 1.1.0 `GetFeature` document (`encode`), posted to the server
//! (`transport`), and the returned GML feature collection is read into typed
//! raw features (`response`) and mapped into [`Location`]s (`mapper`).
//! [`WfsGazetteer`] ties the steps together behind [`GazetteerService`].
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod encode;
pub mod error;
pub mod filter;
pub mod localization;
pub mod mapper;
pub mod model;
pub mod response;
pub mod service;
pub mod traits;
pub mod transport;

// Re-exports
pub use crate::config::{AxisOrder, GazetteerConfig};
pub use crate::error::{GazetteerError, Result};
pub use crate::localization::Localization;
pub use crate::mapper::LocationMapper;
pub use crate::model::{BoundingBox, Location, MatchingType, SearchQuery};
pub use crate::service::WfsGazetteer;
pub use crate::traits::GazetteerService;
pub use crate::transport::Transport;
#[cfg(feature = "http")]
pub use crate::transport::HttpTransport;

pub mod prelude {
    pub use crate::{
        BoundingBox, GazetteerConfig, GazetteerError, GazetteerService, Localization, Location,
        MatchingType, Result, WfsGazetteer,
    };
}
