// crates/gazetteer-core/src/service.rs

//! # WFS Gazetteer
//!
//! Orchestrates one request/response cycle per call:
//! filter -> encode -> transport -> parse -> map.

use crate::config::GazetteerConfig;
use crate::encode::GetFeatureRequest;
use crate::error::{GazetteerError, Result};
use crate::filter::{build_identity_filter, build_search_filter, FilterExpression};
use crate::localization::Localization;
use crate::mapper::LocationMapper;
use crate::model::{Location, MatchingType, SearchQuery};
use crate::traits::GazetteerService;
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Gazetteer backed by an OGC Web Feature Service.
///
/// Holds only read-only state (configuration, localization table, transport
/// handle), so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct WfsGazetteer<T> {
    config: Arc<GazetteerConfig>,
    localization: Arc<Localization>,
    transport: T,
    timeout: Option<Duration>,
}

#[cfg(feature = "http")]
impl WfsGazetteer<HttpTransport> {
    /// Bundled configuration (plus environment overrides) and the bundled
    /// localization table.
    pub fn load() -> Result<Self> {
        Self::from_config(GazetteerConfig::load()?, Localization::bundled()?)
    }

    pub fn from_config(config: GazetteerConfig, localization: Arc<Localization>) -> Result<Self> {
        let transport = HttpTransport::from_config(&config)?;
        Self::with_transport(config, localization, transport)
    }
}

impl<T: Transport> WfsGazetteer<T> {
    pub fn with_transport(
        config: GazetteerConfig,
        localization: Arc<Localization>,
        transport: T,
    ) -> Result<Self> {
        config.validate()?;
        let timeout = config.timeout();
        Ok(Self {
            config: Arc::new(config),
            localization,
            transport,
            timeout,
        })
    }

    /// Overrides the configured request timeout (`None` waits forever).
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn config(&self) -> &GazetteerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn localization(&self) -> &Localization {
        &self.localization
    }

    pub fn mapper(&self) -> LocationMapper<'_> {
        LocationMapper::new(&self.localization).with_axis_order(self.config.axis_order)
    }

    /// A term search restricted to the configured object types.
    pub fn search_query(&self, term: &str, matching: Option<MatchingType>) -> SearchQuery {
        SearchQuery::new(term, matching).with_allowed_types(self.config.object_types.iter().cloned())
    }

    /// The `GetFeature` document [`GazetteerService::find_by_term`] would send.
    pub fn encode_search(&self, term: &str, matching: Option<MatchingType>) -> Result<String> {
        self.encode(&build_search_filter(&self.search_query(term, matching)))
    }

    /// The `GetFeature` document [`GazetteerService::get_by_id`] would send.
    pub fn encode_lookup(&self, id: &str) -> Result<String> {
        self.encode(&build_identity_filter(id))
    }

    /// Runs an arbitrary filter through the full pipeline.
    pub fn query(&self, filter: &FilterExpression) -> Result<Vec<Location>> {
        let body = self.encode(filter)?;
        let response = self
            .transport
            .post_xml(&self.config.url, &body, self.timeout)?;
        debug!(bytes = response.len(), "received WFS response");
        self.mapper().map_response(&response)
    }

    fn encode(&self, filter: &FilterExpression) -> Result<String> {
        GetFeatureRequest::new(&self.config.feature_type, &self.config.properties, filter).encode()
    }
}

impl<T: Transport> GazetteerService for WfsGazetteer<T> {
    fn find_by_term(&self, term: &str, matching: Option<MatchingType>) -> Result<Vec<Location>> {
        let query = self.search_query(term, matching);
        debug!(term, matching = %query.matching(), "find_by_term");
        self.query(&build_search_filter(&query))
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Location>> {
        debug!(id, "get_by_id");
        Ok(self.query(&build_identity_filter(id))?.into_iter().next())
    }

    fn locations_from_text(
        &self,
        _text: &str,
        _analyze_max_words: usize,
        _ignore_case: bool,
    ) -> Result<Vec<Location>> {
        warn!("locations_from_text is not supported by the WFS gazetteer");
        Err(GazetteerError::Unsupported("locations_from_text"))
    }

    fn related_locations(&self, _id: &str, _include_from: bool) -> Result<Vec<Location>> {
        warn!("related_locations is not supported by the WFS gazetteer");
        Err(GazetteerError::Unsupported("related_locations"))
    }
}
