// crates/gazetteer-core/src/config.rs

//! # Service Configuration
//!
//! Endpoint, requested feature type and properties, the object-type
//! whitelist and transport settings. Loaded once from JSON, then shared
//! read-only behind an `Arc`.

use crate::error::{GazetteerError, Result};
use crate::filter::SCHEMA_PREFIX;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_URL: &str = "WFS_GAZETTEER_URL";
pub const ENV_PROXY_HOST: &str = "HTTP_PROXY_HOST";
pub const ENV_PROXY_PORT: &str = "HTTP_PROXY_PORT";

/// Qualified name of the feature type a GetFeature query targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureTypeName {
    pub prefix: String,
    pub namespace: String,
    pub local_name: String,
}

impl FeatureTypeName {
    /// `prefix:local_name`, as written into `typeName`.
    pub fn qualified(&self) -> String {
        format!("{}:{}", self.prefix, self.local_name)
    }
}

impl Default for FeatureTypeName {
    fn default() -> Self {
        Self {
            prefix: "gn".into(),
            namespace: "http://www.geodatenzentrum.de/gnde".into(),
            local_name: "GnObjekt".into(),
        }
    }
}

/// Order of the two ordinates in GML `pos` / `posList` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrder {
    #[default]
    LonLat,
    LatLon,
}

impl AxisOrder {
    /// Reorders a raw `(first, second)` pair into `(lon, lat)`.
    #[inline]
    pub fn to_lon_lat(self, pair: (f64, f64)) -> (f64, f64) {
        match self {
            AxisOrder::LonLat => pair,
            AxisOrder::LatLon => (pair.1, pair.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazetteerConfig {
    pub url: String,
    #[serde(default)]
    pub feature_type: FeatureTypeName,
    /// Requested output properties. Empty means full features.
    #[serde(default)]
    pub properties: Vec<String>,
    /// Allowed object-type codes for term searches.
    #[serde(default)]
    pub object_types: Vec<String>,
    #[serde(default)]
    pub axis_order: AxisOrder,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
}

impl GazetteerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            feature_type: FeatureTypeName::default(),
            properties: Vec::new(),
            object_types: Vec::new(),
            axis_order: AxisOrder::default(),
            timeout_secs: None,
            proxy: None,
        }
    }

    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    pub fn default_path() -> PathBuf {
        Self::default_data_dir().join("wfs.json")
    }

    /// **Standard Loader:** bundled file, then environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_with_env(Self::default_path())
    }

    /// Reads `path`, applies the environment overrides, then validates.
    pub fn load_with_env(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_overrides(path, |key| std::env::var(key).ok())
    }

    fn load_with_overrides(
        path: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::read_from_path(path)?;
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates `path`, without environment overrides.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read_from_path(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Deserializes `path` only. The result may still be invalid.
    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            GazetteerError::Config(format!("cannot open {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Applies `WFS_GAZETTEER_URL` and the `HTTP_PROXY_HOST`/`HTTP_PROXY_PORT`
    /// pair from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_URL).filter(|u| !u.trim().is_empty()) {
            self.url = url.trim().to_string();
        }

        let host = lookup(ENV_PROXY_HOST).filter(|h| !h.trim().is_empty());
        let port = lookup(ENV_PROXY_PORT).and_then(|p| p.trim().parse::<u16>().ok());
        if let (Some(host), Some(port)) = (host, port) {
            self.proxy = Some(ProxyConfig {
                host: host.trim().to_string(),
                port,
            });
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(GazetteerError::Config("`url` must not be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(GazetteerError::Config(format!(
                "`url` must be an http(s) URL, got {url}"
            )));
        }
        if self.feature_type.prefix.is_empty() || self.feature_type.local_name.is_empty() {
            return Err(GazetteerError::Config(
                "`feature_type` needs a prefix and a local name".into(),
            ));
        }
        // Filter property paths are written with this prefix, and the request
        // only declares the feature type's own prefix.
        if self.feature_type.prefix != SCHEMA_PREFIX {
            return Err(GazetteerError::Config(format!(
                "`feature_type.prefix` must be `{SCHEMA_PREFIX}`, got `{}`",
                self.feature_type.prefix
            )));
        }
        if let Some(proxy) = &self.proxy {
            if proxy.host.trim().is_empty() || proxy.port == 0 {
                return Err(GazetteerError::Config(format!(
                    "invalid proxy {}:{}",
                    proxy.host, proxy.port
                )));
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(GazetteerError::Config("`timeout_secs` must be > 0".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
