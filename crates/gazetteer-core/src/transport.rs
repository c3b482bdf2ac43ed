// crates/gazetteer-core/src/transport.rs

//! # Transport
//!
//! One POST per operation. The pipeline only sees the [`Transport`] trait;
//! [`HttpTransport`] is the blocking `reqwest` implementation used in
//! production. Tests plug in closures.

use crate::error::Result;
use std::time::Duration;

#[cfg(feature = "http")]
use crate::config::{GazetteerConfig, ProxyConfig};
#[cfg(feature = "http")]
use crate::error::GazetteerError;

/// Sends an encoded request and hands back the raw response body.
///
/// Implementations must apply `timeout` when given and report its expiry as
/// [`crate::GazetteerError::Timeout`], not as a transport failure. No
/// retries.
pub trait Transport: Send + Sync {
    fn post_xml(&self, url: &str, body: &str, timeout: Option<Duration>) -> Result<Vec<u8>>;
}

impl<F> Transport for F
where
    F: Fn(&str, &str, Option<Duration>) -> Result<Vec<u8>> + Send + Sync,
{
    fn post_xml(&self, url: &str, body: &str, timeout: Option<Duration>) -> Result<Vec<u8>> {
        self(url, body, timeout)
    }
}

// -----------------------------------------------------------------------------
// HTTP (reqwest, blocking)
// -----------------------------------------------------------------------------

#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpTransport {
    pub fn new(proxy: Option<&ProxyConfig>) -> Result<Self> {
        // No client-wide timeout: each call brings its own.
        let mut builder = reqwest::blocking::Client::builder().timeout(None::<Duration>);
        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.url())?);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_config(config: &GazetteerConfig) -> Result<Self> {
        Self::new(config.proxy.as_ref())
    }

    fn classify(err: reqwest::Error, timeout: Option<Duration>) -> GazetteerError {
        match timeout {
            Some(limit) if err.is_timeout() => GazetteerError::Timeout(limit),
            _ => GazetteerError::Transport(err),
        }
    }
}

#[cfg(feature = "http")]
impl Transport for HttpTransport {
    fn post_xml(&self, url: &str, body: &str, timeout: Option<Duration>) -> Result<Vec<u8>> {
        use reqwest::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE};

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/xml; charset=UTF-8")
            .body(body.to_owned());
        if cfg!(feature = "compact") {
            request = request.header(ACCEPT_ENCODING, "gzip");
        }
        if let Some(limit) = timeout {
            request = request.timeout(limit);
        }

        tracing::debug!(url, bytes = body.len(), "posting GetFeature request");
        let response = request.send().map_err(|e| Self::classify(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GazetteerError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let gzipped = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("gzip"));
        let bytes = response.bytes().map_err(|e| Self::classify(e, timeout))?;

        if gzipped {
            decode_gzip(&bytes)
        } else {
            Ok(bytes.to_vec())
        }
    }
}

/// Inflates a gzip-encoded body.
#[cfg(feature = "compact")]
pub fn decode_gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(all(feature = "http", not(feature = "compact")))]
fn decode_gzip(_bytes: &[u8]) -> Result<Vec<u8>> {
    Err(GazetteerError::MalformedResponse(
        "gzip-encoded response but 'compact' is disabled".into(),
    ))
}
