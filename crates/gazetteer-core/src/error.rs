// crates/gazetteer-core/src/error.rs
use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong between building a query and handing back
/// mapped locations.
///
/// "No match" is never an error: an empty result is `Ok(vec![])` or
/// `Ok(None)`. Transport problems, timeouts and broken documents each get
/// their own variant so callers can tell them apart.
#[derive(Debug, Error)]
pub enum GazetteerError {
    /// Connection, TLS or body-read failure.
    #[cfg(feature = "http")]
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("WFS server at {url} answered with HTTP {status}")]
    Http { status: u16, url: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The feature collection itself could not be read. No partial result.
    #[error("malformed WFS response: {0}")]
    MalformedResponse(String),

    /// The server sent an OWS exception report instead of features.
    #[error("WFS service exception: {0}")]
    ServiceException(String),

    #[error("failed to encode GetFeature request: {0}")]
    Encode(String),

    #[error("operation not supported by the WFS gazetteer: {0}")]
    Unsupported(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GazetteerError {
    /// `true` for failures caused by talking to the server rather than by
    /// what it sent back. A [`GazetteerError::Timeout`] is not one of them.
    pub fn is_transport(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            GazetteerError::Transport(_) => true,
            GazetteerError::Http { .. } => true,
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GazetteerError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, GazetteerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_not_transport_failures() {
        let timeout = GazetteerError::Timeout(Duration::from_secs(3));
        assert!(timeout.is_timeout());
        assert!(!timeout.is_transport());

        let http = GazetteerError::Http {
            status: 502,
            url: "https://wfs.example/gnde".into(),
        };
        assert!(http.is_transport());
        assert!(!http.is_timeout());
        assert!(!GazetteerError::MalformedResponse("x".into()).is_transport());
    }
}
