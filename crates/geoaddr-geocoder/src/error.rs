use geoaddr_core::LookupError;
use thiserror::Error;

/// Errors returned by the HeartRails geocoding client.
#[derive(Debug, Error)]
pub enum GeocoderError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A coordinate field was not a finite decimal number.
    #[error("invalid coordinate {field}={value:?}")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl From<GeocoderError> for LookupError {
    fn from(err: GeocoderError) -> Self {
        match err {
            GeocoderError::Http(_)
            | GeocoderError::UnexpectedStatus { .. }
            | GeocoderError::InvalidBaseUrl { .. } => LookupError::Unavailable(err.to_string()),
            GeocoderError::Deserialize { .. } | GeocoderError::InvalidCoordinate { .. } => {
                LookupError::Malformed(err.to_string())
            }
        }
    }
}
