use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Failure reported by a [`crate::Geocoder`] implementation.
///
/// Implementations classify their own errors into one of these two buckets;
/// the resolver maps them onto [`ResolutionError`] without inspecting them
/// further.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Transport failure, timeout, or a non-success status from the provider.
    #[error("geocoding provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered, but the payload broke its contract
    /// (unparseable body, non-numeric coordinates).
    #[error("geocoding provider returned malformed data: {0}")]
    Malformed(String),
}

/// Failure reported by a [`crate::AccessLogStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("access log store failure: {message}")]
pub struct PersistenceError {
    pub message: String,
}

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Every way a resolution request can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("postal code must not be empty")]
    InvalidInput,

    #[error("no locations found for postal code {postal_code}")]
    NotFound { postal_code: String },

    #[error("geocoding provider unavailable: {reason}")]
    UpstreamUnavailable { reason: String },

    #[error("geocoding provider returned malformed data: {reason}")]
    MalformedUpstreamData { reason: String },

    #[error("failed to persist access log: {0}")]
    PersistenceFailure(#[source] PersistenceError),
}

impl From<LookupError> for ResolutionError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Unavailable(reason) => Self::UpstreamUnavailable { reason },
            LookupError::Malformed(reason) => Self::MalformedUpstreamData { reason },
        }
    }
}

impl From<PersistenceError> for ResolutionError {
    fn from(err: PersistenceError) -> Self {
        Self::PersistenceFailure(err)
    }
}
