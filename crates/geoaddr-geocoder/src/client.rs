//! HTTP client for the HeartRails Geo API.
//!
//! Wraps `reqwest` with provider-specific URL building, envelope decoding,
//! coordinate parsing, and optional retry on transient failures. Implements
//! [`geoaddr_core::Geocoder`] so it can be handed straight to a
//! [`geoaddr_core::Resolver`].

use std::time::Duration;

use geoaddr_core::config::{DEFAULT_GEOCODER_BASE_URL, DEFAULT_GEOCODER_USER_AGENT};
use geoaddr_core::{AppConfig, Geocoder, LocationRecord, LookupError};
use reqwest::{Client, Url};

use crate::error::GeocoderError;
use crate::retry::retry_with_backoff;
use crate::types::GeoApiResponse;

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODER_BASE_URL.to_owned(),
            timeout_secs: 30,
            user_agent: DEFAULT_GEOCODER_USER_AGENT.to_owned(),
            max_retries: 0,
            retry_backoff_ms: 500,
        }
    }
}

impl GeocoderConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.geocoder_base_url.clone(),
            timeout_secs: config.geocoder_timeout_secs,
            user_agent: config.geocoder_user_agent.clone(),
            max_retries: config.geocoder_max_retries,
            retry_backoff_ms: config.geocoder_retry_backoff_ms,
        }
    }
}

/// Client for the HeartRails `searchByPostal` endpoint.
///
/// Use [`HeartRailsClient::new`] with a [`GeocoderConfig`], or
/// [`HeartRailsClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct HeartRailsClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl HeartRailsClient {
    /// # Errors
    ///
    /// Returns [`GeocoderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocoderError::InvalidBaseUrl`] if
    /// `config.base_url` does not parse.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocoderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let base_url =
            Url::parse(config.base_url.trim()).map_err(|e| GeocoderError::InvalidBaseUrl {
                base_url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    /// Creates a client with default settings against a custom base URL.
    ///
    /// # Errors
    ///
    /// Same as [`HeartRailsClient::new`].
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, GeocoderError> {
        Self::new(&GeocoderConfig {
            base_url: base_url.to_owned(),
            timeout_secs,
            ..GeocoderConfig::default()
        })
    }

    /// Looks up every location registered for `postal_code`.
    ///
    /// An "unknown postal code" answer from the provider yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`GeocoderError::Http`] / [`GeocoderError::UnexpectedStatus`] on
    ///   transport failure or non-2xx status (after retries, if configured).
    /// - [`GeocoderError::Deserialize`] if the body is not the expected JSON.
    /// - [`GeocoderError::InvalidCoordinate`] if any `x`/`y` is not a finite number.
    pub async fn search_by_postal(
        &self,
        postal_code: &str,
    ) -> Result<Vec<LocationRecord>, GeocoderError> {
        let url = self.build_url(postal_code);
        let envelope = retry_with_backoff(self.max_retries, self.retry_backoff_ms, || {
            self.request_envelope(&url)
        })
        .await?;

        let body = envelope.response;
        if body.location.is_empty() {
            if let Some(message) = body.error {
                tracing::debug!(postal_code, message = %message, "provider reported no match");
            }
            return Ok(Vec::new());
        }

        body.location
            .into_iter()
            .map(crate::types::RawLocation::into_record)
            .collect()
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(&self, postal_code: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("method", "searchByPostal")
            .append_pair("postal", postal_code);
        url
    }

    async fn request_envelope(&self, url: &Url) -> Result<GeoApiResponse, GeocoderError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocoderError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        tracing::debug!(url = %url, bytes = body.len(), "geocoder response received");
        serde_json::from_str(&body).map_err(|e| GeocoderError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

impl Geocoder for HeartRailsClient {
    async fn lookup(&self, postal_code: &str) -> Result<Vec<LocationRecord>, LookupError> {
        self.search_by_postal(postal_code)
            .await
            .map_err(LookupError::from)
    }
}
