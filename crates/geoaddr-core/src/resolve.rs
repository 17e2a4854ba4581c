//! Resolution orchestration.
//!
//! [`Resolver`] ties a [`Geocoder`] and an [`AccessLogStore`] to the pure
//! reducers in [`crate::address`] and [`crate::distance`]. Both collaborators
//! are generic parameters; the server and CLI plug in the HTTP client and the
//! Postgres store, tests plug in in-memory fakes.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::address::common_address;
use crate::distance::reference_distance_km;
use crate::error::{LookupError, PersistenceError, ResolutionError};
use crate::location::LocationRecord;

/// Source of candidate locations for a postal code.
pub trait Geocoder: Send + Sync {
    fn lookup(
        &self,
        postal_code: &str,
    ) -> impl Future<Output = Result<Vec<LocationRecord>, LookupError>> + Send;
}

/// Append-only record of resolved postal codes.
pub trait AccessLogStore: Send + Sync {
    fn record(&self, postal_code: &str) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Per-postal-code request counts, highest count first. Tie order is
    /// unspecified.
    fn aggregate_counts(
        &self,
    ) -> impl Future<Output = Result<Vec<AccessLogEntry>, PersistenceError>> + Send;

    /// Liveness probe for health endpoints.
    fn ping(&self) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        async { Ok(()) }
    }
}

/// The answer for one postal code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub postal_code: String,
    pub hit_count: usize,
    pub address: String,
    /// Kilometres from Tokyo Station, rounded to 0.1.
    #[serde(rename = "tokyo_sta_distance")]
    pub reference_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub postal_code: String,
    pub request_count: i64,
}

pub struct Resolver<G, S> {
    geocoder: G,
    store: S,
}

impl<G, S> Resolver<G, S>
where
    G: Geocoder,
    S: AccessLogStore,
{
    pub fn new(geocoder: G, store: S) -> Self {
        Self { geocoder, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve `postal_code` to a canonical address and reference distance,
    /// then record the access.
    ///
    /// The access log write is part of the operation: if it fails, the
    /// computed result is discarded and [`ResolutionError::PersistenceFailure`]
    /// is returned.
    ///
    /// # Errors
    ///
    /// - [`ResolutionError::InvalidInput`] for an empty or blank postal code;
    ///   the geocoder is not called.
    /// - [`ResolutionError::UpstreamUnavailable`] /
    ///   [`ResolutionError::MalformedUpstreamData`] when the lookup fails.
    /// - [`ResolutionError::NotFound`] when the lookup returns no locations.
    /// - [`ResolutionError::PersistenceFailure`] when the access log write fails.
    pub async fn resolve(&self, postal_code: &str) -> Result<ResolvedAddress, ResolutionError> {
        if postal_code.trim().is_empty() {
            return Err(ResolutionError::InvalidInput);
        }
        tracing::debug!(postal_code, "resolving postal code");

        let records = self.geocoder.lookup(postal_code).await.map_err(|e| {
            tracing::warn!(postal_code, error = %e, "geocoding lookup failed");
            ResolutionError::from(e)
        })?;

        let Some(reference_distance) = reference_distance_km(&records) else {
            tracing::info!(postal_code, "no locations for postal code");
            return Err(ResolutionError::NotFound {
                postal_code: postal_code.to_owned(),
            });
        };

        let resolved = ResolvedAddress {
            postal_code: postal_code.to_owned(),
            hit_count: records.len(),
            address: common_address(&records),
            reference_distance,
        };

        self.store.record(postal_code).await.map_err(|e| {
            tracing::error!(postal_code, error = %e, "failed to record access log");
            ResolutionError::from(e)
        })?;

        tracing::info!(
            postal_code,
            hit_count = resolved.hit_count,
            address = %resolved.address,
            distance_km = resolved.reference_distance,
            "resolved postal code"
        );
        Ok(resolved)
    }

    /// Request counts per postal code, highest first.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::PersistenceFailure`] if the store cannot be
    /// read.
    pub async fn list_access_counts(&self) -> Result<Vec<AccessLogEntry>, ResolutionError> {
        self.store.aggregate_counts().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read access log counts");
            ResolutionError::from(e)
        })
    }
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
