use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use geoaddr_core::{AccessLogEntry, AccessLogStore, Geocoder, ResolvedAddress};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_resolution_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AddressQuery {
    /// Earlier clients sent `post_code`.
    #[serde(default, alias = "post_code")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AccessLogsResponse {
    pub access_logs: Vec<AccessLogEntry>,
}

pub(super) async fn get_address<G, S>(
    State(state): State<AppState<G, S>>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<AddressQuery>, QueryRejection>,
) -> Result<Json<ResolvedAddress>, ApiError>
where
    G: Geocoder,
    S: AccessLogStore,
{
    // Sending both `postal_code` and `post_code` is a duplicate-field error.
    let Query(query) = query.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })?;
    let postal_code = query.postal_code.unwrap_or_default();
    let resolved = state
        .resolver
        .resolve(&postal_code)
        .await
        .map_err(|e| map_resolution_error(req_id.0.clone(), &e))?;

    Ok(Json(resolved))
}

pub(super) async fn list_access_logs<G, S>(
    State(state): State<AppState<G, S>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<AccessLogsResponse>, ApiError>
where
    G: Geocoder,
    S: AccessLogStore,
{
    let access_logs = state
        .resolver
        .list_access_counts()
        .await
        .map_err(|e| map_resolution_error(req_id.0.clone(), &e))?;

    Ok(Json(AccessLogsResponse { access_logs }))
}
