mod address;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use geoaddr_core::{AccessLogStore, Geocoder, ResolutionError, Resolver};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

pub struct AppState<G, S> {
    pub resolver: Arc<Resolver<G, S>>,
}

impl<G, S> AppState<G, S> {
    pub fn new(resolver: Resolver<G, S>) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

// Manual impl: a derive would require `G: Clone` and `S: Clone`.
impl<G, S> Clone for AppState<G, S> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_resolution_error(request_id: String, error: &ResolutionError) -> ApiError {
    match error {
        ResolutionError::InvalidInput => {
            ApiError::new(request_id, "bad_request", "postal_code is required")
        }
        ResolutionError::NotFound { .. } => {
            ApiError::new(request_id, "not_found", error.to_string())
        }
        ResolutionError::UpstreamUnavailable { .. } => {
            ApiError::new(request_id, "upstream_unavailable", "geocoding provider unavailable")
        }
        ResolutionError::MalformedUpstreamData { .. } => ApiError::new(
            request_id,
            "malformed_upstream_data",
            "geocoding provider returned malformed data",
        ),
        ResolutionError::PersistenceFailure(_) => {
            ApiError::new(request_id, "internal_error", "failed to record access log")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app<G, S>(state: AppState<G, S>) -> Router
where
    G: Geocoder + 'static,
    S: AccessLogStore + 'static,
{
    Router::new()
        .route("/", get(home))
        .route("/health", get(health::<G, S>))
        .route("/address", get(address::get_address::<G, S>))
        .route(
            "/address/access_logs",
            get(address::list_access_logs::<G, S>),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn home() -> &'static str {
    "Hello World!\n"
}

async fn health<G, S>(State(state): State<AppState<G, S>>) -> impl IntoResponse
where
    G: Geocoder,
    S: AccessLogStore,
{
    match state.resolver.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests;
