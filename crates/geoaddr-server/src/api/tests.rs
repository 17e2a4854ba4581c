use std::sync::Mutex;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use geoaddr_core::{AccessLogEntry, LocationRecord, LookupError, PersistenceError};
use tower::ServiceExt;

use super::*;

// -------------------------------------------------------------------------
// Fakes
// -------------------------------------------------------------------------

#[derive(Clone)]
enum GeoBehavior {
    Hits(Vec<LocationRecord>),
    Fail(LookupError),
}

struct FakeGeocoder(GeoBehavior);

impl Geocoder for FakeGeocoder {
    async fn lookup(&self, _postal_code: &str) -> Result<Vec<LocationRecord>, LookupError> {
        match &self.0 {
            GeoBehavior::Hits(records) => Ok(records.clone()),
            GeoBehavior::Fail(err) => Err(err.clone()),
        }
    }
}

#[derive(Default)]
struct FakeStore {
    recorded: Mutex<Vec<String>>,
    down: bool,
}

impl AccessLogStore for FakeStore {
    async fn record(&self, postal_code: &str) -> Result<(), PersistenceError> {
        if self.down {
            return Err(PersistenceError::new("connection refused"));
        }
        self.recorded.lock().unwrap().push(postal_code.to_owned());
        Ok(())
    }

    async fn aggregate_counts(&self) -> Result<Vec<AccessLogEntry>, PersistenceError> {
        if self.down {
            return Err(PersistenceError::new("connection refused"));
        }
        Ok(vec![
            AccessLogEntry {
                postal_code: "1000005".to_owned(),
                request_count: 4,
            },
            AccessLogEntry {
                postal_code: "1500001".to_owned(),
                request_count: 1,
            },
        ])
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        if self.down {
            return Err(PersistenceError::new("connection refused"));
        }
        Ok(())
    }
}

fn app_with(geo: GeoBehavior, store: FakeStore) -> Router {
    build_app(AppState::new(Resolver::new(FakeGeocoder(geo), store)))
}

fn marunouchi_hits() -> GeoBehavior {
    GeoBehavior::Hits(vec![LocationRecord::new(
        "東京都",
        "千代田区",
        "丸の内",
        139.7671,
        35.6812,
    )])
}

async fn send_get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

// -------------------------------------------------------------------------
// GET /
// -------------------------------------------------------------------------

#[tokio::test]
async fn home_returns_banner() {
    let app = app_with(marunouchi_hits(), FakeStore::default());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    assert_eq!(&body[..], b"Hello World!\n");
}

// -------------------------------------------------------------------------
// GET /address
// -------------------------------------------------------------------------

#[tokio::test]
async fn address_returns_resolved_payload() {
    let (status, json) = send_get(
        app_with(marunouchi_hits(), FakeStore::default()),
        "/address?postal_code=1000005",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["postal_code"], "1000005");
    assert_eq!(json["hit_count"], 1);
    assert_eq!(json["address"], "東京都千代田区丸の内");
    let distance = json["tokyo_sta_distance"].as_f64().expect("distance");
    assert!((0.0..=0.1).contains(&distance), "got {distance}");
}

#[tokio::test]
async fn address_accepts_legacy_post_code_param() {
    let (status, json) = send_get(
        app_with(marunouchi_hits(), FakeStore::default()),
        "/address?post_code=1000005",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["postal_code"], "1000005");
}

#[tokio::test]
async fn address_without_param_is_bad_request() {
    for uri in ["/address", "/address?postal_code="] {
        let (status, json) = send_get(app_with(marunouchi_hits(), FakeStore::default()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(json["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn address_with_both_param_spellings_is_bad_request() {
    let (status, json) = send_get(
        app_with(marunouchi_hits(), FakeStore::default()),
        "/address?postal_code=1000005&post_code=1500001",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn address_with_no_hits_is_not_found() {
    let (status, json) = send_get(
        app_with(GeoBehavior::Hits(vec![]), FakeStore::default()),
        "/address?postal_code=0000000",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn address_upstream_failure_is_internal_error() {
    let (status, json) = send_get(
        app_with(
            GeoBehavior::Fail(LookupError::Unavailable("timeout".to_owned())),
            FakeStore::default(),
        ),
        "/address?postal_code=1000005",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "upstream_unavailable");
}

#[tokio::test]
async fn address_malformed_upstream_is_internal_error() {
    let (status, json) = send_get(
        app_with(
            GeoBehavior::Fail(LookupError::Malformed("bad x".to_owned())),
            FakeStore::default(),
        ),
        "/address?postal_code=1000005",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "malformed_upstream_data");
}

#[tokio::test]
async fn address_persistence_failure_is_internal_error() {
    let store = FakeStore {
        down: true,
        ..FakeStore::default()
    };
    let (status, json) = send_get(app_with(marunouchi_hits(), store), "/address?postal_code=1000005").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "internal_error");
    assert!(json.get("postal_code").is_none());
}

#[tokio::test]
async fn address_rejects_non_get_methods() {
    let app = app_with(marunouchi_hits(), FakeStore::default());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/address?postal_code=1000005")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// -------------------------------------------------------------------------
// GET /address/access_logs
// -------------------------------------------------------------------------

#[tokio::test]
async fn access_logs_returns_wrapped_counts() {
    let (status, json) = send_get(
        app_with(marunouchi_hits(), FakeStore::default()),
        "/address/access_logs",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let logs = json["access_logs"].as_array().expect("access_logs array");
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["postal_code"], "1000005");
    assert_eq!(logs[0]["request_count"], 4);
    assert_eq!(logs[1]["request_count"], 1);
}

#[tokio::test]
async fn access_logs_store_failure_is_internal_error() {
    let store = FakeStore {
        down: true,
        ..FakeStore::default()
    };
    let (status, _) = send_get(app_with(marunouchi_hits(), store), "/address/access_logs").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// -------------------------------------------------------------------------
// GET /health and middleware
// -------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok_when_store_is_up() {
    let (status, json) = send_get(app_with(marunouchi_hits(), FakeStore::default()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn health_reports_degraded_when_store_is_down() {
    let store = FakeStore {
        down: true,
        ..FakeStore::default()
    };
    let (status, json) = send_get(app_with(marunouchi_hits(), store), "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["database"], "unavailable");
}

#[tokio::test]
async fn request_id_header_is_echoed() {
    let app = app_with(marunouchi_hits(), FakeStore::default());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/address")
                .header(REQUEST_ID_HEADER, "req-abc")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
        Some("req-abc")
    );
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
    assert_eq!(json["meta"]["request_id"], "req-abc");
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("bad_request", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("upstream_unavailable", StatusCode::INTERNAL_SERVER_ERROR),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, expected) in cases {
        let response = ApiError::new("req-1", code, "msg").into_response();
        assert_eq!(response.status(), expected, "code {code}");
    }
}
