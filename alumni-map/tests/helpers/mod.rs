//! Shared test utilities for alumni-map integration tests
//!
//! - `StubGeocoder`: fixed location table, counts lookups
//! - `spawn_host`: local HTTP server standing in for Google Sheets / Nominatim
//! - request builders and JSON body extraction

#![allow(dead_code)]

use alumni_common::config::SheetsConfig;
use alumni_common::Coordinates;
use alumni_map::services::{Geocoder, SheetFetcher};
use alumni_map::store::RecordStore;
use alumni_map::AppState;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Geocoder answering from a fixed table; unknown places are not found
#[derive(Default)]
pub struct StubGeocoder {
    places: HashMap<String, Coordinates>,
    calls: AtomicUsize,
    queried: Mutex<Vec<String>>,
}

impl StubGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, location: &str, latitude: f64, longitude: f64) -> Self {
        self.places
            .insert(location.to_string(), Coordinates::new(latitude, longitude));
        self
    }

    /// Number of lookups performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Locations passed to `resolve`, in call order
    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, location: &str) -> Option<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queried.lock().unwrap().push(location.to_string());
        self.places.get(location).copied()
    }
}

/// Default geocoder for tests: London and Paris resolve, everything else not found
pub fn stub_geocoder() -> Arc<StubGeocoder> {
    Arc::new(
        StubGeocoder::new()
            .with_place("London", 51.5072, -0.1276)
            .with_place("Paris", 48.8566, 2.3522),
    )
}

/// Sheet fetcher pointed at `export_base`
pub fn sheet_fetcher(export_base: &str) -> SheetFetcher {
    SheetFetcher::new(&SheetsConfig {
        export_base: export_base.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

/// App state over `store` with a stub geocoder and a sheet host at `export_base`
pub fn test_state(
    store: Arc<dyn RecordStore>,
    geocoder: Arc<StubGeocoder>,
    export_base: &str,
) -> AppState {
    AppState::new(store, geocoder, sheet_fetcher(export_base))
}

/// Serve `app` on an ephemeral local port; returns its base URL
pub async fn spawn_host(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Paths and queries received by a fake host
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// Fake Google Sheets host answering every export request with `status`/`body`
pub async fn spawn_sheet_host(status: u16, body: &'static str) -> (String, RequestLog) {
    use axum::extract::{Path, RawQuery};
    use axum::http::StatusCode;
    use axum::routing::get;

    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let handler_log = Arc::clone(&log);
    let status = StatusCode::from_u16(status).unwrap();

    let app = Router::new().route(
        "/d/:id/export",
        get(move |Path(id): Path<String>, RawQuery(query): RawQuery| {
            let log = Arc::clone(&handler_log);
            async move {
                log.lock()
                    .unwrap()
                    .push(format!("{}?{}", id, query.unwrap_or_default()));
                (status, body)
            }
        }),
    );

    (spawn_host(app).await, log)
}

/// Request with empty body
pub fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Request with JSON body
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Multipart upload with a single file field
pub fn multipart_request(uri: &str, field: &str, filename: &str, content: &str) -> Request<Body> {
    let boundary = "alumni-map-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\
         \r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    );

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
