//! alumni-map library - alumni roster service
//!
//! Maintains student records with geocoded coordinates and imports them in
//! bulk from CSV uploads or public Google Sheets.

use alumni_common::config::ServiceConfig;
use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use services::{Geocoder, NominatimGeocoder, Reconciler, SheetFetcher};
use store::RecordStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store (also reachable through the reconciler)
    pub store: Arc<dyn RecordStore>,
    /// Import and create/update orchestration
    pub reconciler: Arc<Reconciler>,
    /// Google Sheets export downloader
    pub sheet_fetcher: Arc<SheetFetcher>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        store: Arc<dyn RecordStore>,
        geocoder: Arc<dyn Geocoder>,
        sheet_fetcher: SheetFetcher,
    ) -> Self {
        let reconciler = Reconciler::new(geocoder, Arc::clone(&store));
        Self {
            store,
            reconciler: Arc::new(reconciler),
            sheet_fetcher: Arc::new(sheet_fetcher),
        }
    }

    /// Wire production collaborators from configuration
    pub fn from_config(config: &ServiceConfig) -> alumni_common::Result<Self> {
        let store = store::open_store(config);
        let geocoder = NominatimGeocoder::new(&config.geocoder)?;
        let sheet_fetcher = SheetFetcher::new(&config.sheets)?;
        Ok(Self::new(store, Arc::new(geocoder), sheet_fetcher))
    }
}

/// Build application router (routes only, no middleware)
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::student_routes())
        .merge(api::import_routes())
        .with_state(state)
}

/// Build the served application: routes plus CORS and request tracing
pub fn build_app(state: AppState, config: &ServiceConfig) -> Router {
    build_router(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// CORS policy for the configured origins
///
/// `*` allows any origin without credentials. An explicit list allows those
/// origins with credentials, mirroring requested methods and headers.
pub fn cors_layer(config: &ServiceConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
