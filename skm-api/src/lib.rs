//! skm-api library - Skills Music API service
//!
//! Sound catalog built from an assets folder, plus per-key alarm CRUD
//! over SQLite.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use serde_json::Value;
use skm_common::api::ApiKeys;
use skm_common::config::{CatalogLayout, ServiceConfig};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod db;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Largest request body accepted (alarm payloads are a few hundred bytes)
pub const MAX_BODY_BYTES: usize = 64 * 1024;

use crate::db::AlarmStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Alarm persistence (carries the scoping mode)
    pub alarms: AlarmStore,
    /// Accepted API keys
    pub keys: ApiKeys,
    /// Where the catalog is scanned from
    pub layout: Arc<CatalogLayout>,
    /// Whether `GET /sounds` needs an API key
    pub catalog_requires_key: bool,
    /// Document served at `/doc`
    pub openapi: Arc<Value>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        alarms: AlarmStore,
        keys: ApiKeys,
        layout: CatalogLayout,
        catalog_requires_key: bool,
        openapi: Value,
    ) -> Self {
        Self {
            alarms,
            keys,
            layout: Arc::new(layout),
            catalog_requires_key,
            openapi: Arc::new(openapi),
        }
    }

    /// State for a resolved service configuration
    ///
    /// Fails only when a configured OpenAPI document cannot be loaded.
    pub fn from_config(pool: SqlitePool, config: &ServiceConfig) -> Result<Self> {
        let keys = config.api_keys();
        let openapi = match &config.openapi_path {
            Some(path) => api::ui::load_openapi(path)?,
            None => api::ui::embedded_openapi()?,
        };

        Ok(Self::new(
            AlarmStore::new(pool, keys.clone(), config.alarm_scoping),
            keys,
            config.catalog_layout(),
            config.catalog_requires_key,
            openapi,
        ))
    }
}

/// Build application router
///
/// Public: key check, documentation, raw media, health, and the catalog
/// when configured as public. Everything else requires an API key.
pub fn build_router(state: AppState) -> Router {
    use axum::extract::DefaultBodyLimit;
    use axum::middleware;
    use axum::routing::{get, patch, post};

    // Protected routes (require an API key)
    let mut protected = Router::new()
        .route("/alarms", post(api::create_alarm).get(api::list_alarms))
        .route(
            "/alarms/:id",
            get(api::get_alarm)
                .put(api::update_alarm)
                .delete(api::delete_alarm),
        )
        .route("/alarms/:id/toggle", patch(api::toggle_alarm))
        .route("/alarms/active/:time", get(api::active_alarms_at_time));

    // Public routes (no API key)
    let mut public = Router::new()
        .route("/validate-key", get(api::validate_key))
        .route("/ui", get(api::serve_index))
        .route("/doc", get(api::openapi_document))
        .route("/swagger-config", get(api::swagger_config))
        .route("/audio/:file_name", get(api::serve_audio))
        .route("/cover/:file_name", get(api::serve_cover))
        .merge(api::health_routes());

    if state.catalog_requires_key {
        protected = protected.route("/sounds", get(api::list_sounds));
    } else {
        public = public.route("/sounds", get(api::list_sounds));
    }

    let protected = protected.layer(middleware::from_fn_with_state(
        state.clone(),
        api::auth_middleware,
    ));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
