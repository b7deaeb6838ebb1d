//! Sound catalog endpoint
//!
//! Search, filter and sort parameters are read from request headers
//! first, falling back to query-string parameters of the same name.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use tracing::debug;

use crate::catalog::{self, CatalogQuery, Sound};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /sounds
///
/// Rebuilds the catalog from disk, then applies the query. An empty
/// outcome is a 404, not an empty list.
pub async fn list_sounds(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Sound>>> {
    let query = CatalogQuery::from_params(|name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| params.get(name).cloned())
    });
    debug!(?query, "Catalog request");

    let layout = state.layout.clone();
    let sounds = tokio::task::spawn_blocking(move || catalog::build_catalog(&layout))
        .await
        .map_err(|e| ApiError::Internal(format!("Catalog scan failed: {}", e)))?;

    catalog::apply(sounds, &query)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No sounds found".to_string()))
}
