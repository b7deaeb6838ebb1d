//! Credential check endpoint

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::Serialize;
use skm_common::api::API_KEY_HEADER;

use crate::AppState;

/// Outcome of a key check
#[derive(Debug, Serialize)]
pub struct KeyValidation {
    pub valid: bool,
    pub message: &'static str,
}

/// GET /validate-key
///
/// Public. 200 when the `X-API-Key` header holds an accepted key, 401
/// otherwise.
pub async fn validate_key(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<KeyValidation>) {
    let presented = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());

    let (status, valid, message) = match presented {
        None => (StatusCode::UNAUTHORIZED, false, "No API key provided"),
        Some(key) if state.keys.is_valid(key) => (StatusCode::OK, true, "API key is valid"),
        Some(_) => (StatusCode::UNAUTHORIZED, false, "Invalid API key"),
    };

    (status, Json(KeyValidation { valid, message }))
}
