//! API key middleware
//!
//! Protected routes require an `X-API-Key` header whose value is on the
//! configured allow-list. The accepted key is handed to handlers as an
//! [`ApiKey`] request extension; alarm handlers use it as the owner scope.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use skm_common::api::API_KEY_HEADER;
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

/// Key that passed the middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(pub String);

/// Authentication middleware
///
/// Returns 401 with a JSON error body when the key is missing or unknown.
/// Applied to protected routes only.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match presented {
        Some(key) if state.keys.is_valid(&key) => {
            request.extensions_mut().insert(ApiKey(key));
            Ok(next.run(request).await)
        }
        Some(_) => {
            warn!("Rejected request to {}: unknown API key", request.uri().path());
            Err(unauthorized())
        }
        None => {
            warn!("Rejected request to {}: no API key", request.uri().path());
            Err(unauthorized())
        }
    }
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Unauthorized: Invalid or missing API key".to_string())
}
