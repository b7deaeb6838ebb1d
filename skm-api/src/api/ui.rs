//! Documentation routes
//!
//! `/ui` serves the interactive documentation page, which loads the
//! OpenAPI document from `/doc` and its options from `/swagger-config`.

use std::path::Path;

use anyhow::{Context, Result};
use axum::{extract::State, response::Html, Json};
use serde_json::{json, Value};

use crate::AppState;

const INDEX_HTML: &str = include_str!("../ui/index.html");
const OPENAPI_JSON: &str = include_str!("../ui/openapi.json");

/// GET /ui
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /swagger-config
pub async fn swagger_config() -> Json<Value> {
    Json(json!({
        "persistAuthorization": true,
        "displayRequestDuration": true,
        "docExpansion": "list",
        "filter": true,
        "tryItOutEnabled": true,
    }))
}

/// GET /doc
pub async fn openapi_document(State(state): State<AppState>) -> Json<Value> {
    Json(state.openapi.as_ref().clone())
}

/// The OpenAPI document compiled into the binary
pub fn embedded_openapi() -> Result<Value> {
    serde_json::from_str(OPENAPI_JSON).context("Embedded OpenAPI document is not valid JSON")
}

/// Load an OpenAPI document from a JSON file
pub fn load_openapi(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read OpenAPI document {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("OpenAPI document {} is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_document_parses() {
        let doc = embedded_openapi().unwrap();
        assert_eq!(doc["info"]["title"], "Skills Music API");
        assert!(doc["paths"]["/alarms/{id}/toggle"]["patch"].is_object());
    }

    #[test]
    fn test_load_missing_document_fails() {
        assert!(load_openapi(Path::new("/nonexistent/openapi.json")).is_err());
    }
}
