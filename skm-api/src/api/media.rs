//! Raw audio and cover files
//!
//! Public routes streaming files straight from the catalog folders.

use std::path::PathBuf;

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /audio/:file_name
pub async fn serve_audio(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> ApiResult<Response> {
    let path = plain_file_name(&file_name).map(|name| state.layout.audio_path(name));
    stream_file(path, "audio/mpeg", "Audio file not found").await
}

/// GET /cover/:file_name
pub async fn serve_cover(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> ApiResult<Response> {
    let path = plain_file_name(&file_name).map(|name| state.layout.cover_file_path(name));
    stream_file(path, "image/jpeg", "Cover image not found").await
}

/// Accept bare file names only; nothing that could leave the folder
fn plain_file_name(name: &str) -> Option<&str> {
    let invalid = name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        None
    } else {
        Some(name)
    }
}

async fn stream_file(
    path: Option<PathBuf>,
    content_type: &'static str,
    not_found: &str,
) -> ApiResult<Response> {
    let Some(path) = path else {
        return Err(ApiError::NotFound(not_found.to_string()));
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            debug!("Cannot open {}: {}", path.display(), e);
            return Err(ApiError::NotFound(not_found.to_string()));
        }
    };

    // Directories open fine on some platforms but cannot be streamed
    let is_file = file.metadata().await.map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
        return Err(ApiError::NotFound(not_found.to_string()));
    }

    let body = Body::from_stream(ReaderStream::new(file));
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_name() {
        assert_eq!(plain_file_name("rain.mp3"), Some("rain.mp3"));
        assert_eq!(plain_file_name("rain drops.jpg"), Some("rain drops.jpg"));
        assert_eq!(plain_file_name(""), None);
        assert_eq!(plain_file_name(".."), None);
        assert_eq!(plain_file_name("../alarms.db"), None);
        assert_eq!(plain_file_name("sub/rain.mp3"), None);
        assert_eq!(plain_file_name("sub\\rain.mp3"), None);
    }
}
