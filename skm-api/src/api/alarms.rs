//! Alarm endpoints
//!
//! All routes sit behind the API key middleware. The caller's key is the
//! owner scope passed to the store; with scoping disabled the store
//! ignores it.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use skm_common::db::Alarm;
use tracing::{info, warn};

use crate::api::auth::ApiKey;
use crate::db::{AlarmUpdate, StoreError};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /alarms body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlarmRequest {
    pub sound_id: i64,
    pub sound_name: String,
    pub alarm_time: String,
}

fn alarm_not_found() -> ApiError {
    ApiError::NotFound("Alarm not found".to_string())
}

/// Non-numeric ids cannot name an alarm
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse().map_err(|_| alarm_not_found())
}

/// Map a store error raised by a write
///
/// Database failures during writes surface as 400 with `message`.
fn write_error(e: StoreError, message: &str) -> ApiError {
    match e {
        StoreError::Unauthorized => {
            ApiError::Unauthorized("Unauthorized: Invalid or missing API key".to_string())
        }
        StoreError::NotFound(_) => alarm_not_found(),
        StoreError::Database(e) => {
            warn!("{}: {}", message, e);
            ApiError::BadRequest(message.to_string())
        }
    }
}

fn read_error(e: StoreError) -> ApiError {
    match e {
        StoreError::Unauthorized => {
            ApiError::Unauthorized("Unauthorized: Invalid or missing API key".to_string())
        }
        StoreError::NotFound(_) => alarm_not_found(),
        StoreError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
}

/// POST /alarms
pub async fn create_alarm(
    State(state): State<AppState>,
    Extension(ApiKey(key)): Extension<ApiKey>,
    payload: Result<Json<CreateAlarmRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Alarm>)> {
    const FAILED: &str = "Failed to create alarm";

    let Json(request) = payload.map_err(|e| {
        warn!("Rejected alarm payload: {}", e);
        ApiError::BadRequest(FAILED.to_string())
    })?;

    let alarm = state
        .alarms
        .create(
            Some(&key),
            request.sound_id,
            &request.sound_name,
            &request.alarm_time,
        )
        .await
        .map_err(|e| write_error(e, FAILED))?;

    info!(id = alarm.id, alarm_time = %alarm.alarm_time, "Alarm created");
    Ok((StatusCode::CREATED, Json(alarm)))
}

/// GET /alarms
pub async fn list_alarms(
    State(state): State<AppState>,
    Extension(ApiKey(key)): Extension<ApiKey>,
) -> ApiResult<Json<Vec<Alarm>>> {
    let alarms = state.alarms.list(Some(&key)).await.map_err(read_error)?;
    Ok(Json(alarms))
}

/// GET /alarms/:id
pub async fn get_alarm(
    State(state): State<AppState>,
    Extension(ApiKey(key)): Extension<ApiKey>,
    Path(id): Path<String>,
) -> ApiResult<Json<Alarm>> {
    let id = parse_id(&id)?;
    state
        .alarms
        .get_by_id(Some(&key), id)
        .await
        .map_err(read_error)?
        .map(Json)
        .ok_or_else(alarm_not_found)
}

/// PUT /alarms/:id
pub async fn update_alarm(
    State(state): State<AppState>,
    Extension(ApiKey(key)): Extension<ApiKey>,
    Path(id): Path<String>,
    payload: Result<Json<AlarmUpdate>, JsonRejection>,
) -> ApiResult<Json<Alarm>> {
    const FAILED: &str = "Failed to update alarm";

    let id = parse_id(&id)?;
    let Json(update) = payload.map_err(|e| {
        warn!("Rejected alarm update: {}", e);
        ApiError::BadRequest(FAILED.to_string())
    })?;

    let alarm = state
        .alarms
        .update(Some(&key), id, &update)
        .await
        .map_err(|e| write_error(e, FAILED))?;

    Ok(Json(alarm))
}

/// DELETE /alarms/:id
///
/// Succeeds whether or not the alarm existed.
pub async fn delete_alarm(
    State(state): State<AppState>,
    Extension(ApiKey(key)): Extension<ApiKey>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    const FAILED: &str = "Failed to delete alarm";

    if let Ok(id) = id.parse::<i64>() {
        state
            .alarms
            .delete(Some(&key), id)
            .await
            .map_err(|e| write_error(e, FAILED))?;
    }

    Ok(Json(json!({ "message": "Alarm deleted successfully" })))
}

/// PATCH /alarms/:id/toggle
pub async fn toggle_alarm(
    State(state): State<AppState>,
    Extension(ApiKey(key)): Extension<ApiKey>,
    Path(id): Path<String>,
) -> ApiResult<Json<Alarm>> {
    let id = parse_id(&id)?;
    let alarm = state
        .alarms
        .toggle(Some(&key), id)
        .await
        .map_err(|e| write_error(e, "Failed to toggle alarm status"))?;

    Ok(Json(alarm))
}

/// GET /alarms/active/:time
pub async fn active_alarms_at_time(
    State(state): State<AppState>,
    Extension(ApiKey(key)): Extension<ApiKey>,
    Path(time): Path<String>,
) -> ApiResult<Json<Vec<Alarm>>> {
    let alarms = state
        .alarms
        .list_active_at_time(Some(&key), &time)
        .await
        .map_err(read_error)?;
    Ok(Json(alarms))
}
