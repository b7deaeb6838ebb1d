//! Database models

use serde::{Deserialize, Serialize};

/// One row of the `alarms` table
///
/// Serialized in camelCase, which is the wire format of the alarm
/// endpoints. `api_key` is `None` for alarms created without scoping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub api_key: Option<String>,
    pub sound_id: i64,
    pub sound_name: String,
    /// Caller-defined format, stored and compared as plain text
    pub alarm_time: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}
