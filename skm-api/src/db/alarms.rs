//! Alarm store
//!
//! CRUD over the `alarms` table, optionally scoped by owning API key.
//!
//! With scoping enabled every operation requires a valid key, and a row is
//! only visible through the key that created it. A row owned by another
//! key is indistinguishable from a missing row. With scoping disabled the
//! key is ignored and rows are stored without an owner.
//!
//! Every write is followed by a read so callers always see the stored row.

use serde::Deserialize;
use skm_common::api::ApiKeys;
use skm_common::db::Alarm;
use skm_common::time::{db_timestamp, next_timestamp};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

const SELECT_ALARM: &str = "SELECT id, api_key, sound_id, sound_name, alarm_time, is_active, created_at, updated_at FROM alarms";

/// Alarm store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key missing or not on the allow-list (scoping enabled only)
    #[error("Invalid API key")]
    Unauthorized,

    /// Alarm absent, or owned by another key
    #[error("Alarm not found: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Partial alarm update
///
/// Omitted (or null) fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmUpdate {
    pub sound_id: Option<i64>,
    pub sound_name: Option<String>,
    pub alarm_time: Option<String>,
    pub is_active: Option<bool>,
}

impl AlarmUpdate {
    /// Apply the supplied fields over `current`
    ///
    /// Identity and timestamps are carried over untouched; the store
    /// refreshes `updated_at` when it writes the result.
    pub fn merge_over(&self, current: &Alarm) -> Alarm {
        Alarm {
            sound_id: self.sound_id.unwrap_or(current.sound_id),
            sound_name: self
                .sound_name
                .clone()
                .unwrap_or_else(|| current.sound_name.clone()),
            alarm_time: self
                .alarm_time
                .clone()
                .unwrap_or_else(|| current.alarm_time.clone()),
            is_active: self.is_active.unwrap_or(current.is_active),
            ..current.clone()
        }
    }
}

/// Alarm persistence
#[derive(Clone)]
pub struct AlarmStore {
    pool: SqlitePool,
    keys: ApiKeys,
    scoping: bool,
}

impl AlarmStore {
    pub fn new(pool: SqlitePool, keys: ApiKeys, scoping: bool) -> Self {
        Self {
            pool,
            keys,
            scoping,
        }
    }

    /// Owner filter for a request
    ///
    /// `Ok(None)` means "no owner filter" (scoping disabled).
    fn scope<'a>(&self, owner: Option<&'a str>) -> Result<Option<&'a str>, StoreError> {
        if !self.scoping {
            return Ok(None);
        }
        match owner {
            Some(key) if self.keys.is_valid(key) => Ok(Some(key)),
            _ => Err(StoreError::Unauthorized),
        }
    }

    /// Insert a new, active alarm and return the stored row
    pub async fn create(
        &self,
        owner: Option<&str>,
        sound_id: i64,
        sound_name: &str,
        alarm_time: &str,
    ) -> Result<Alarm, StoreError> {
        let owner = self.scope(owner)?;
        let now = db_timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO alarms (api_key, sound_id, sound_name, alarm_time, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(owner)
        .bind(sound_id)
        .bind(sound_name)
        .bind(alarm_time)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, alarm_time, "Created alarm");

        self.fetch(owner, id).await?.ok_or(StoreError::NotFound(id))
    }

    /// Single alarm, or `None` when absent or owned by another key
    pub async fn get_by_id(&self, owner: Option<&str>, id: i64) -> Result<Option<Alarm>, StoreError> {
        let owner = self.scope(owner)?;
        self.fetch(owner, id).await
    }

    /// All alarms visible to `owner`, ordered by alarm time
    ///
    /// Ordering is lexicographic on the stored text.
    pub async fn list(&self, owner: Option<&str>) -> Result<Vec<Alarm>, StoreError> {
        let owner = self.scope(owner)?;

        let alarms = sqlx::query_as::<_, Alarm>(&format!(
            "{} WHERE (?1 IS NULL OR api_key = ?1) ORDER BY alarm_time ASC, id ASC",
            SELECT_ALARM
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(alarms)
    }

    /// Merge `update` over the current row and store the result
    pub async fn update(
        &self,
        owner: Option<&str>,
        id: i64,
        update: &AlarmUpdate,
    ) -> Result<Alarm, StoreError> {
        let owner = self.scope(owner)?;
        let current = self.fetch(owner, id).await?.ok_or(StoreError::NotFound(id))?;
        let merged = update.merge_over(&current);

        sqlx::query(
            r#"
            UPDATE alarms
            SET sound_id = ?1, sound_name = ?2, alarm_time = ?3, is_active = ?4, updated_at = ?5
            WHERE id = ?6 AND (?7 IS NULL OR api_key = ?7)
            "#,
        )
        .bind(merged.sound_id)
        .bind(&merged.sound_name)
        .bind(&merged.alarm_time)
        .bind(merged.is_active)
        .bind(next_timestamp(&current.updated_at))
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        debug!(id, "Updated alarm");
        self.fetch(owner, id).await?.ok_or(StoreError::NotFound(id))
    }

    /// Flip the active flag
    pub async fn toggle(&self, owner: Option<&str>, id: i64) -> Result<Alarm, StoreError> {
        let owner = self.scope(owner)?;
        let current = self.fetch(owner, id).await?.ok_or(StoreError::NotFound(id))?;

        sqlx::query(
            r#"
            UPDATE alarms
            SET is_active = ?1, updated_at = ?2
            WHERE id = ?3 AND (?4 IS NULL OR api_key = ?4)
            "#,
        )
        .bind(!current.is_active)
        .bind(next_timestamp(&current.updated_at))
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        debug!(id, is_active = !current.is_active, "Toggled alarm");
        self.fetch(owner, id).await?.ok_or(StoreError::NotFound(id))
    }

    /// Delete an alarm
    ///
    /// Missing or foreign rows are a silent no-op. Returns the number of
    /// rows removed (0 or 1).
    pub async fn delete(&self, owner: Option<&str>, id: i64) -> Result<u64, StoreError> {
        let owner = self.scope(owner)?;

        let result = sqlx::query("DELETE FROM alarms WHERE id = ?1 AND (?2 IS NULL OR api_key = ?2)")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        debug!(id, removed = result.rows_affected(), "Deleted alarm");
        Ok(result.rows_affected())
    }

    /// Active alarms whose time equals `time` exactly
    pub async fn list_active_at_time(
        &self,
        owner: Option<&str>,
        time: &str,
    ) -> Result<Vec<Alarm>, StoreError> {
        let owner = self.scope(owner)?;

        let alarms = sqlx::query_as::<_, Alarm>(&format!(
            "{} WHERE alarm_time = ?1 AND is_active = 1 AND (?2 IS NULL OR api_key = ?2) ORDER BY id ASC",
            SELECT_ALARM
        ))
        .bind(time)
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(alarms)
    }

    /// Total number of rows, regardless of owner
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM alarms")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn fetch(&self, owner: Option<&str>, id: i64) -> Result<Option<Alarm>, StoreError> {
        let alarm = sqlx::query_as::<_, Alarm>(&format!(
            "{} WHERE id = ?1 AND (?2 IS NULL OR api_key = ?2)",
            SELECT_ALARM
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(alarm)
    }
}
