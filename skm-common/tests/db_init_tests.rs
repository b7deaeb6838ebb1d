//! Tests for on-disk database initialization
//!
//! - Database file created on first run
//! - Existing database reopened without losing rows

use skm_common::db::init::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("alarms.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing_and_keeps_rows() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("alarms.db");

    let pool1 = init_database(&db_path).await.unwrap();
    sqlx::query(
        "INSERT INTO alarms (api_key, sound_id, sound_name, alarm_time, created_at, updated_at)
         VALUES ('kitty-secret-key', 2, 'Birds', '06:30', 'a', 'a')",
    )
    .execute(&pool1)
    .await
    .unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.as_ref().err());
    let pool2 = pool2.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alarms")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
