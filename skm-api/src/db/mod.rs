//! Database access layer for skm-api
//!
//! Alarm CRUD over the `alarms` table created by `skm_common::db`.

pub mod alarms;

pub use alarms::{AlarmStore, AlarmUpdate, StoreError};
