//! # Skills Music Common Library
//!
//! Shared code for the Skills Music API service:
//! - Error types
//! - Configuration loading and resolution
//! - API key validation
//! - Database initialization and the alarm model
//! - Timestamp helpers

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
