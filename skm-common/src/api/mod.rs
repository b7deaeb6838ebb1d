//! API module for shared HTTP API functionality
//!
//! Contains ONLY pure functions and shared types. The HTTP service wraps
//! these with framework-specific middleware (Axum).

pub mod keys;

pub use keys::{ApiKeys, API_KEY_HEADER, DEFAULT_API_KEYS};
