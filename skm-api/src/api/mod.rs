//! HTTP API handlers for skm-api

pub mod alarms;
pub mod auth;
pub mod health;
pub mod keys;
pub mod media;
pub mod sounds;
pub mod ui;

pub use alarms::{
    active_alarms_at_time, create_alarm, delete_alarm, get_alarm, list_alarms, toggle_alarm,
    update_alarm,
};
pub use auth::{auth_middleware, ApiKey};
pub use health::health_routes;
pub use keys::validate_key;
pub use media::{serve_audio, serve_cover};
pub use sounds::list_sounds;
pub use ui::{openapi_document, serve_index, swagger_config};
