//! Request extractors and layers shared by the HTTP handlers.

pub mod auth;
pub mod cors;
pub mod json;

pub use auth::AuthUser;
pub use cors::cors_layer;
pub use json::AppJson;
