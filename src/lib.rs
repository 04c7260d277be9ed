//! Credential service for the order-management platform.
//!
//! Registers accounts, checks username/password pairs and issues HS256 bearer tokens
//! carrying the user's name and role.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;

use axum::routing::{get, post};

/// Build the API router. Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/users", get(auth::list_users))
        .route("/me", get(auth::me))
        .route("/health", get(handlers::health))
        .with_state(state)
}
