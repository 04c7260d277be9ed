//! Shared application state and the health probe.

use std::sync::Arc;

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::auth::{CredentialHasher, TokenIssuer};
use crate::db::UserStore;
use crate::services::{Authenticator, RegistrationService};

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub registration: RegistrationService,
    pub authenticator: Authenticator,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, hasher: CredentialHasher, tokens: TokenIssuer) -> Self {
        Self {
            registration: RegistrationService::new(users.clone(), hasher.clone()),
            authenticator: Authenticator::new(users.clone(), hasher),
            users,
            tokens,
        }
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }
    pub fn registration(&self) -> &RegistrationService {
        &self.registration
    }
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "oms-auth" })),
    )
}
