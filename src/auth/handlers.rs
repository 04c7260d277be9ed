//! Auth HTTP handlers: register, login, user listing, token introspection.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use validator::Validate;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::{AppJson, AuthUser};
use crate::models::{LoginRequest, Principal, RegisterRequest, UserView};

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserView>,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    state.registration().register(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user created".to_string(),
        }),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.authenticator().authenticate(body).await?;
    let token = state.tokens().issue(&Principal::from(&user))?;
    Ok(Json(LoginResponse { token }))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, AppError> {
    let users = state.users().list_all().await?;
    Ok(Json(UsersResponse {
        users: users.into_iter().map(UserView::from).collect(),
    }))
}

/// GET /me — claims of the presented bearer token.
pub async fn me(AuthUser(principal): AuthUser) -> Json<Principal> {
    Json(principal)
}
