//! Bearer-token extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::models::Principal;

/// Extractor: principal from a valid `Authorization: Bearer <jwt>` header.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Principal);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::InvalidToken("missing bearer token".to_string()))?;
        let principal = state.tokens().verify(bearer.token())?;
        Ok(AuthUser(principal))
    }
}
