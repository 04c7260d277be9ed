//! JSON body extractor whose rejections use the application error shape.

use axum::extract::FromRequest;

use crate::error::AppError;

/// Like `axum::Json`, but syntax, type and content-type failures become a 400
/// `{ "error": … }` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
