use crate::types::AppError;
use axum::extract::FromRequest;

/// `axum::Json` that rejects malformed bodies with an `invalid_input` error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
