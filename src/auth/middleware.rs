use crate::auth::jwt::AuthService;
use crate::types::{AppError, Claims};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Message for every rejected token, whatever the reason.
const INVALID_TOKEN: &str = "Missing, invalid or expired token";

/// Rejects requests without a valid bearer token and stores the token's
/// [`Claims`] in the request extensions for [`AuthUser`].
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Auth(INVALID_TOKEN.to_string()))?;

    let claims = auth_service.verify_token(token).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        AppError::Auth(INVALID_TOKEN.to_string())
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extractor for the claims of the authenticated caller.
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Auth(INVALID_TOKEN.to_string()))
    }
}
