//! Quote handlers. Quotes are private: listing and reading only ever see
//! the caller's own, and changing someone else's is forbidden.

use crate::{
    api::extract::ApiJson,
    auth::{
        middleware::AuthUser,
        ownership::{authorize_owned, Resource},
    },
    db::Quote,
    types::{AppError, ErrorResponse, QuoteDto, QuoteRequest, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

impl From<Quote> for QuoteDto {
    fn from(q: Quote) -> Self {
        Self {
            id: q.id,
            text: q.text,
            author: q.author,
            book_id: q.book_id,
            book_title: q.book_title,
            user_id: q.user_id,
            is_favorite: q.is_favorite,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

fn quote_not_found() -> AppError {
    AppError::NotFound("Quote not found".to_string())
}

/// 404 when the quote does not exist, 403 when it belongs to someone else.
async fn ensure_quote_owner(state: &AppState, id: &str, user_id: &str) -> Result<()> {
    let owner = state
        .store
        .quote_owner(id)
        .await?
        .ok_or_else(quote_not_found)?;

    authorize_owned(user_id, &owner, Resource::Quote)
}

/// List the caller's quotes.
#[utoipa::path(
    get,
    path = "/api/quotes",
    responses(
        (status = 200, description = "The caller's quotes", body = Vec<QuoteDto>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "quotes",
    security(("bearer" = []))
)]
pub async fn list_quotes(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<QuoteDto>>> {
    let quotes = state.store.list_quotes(&claims.sub).await?;
    Ok(Json(quotes.into_iter().map(QuoteDto::from).collect()))
}

/// Get one of the caller's quotes.
#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    params(
        ("id" = String, Path, description = "Quote ID")
    ),
    responses(
        (status = 200, description = "Quote details", body = QuoteDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Quote not found", body = ErrorResponse)
    ),
    tag = "quotes",
    security(("bearer" = []))
)]
pub async fn get_quote(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<QuoteDto>> {
    let quote = state
        .store
        .get_quote_for_user(&id, &claims.sub)
        .await?
        .ok_or_else(quote_not_found)?;

    Ok(Json(quote.into()))
}

/// Save a quote from a book.
#[utoipa::path(
    post,
    path = "/api/quotes",
    request_body = QuoteRequest,
    responses(
        (status = 201, description = "Quote created", body = QuoteDto),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "quotes",
    security(("bearer" = []))
)]
pub async fn create_quote(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiJson(payload): ApiJson<QuoteRequest>,
) -> Result<(StatusCode, Json<QuoteDto>)> {
    payload.validate()?;

    let quote = state.store.create_quote(&claims.sub, &payload).await?;
    tracing::info!(quote_id = %quote.id, book_id = %quote.book_id, "quote created");

    Ok((StatusCode::CREATED, Json(quote.into())))
}

/// Replace a quote.
#[utoipa::path(
    put,
    path = "/api/quotes/{id}",
    params(
        ("id" = String, Path, description = "Quote ID")
    ),
    request_body = QuoteRequest,
    responses(
        (status = 204, description = "Quote updated"),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Quote belongs to another user", body = ErrorResponse),
        (status = 404, description = "Quote or book not found", body = ErrorResponse)
    ),
    tag = "quotes",
    security(("bearer" = []))
)]
pub async fn update_quote(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<QuoteRequest>,
) -> Result<StatusCode> {
    payload.validate()?;
    ensure_quote_owner(&state, &id, &claims.sub).await?;

    if !state.store.update_quote(&id, &claims.sub, &payload).await? {
        return Err(quote_not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Flip a quote's favorite flag.
#[utoipa::path(
    put,
    path = "/api/quotes/{id}/toggle-favorite",
    params(
        ("id" = String, Path, description = "Quote ID")
    ),
    responses(
        (status = 204, description = "Favorite flag toggled"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Quote belongs to another user", body = ErrorResponse),
        (status = 404, description = "Quote not found", body = ErrorResponse)
    ),
    tag = "quotes",
    security(("bearer" = []))
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    ensure_quote_owner(&state, &id, &claims.sub).await?;

    if !state.store.toggle_quote_favorite(&id, &claims.sub).await? {
        return Err(quote_not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a quote.
#[utoipa::path(
    delete,
    path = "/api/quotes/{id}",
    params(
        ("id" = String, Path, description = "Quote ID")
    ),
    responses(
        (status = 204, description = "Quote deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Quote belongs to another user", body = ErrorResponse),
        (status = 404, description = "Quote not found", body = ErrorResponse)
    ),
    tag = "quotes",
    security(("bearer" = []))
)]
pub async fn delete_quote(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    ensure_quote_owner(&state, &id, &claims.sub).await?;

    if !state.store.delete_quote(&id, &claims.sub).await? {
        return Err(quote_not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
