use crate::{
    api::extract::ApiJson,
    auth::middleware::AuthUser,
    types::{AppError, BookDto, ErrorResponse, FavoriteDto, FavoriteRequest, FieldErrors, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// Books the caller marked as favorite, most recent first.
#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favorite books", body = Vec<BookDto>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "favorites",
    security(("bearer" = []))
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<BookDto>>> {
    let books = state.store.list_favorite_books(&claims.sub).await?;
    Ok(Json(books.into_iter().map(BookDto::from).collect()))
}

/// Mark a book as favorite.
#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = FavoriteRequest,
    responses(
        (status = 201, description = "Favorite added", body = FavoriteDto),
        (status = 400, description = "Missing bookId or already a favorite", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "favorites",
    security(("bearer" = []))
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiJson(payload): ApiJson<FavoriteRequest>,
) -> Result<(StatusCode, Json<FavoriteDto>)> {
    let book_id = payload.book_id.trim();
    if book_id.is_empty() {
        let mut errors = FieldErrors::new();
        errors.add("bookId", "bookId is required");
        errors.into_result()?;
    }

    let favorite = state.store.add_favorite(&claims.sub, book_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(FavoriteDto {
            id: favorite.id,
            user_id: favorite.user_id,
            book_id: favorite.book_id,
            added_at: favorite.added_at,
        }),
    ))
}

/// Remove a book from the caller's favorites.
#[utoipa::path(
    delete,
    path = "/api/favorites/{bookId}",
    params(
        ("bookId" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Book is not a favorite", body = ErrorResponse)
    ),
    tag = "favorites",
    security(("bearer" = []))
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(book_id): Path<String>,
) -> Result<StatusCode> {
    if !state.store.remove_favorite(&claims.sub, &book_id).await? {
        return Err(AppError::NotFound("Favorite not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
