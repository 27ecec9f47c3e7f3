//! Book catalogue handlers.
//!
//! Every authenticated user can read every book. Who may change one is
//! decided by the configured [`BookOwnershipPolicy`](crate::auth::ownership::BookOwnershipPolicy).

use crate::{
    api::extract::ApiJson,
    auth::{
        middleware::AuthUser,
        ownership::{authorize_book_mutation, BookMutation},
    },
    db::Book,
    types::{AppError, BookDto, BookRequest, ErrorResponse, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

impl From<Book> for BookDto {
    fn from(b: Book) -> Self {
        Self {
            id: b.id,
            title: b.title,
            author: b.author,
            description: b.description,
            published_date: b.published_date,
            isbn: b.isbn,
            cover_image_url: b.cover_image_url,
            added_by_user_id: b.added_by_user_id,
            added_by_username: b.added_by_username,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

fn book_not_found() -> AppError {
    AppError::NotFound("Book not found".to_string())
}

/// List all books.
#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "All books", body = Vec<BookDto>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "books",
    security(("bearer" = []))
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<Vec<BookDto>>> {
    let books = state.store.list_books().await?;
    Ok(Json(books.into_iter().map(BookDto::from).collect()))
}

/// Get a single book.
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDto),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "books",
    security(("bearer" = []))
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BookDto>> {
    let book = state.store.get_book(&id).await?.ok_or_else(book_not_found)?;
    Ok(Json(book.into()))
}

/// Add a book owned by the caller.
#[utoipa::path(
    post,
    path = "/api/books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Invalid input or duplicate ISBN", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "books",
    security(("bearer" = []))
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiJson(payload): ApiJson<BookRequest>,
) -> Result<(StatusCode, Json<BookDto>)> {
    payload.validate()?;

    let book = state.store.create_book(&claims.sub, &payload).await?;
    tracing::info!(book_id = %book.id, user_id = %claims.sub, "book created");

    Ok((StatusCode::CREATED, Json(book.into())))
}

/// Replace a book's fields.
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 400, description = "Invalid input or duplicate ISBN", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller may not modify this book", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "books",
    security(("bearer" = []))
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<BookRequest>,
) -> Result<Json<BookDto>> {
    payload.validate()?;

    let current = state.store.get_book(&id).await?.ok_or_else(book_not_found)?;
    let mutation =
        authorize_book_mutation(state.book_policy, &claims.sub, &current.added_by_user_id)?;
    log_claim(&mutation, &id, &claims.sub);

    match state
        .store
        .update_book(&id, &claims.sub, &current.added_by_user_id, &payload)
        .await?
    {
        Some(book) => Ok(Json(book.into())),
        None => Err(lost_race(&state, &id).await),
    }
}

/// Delete a book together with its quotes and favorite marks.
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller may not delete this book", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "books",
    security(("bearer" = []))
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let current = state.store.get_book(&id).await?.ok_or_else(book_not_found)?;
    let mutation =
        authorize_book_mutation(state.book_policy, &claims.sub, &current.added_by_user_id)?;
    log_claim(&mutation, &id, &claims.sub);

    if !state.store.delete_book(&id, &current.added_by_user_id).await? {
        return Err(lost_race(&state, &id).await);
    }

    tracing::info!(book_id = %id, user_id = %claims.sub, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn log_claim(mutation: &BookMutation, book_id: &str, actor: &str) {
    if let BookMutation::ClaimFrom(previous_owner) = mutation {
        tracing::info!(
            book_id = %book_id,
            previous_owner = %previous_owner,
            new_owner = %actor,
            "book ownership claimed"
        );
    }
}

/// The owner-guarded write matched nothing: the book is gone or changed hands.
async fn lost_race(state: &AppState, id: &str) -> AppError {
    match state.store.get_book(id).await {
        Ok(Some(_)) => {
            AppError::conflict("Book was modified by another request, please retry", "id")
        }
        Ok(None) => book_not_found(),
        Err(e) => e,
    }
}
