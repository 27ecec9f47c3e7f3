use crate::api::handlers::{auth, books, favorites, quotes, users};
use crate::auth::{jwt::AuthService, middleware::auth_middleware};
use crate::AppState;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

/// Routes mounted under `/api`.
pub fn create_router(auth_service: Arc<AuthService>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/users/me", get(users::me))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/{id}",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Quotes
        .route("/quotes", get(quotes::list_quotes).post(quotes::create_quote))
        .route(
            "/quotes/{id}",
            get(quotes::get_quote)
                .put(quotes::update_quote)
                .delete(quotes::delete_quote),
        )
        .route("/quotes/{id}/toggle-favorite", put(quotes::toggle_favorite))
        // Favorites
        .route(
            "/favorites",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/favorites/{book_id}", delete(favorites::remove_favorite))
        .route_layer(middleware::from_fn_with_state(auth_service, auth_middleware));

    public_routes.merge(protected_routes)
}
