//! # Bookshelf - personal library REST API
//!
//! A JSON API where registered users keep a shared catalogue of books, save
//! private quotes from them and mark favorites. Every call except
//! registration and login carries a short-lived JWT.
//!
//! ## Overview
//!
//! Bookshelf can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `bookshelf-server` binary
//! 2. **As a library** - Build the router with [`create_app`] and serve it yourself
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use bookshelf::{create_app, AppState, AuthService, BookshelfConfig, LibraryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BookshelfConfig::load("bookshelf.toml")?;
//!     let auth = AuthService::from_config(&config.auth, &config.jwt_secret()?)?;
//!     let store = LibraryStore::open(&config.database.url).await?;
//!
//!     let state = AppState::new(Arc::new(config), Arc::new(store), Arc::new(auth));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, create_app(state)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `swagger-ui` | Interactive API docs at `/swagger-ui/` |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Password hashing, JWT and ownership rules
//! - [`db`] - libsql persistence and demo data
//! - [`types`] - Request/response types and error handling
//! - [`utils`] - TOML configuration
//! - [`cli`] - Command-line interface of the server binary

#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Password hashing, JWT authentication and ownership rules.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// libsql store and demo-data seeding.
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use auth::jwt::AuthService;
pub use auth::ownership::BookOwnershipPolicy;
pub use db::LibraryStore;
pub use types::{AppError, Result};
pub use utils::toml_config::BookshelfConfig;

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<BookshelfConfig>,
    /// Users, books, quotes and favorites
    pub store: Arc<LibraryStore>,
    /// Authentication service
    pub auth_service: Arc<AuthService>,
    /// Rule for editing books added by someone else
    pub book_policy: BookOwnershipPolicy,
}

impl AppState {
    pub fn new(
        config: Arc<BookshelfConfig>,
        store: Arc<LibraryStore>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        let book_policy = config.policy.book_ownership;
        Self {
            config,
            store,
            auth_service,
            book_policy,
        }
    }
}

/// Build the full application router: `/health`, the `/api` routes and the
/// OpenAPI document, wrapped in CORS and request tracing.
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    let app = Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api",
            api::routes::create_router(state.auth_service.clone()),
        );

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::docs::ApiDoc::openapi()),
        )
    };

    #[cfg(not(feature = "swagger-ui"))]
    let app = app.route("/api-docs/openapi.json", get(openapi_json));

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(not(feature = "swagger-ui"))]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    axum::Json(api::docs::ApiDoc::openapi())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
