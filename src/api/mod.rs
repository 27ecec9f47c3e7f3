//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::docs`](crate::api::docs) - OpenAPI document
//!
//! # API Endpoints
//!
//! ## Authentication (`/api/auth`)
//! - `POST /api/auth/register` - Register a new user and receive a JWT
//! - `POST /api/auth/login` - Login with username or email and receive a JWT
//!
//! ## Users (`/api/users`)
//! - `GET /api/users/me` - Profile of the caller
//!
//! ## Books (`/api/books`)
//! - `GET /api/books` - List every book
//! - `GET /api/books/{id}` - Get a book
//! - `POST /api/books` - Add a book
//! - `PUT /api/books/{id}` - Update a book
//! - `DELETE /api/books/{id}` - Delete a book
//!
//! ## Quotes (`/api/quotes`)
//! - `GET /api/quotes` - List the caller's quotes
//! - `GET /api/quotes/{id}` - Get one of the caller's quotes
//! - `POST /api/quotes` - Save a quote
//! - `PUT /api/quotes/{id}` - Update a quote
//! - `PUT /api/quotes/{id}/toggle-favorite` - Flip the favorite flag
//! - `DELETE /api/quotes/{id}` - Delete a quote
//!
//! ## Favorites (`/api/favorites`)
//! - `GET /api/favorites` - The caller's favorite books
//! - `POST /api/favorites` - Mark a book as favorite
//! - `DELETE /api/favorites/{bookId}` - Unmark a book
//!
//! # Authentication
//!
//! Everything except `/api/auth/*` requires a valid JWT in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! # OpenAPI Documentation
//!
//! The OpenAPI document is served at `/api-docs/openapi.json`. When the
//! `swagger-ui` feature is enabled, interactive documentation is available
//! at `/swagger-ui/`.

/// OpenAPI document assembled from the handler annotations.
pub mod docs;
/// JSON body extractor with API-shaped rejections.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
