//! Authentication and Authorization
//!
//! This module provides the security core of the Bookshelf API: password
//! hashing, JWT issuance and validation, the Axum middleware that guards
//! protected routes, and the per-resource ownership rules.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - salted HMAC-SHA512 hashing with constant-time checks
//! - [`auth::jwt`](crate::auth::jwt) - token issuance/validation and the `AuthService` facade
//! - [`auth::middleware`](crate::auth::middleware) - bearer-token layer and `AuthUser` extractor
//! - [`auth::ownership`](crate::auth::ownership) - who may mutate books, quotes and favorites
//!
//! # Flow
//!
//! 1. `POST /api/auth/login` looks the user up, verifies the password and
//!    returns a signed token valid for `auth.token_lifetime_minutes`.
//! 2. The client sends `Authorization: Bearer <token>` on every other call.
//! 3. [`middleware::auth_middleware`] validates signature, expiry, issuer and
//!    audience locally and injects the claims; handlers read them through
//!    [`middleware::AuthUser`].
//! 4. Handlers consult [`ownership`] before touching a resource.
//!
//! Logging out is client-side only: there is no revocation list, so a token
//! stays valid until it expires.
//!
//! # Configuration
//!
//! ```toml
//! [auth]
//! jwt_secret_env = "BOOKSHELF_JWT_SECRET"  # env var holding >= 32 bytes
//! issuer = "bookshelf-api"
//! audience = "bookshelf-web"
//! token_lifetime_minutes = 180
//! ```

/// JWT token generation, validation, and password hashing services.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Resource ownership rules.
pub mod ownership;
/// Salted password hashing.
pub mod password;
