//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by resource.

/// Authentication handlers (register, login).
pub mod auth;
/// Book catalogue CRUD handlers.
pub mod books;
/// Favorite book handlers.
pub mod favorites;
/// Quote CRUD handlers.
pub mod quotes;
/// Current-user profile handler.
pub mod users;

