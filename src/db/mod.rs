//! Persistence for users, books, quotes and favorites.
//!
//! Backed by libsql (embedded SQLite). A `:memory:` URL gives a throwaway
//! database, which the tests use.

pub mod seed;
pub mod store;

pub use store::{Book, Favorite, LibraryStore, NewUser, Quote, User};
