use crate::types::{AppError, BookRequest, QuoteRequest, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use libsql::{params, Builder, Connection, Database, Row};
use std::path::Path;
use uuid::Uuid;

pub(crate) const INSERT_USER_SQL: &str = "INSERT INTO users
    (id, username, email, password_hash, password_salt, first_name, last_name, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

pub(crate) const INSERT_BOOK_SQL: &str = "INSERT INTO books
    (id, title, author, description, published_date, isbn, cover_image_url, added_by_user_id, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

pub(crate) const INSERT_QUOTE_SQL: &str = "INSERT INTO quotes
    (id, text, author, user_id, book_id, is_favorite, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const USER_COLUMNS: &str = "SELECT id, username, email, password_hash, password_salt,
    first_name, last_name, created_at, last_login FROM users";

const BOOK_COLUMNS: &str = "SELECT b.id, b.title, b.author, b.description, b.published_date,
    b.isbn, b.cover_image_url, b.added_by_user_id, u.username, b.created_at, b.updated_at
    FROM books b JOIN users u ON u.id = b.added_by_user_id";

const QUOTE_COLUMNS: &str = "SELECT q.id, q.text, q.author, q.user_id, q.book_id, b.title,
    q.is_favorite, q.created_at, q.updated_at
    FROM quotes q JOIN books b ON b.id = q.book_id";

const ISBN_TAKEN: &str = "A book with this ISBN already exists. Please use a different ISBN.";
const USERNAME_TAKEN: &str = "Username is already registered";
const EMAIL_TAKEN: &str = "The email address is already registered.";

/// Relational store for users, books, quotes and favorites (libsql/SQLite).
///
/// Uniqueness (username, email, ISBN, user+book favorite) and referential
/// rules live in the schema; callers insert directly and get constraint
/// violations back as [`AppError::Conflict`] / [`AppError::NotFound`].
pub struct LibraryStore {
    db: Database,
    /// In-memory databases exist per connection, so one is kept and shared.
    shared: Option<Connection>,
}

impl LibraryStore {
    /// Open `url` as a local database file, or an in-memory one for `:memory:`.
    pub async fn open(url: &str) -> Result<Self> {
        if url == ":memory:" {
            Self::new_memory().await
        } else {
            Self::new_local(url).await
        }
    }

    pub async fn new_local(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Database(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let store = Self { db, shared: None };
        store.initialize_schema().await?;

        Ok(store)
    }

    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;
        configure(&conn).await?;

        let store = Self {
            db,
            shared: Some(conn),
        };
        store.initialize_schema().await?;

        Ok(store)
    }

    pub async fn connection(&self) -> Result<Connection> {
        if let Some(conn) = &self.shared {
            return Ok(conn.clone());
        }

        let conn = self
            .db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;
        configure(&conn).await?;

        Ok(conn)
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection().await?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE COLLATE NOCASE,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password_hash BLOB NOT NULL,
                password_salt BLOB NOT NULL,
                first_name TEXT,
                last_name TEXT,
                created_at INTEGER NOT NULL,
                last_login INTEGER
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Books table; a user who still owns books cannot be deleted
        conn.execute(
            "CREATE TABLE IF NOT EXISTS books (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                description TEXT,
                published_date TEXT NOT NULL,
                isbn TEXT NOT NULL UNIQUE,
                cover_image_url TEXT,
                added_by_user_id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER,
                FOREIGN KEY (added_by_user_id) REFERENCES users(id) ON DELETE RESTRICT
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create books table: {}", e)))?;

        // Quotes table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS quotes (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                author TEXT NOT NULL,
                user_id TEXT NOT NULL,
                book_id TEXT NOT NULL,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create quotes table: {}", e)))?;

        // Favorites table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS favorites (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                book_id TEXT NOT NULL,
                added_at INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE,
                UNIQUE(user_id, book_id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create favorites table: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_quotes_user ON quotes(user_id)",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create quotes index: {}", e)))?;

        Ok(())
    }

    // User operations

    /// Insert a user. A clash on username and/or email comes back as one
    /// `Conflict` naming every clashing field.
    pub async fn create_user(&self, user: NewUser<'_>) -> Result<User> {
        let conn = self.connection().await?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().trunc_subsecs(6);

        let inserted = conn
            .execute(
                INSERT_USER_SQL,
                params![
                    id.as_str(),
                    user.username,
                    user.email,
                    user.password_hash.to_vec(),
                    user.password_salt.to_vec(),
                    user.first_name,
                    user.last_name,
                    micros(now)
                ],
            )
            .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(self.identity_conflict(user.username, user.email).await?);
            }
            Err(e) => return Err(AppError::Database(format!("Failed to create user: {}", e))),
        }

        Ok(User {
            id,
            username: user.username.to_string(),
            email: user.email.to_string(),
            password_hash: user.password_hash.to_vec(),
            password_salt: user.password_salt.to_vec(),
            first_name: user.first_name.map(str::to_string),
            last_name: user.last_name.map(str::to_string),
            created_at: now,
            last_login: None,
        })
    }

    /// Work out which of `username` / `email` are already taken.
    async fn identity_conflict(&self, username: &str, email: &str) -> Result<AppError> {
        let conn = self.connection().await?;
        let mut rows = conn
            .query(
                "SELECT username = ?1, email = ?2 FROM users WHERE username = ?1 OR email = ?2",
                params![username, email],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query users: {}", e)))?;

        let (mut username_taken, mut email_taken) = (false, false);
        while let Some(row) = rows.next().await.map_err(db_err)? {
            username_taken |= row.get::<i64>(0).map_err(db_err)? != 0;
            email_taken |= row.get::<i64>(1).map_err(db_err)? != 0;
        }

        let mut messages = Vec::new();
        let mut fields = Vec::new();
        if username_taken {
            messages.push(USERNAME_TAKEN);
            fields.push("username".to_string());
        }
        if email_taken {
            messages.push(EMAIL_TAKEN);
            fields.push("email".to_string());
        }
        if fields.is_empty() {
            messages.push("Username or email is already registered");
            fields = vec!["username".to_string(), "email".to_string()];
        }

        Ok(AppError::Conflict {
            message: messages.join(" "),
            fields,
        })
    }

    /// Look a user up by username or, failing that, by email.
    pub async fn find_user_for_login(&self, login: &str) -> Result<Option<User>> {
        let conn = self.connection().await?;
        let sql = format!(
            "{} WHERE username = ?1 OR email = ?1
             ORDER BY CASE WHEN username = ?1 THEN 0 ELSE 1 END LIMIT 1",
            USER_COLUMNS
        );

        let mut rows = conn
            .query(&sql, params![login])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.connection().await?;
        let sql = format!("{} WHERE id = ?1", USER_COLUMNS);

        let mut rows = conn
            .query(&sql, params![id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn record_login(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        let conn = self.connection().await?;

        conn.execute(
            "UPDATE users SET last_login = ?1 WHERE id = ?2",
            params![micros(at), id],
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to record login: {}", e)))?;

        Ok(())
    }

    pub async fn count_users(&self) -> Result<i64> {
        let conn = self.connection().await?;
        let mut rows = conn
            .query("SELECT COUNT(*) FROM users", ())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count users: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => row.get::<i64>(0).map_err(db_err),
            None => Ok(0),
        }
    }

    // Book operations

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        let sql = format!("{} ORDER BY b.title COLLATE NOCASE, b.id", BOOK_COLUMNS);
        self.query_books(&sql, ()).await
    }

    pub async fn get_book(&self, id: &str) -> Result<Option<Book>> {
        let sql = format!("{} WHERE b.id = ?1", BOOK_COLUMNS);
        Ok(self.query_books(&sql, params![id]).await?.into_iter().next())
    }

    pub async fn create_book(&self, owner_id: &str, book: &BookRequest) -> Result<Book> {
        let conn = self.connection().await?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().trunc_subsecs(6);

        conn.execute(
            INSERT_BOOK_SQL,
            params![
                id.as_str(),
                book.title.as_str(),
                book.author.as_str(),
                book.description.as_deref(),
                date_text(book.published_date),
                book.isbn.as_str(),
                book.cover_image_url.as_deref(),
                owner_id,
                micros(now)
            ],
        )
        .await
        .map_err(|e| book_write_error(e, "create"))?;

        self.get_book(&id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Book {} vanished after insert", id)))
    }

    /// Overwrite a book and set its owner to `actor_id`, provided it is still
    /// owned by `expected_owner`. `None` when no row matched.
    ///
    /// `updated_at` moves forward on every write, even two within the same
    /// microsecond.
    pub async fn update_book(
        &self,
        id: &str,
        actor_id: &str,
        expected_owner: &str,
        book: &BookRequest,
    ) -> Result<Option<Book>> {
        let conn = self.connection().await?;
        let now = Utc::now().trunc_subsecs(6);

        let changed = conn
            .execute(
                "UPDATE books SET title = ?1, author = ?2, description = ?3, published_date = ?4,
                    isbn = ?5, cover_image_url = ?6, added_by_user_id = ?7,
                    updated_at = MAX(?8, COALESCE(updated_at, created_at) + 1)
                 WHERE id = ?9 AND added_by_user_id = ?10",
                params![
                    book.title.as_str(),
                    book.author.as_str(),
                    book.description.as_deref(),
                    date_text(book.published_date),
                    book.isbn.as_str(),
                    book.cover_image_url.as_deref(),
                    actor_id,
                    micros(now),
                    id,
                    expected_owner
                ],
            )
            .await
            .map_err(|e| book_write_error(e, "update"))?;

        if changed == 0 {
            return Ok(None);
        }

        self.get_book(id).await
    }

    /// Delete a book still owned by `expected_owner`. Quotes and favorites
    /// referencing it go with it.
    pub async fn delete_book(&self, id: &str, expected_owner: &str) -> Result<bool> {
        let conn = self.connection().await?;

        let deleted = conn
            .execute(
                "DELETE FROM books WHERE id = ?1 AND added_by_user_id = ?2",
                params![id, expected_owner],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete book: {}", e)))?;

        Ok(deleted > 0)
    }

    async fn query_books(&self, sql: &str, params: impl libsql::params::IntoParams) -> Result<Vec<Book>> {
        let conn = self.connection().await?;
        let mut rows = conn
            .query(sql, params)
            .await
            .map_err(|e| AppError::Database(format!("Failed to query books: {}", e)))?;

        let mut books = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            books.push(book_from_row(&row)?);
        }

        Ok(books)
    }

    // Quote operations

    pub async fn list_quotes(&self, user_id: &str) -> Result<Vec<Quote>> {
        let sql = format!(
            "{} WHERE q.user_id = ?1 ORDER BY q.created_at DESC, q.id",
            QUOTE_COLUMNS
        );
        self.query_quotes(&sql, params![user_id]).await
    }

    /// A quote only if it belongs to `user_id`; other users' quotes look absent.
    pub async fn get_quote_for_user(&self, id: &str, user_id: &str) -> Result<Option<Quote>> {
        let sql = format!("{} WHERE q.id = ?1 AND q.user_id = ?2", QUOTE_COLUMNS);
        Ok(self
            .query_quotes(&sql, params![id, user_id])
            .await?
            .into_iter()
            .next())
    }

    pub async fn quote_owner(&self, id: &str) -> Result<Option<String>> {
        let conn = self.connection().await?;
        let mut rows = conn
            .query("SELECT user_id FROM quotes WHERE id = ?1", params![id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query quote: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => Ok(Some(row.get(0).map_err(db_err)?)),
            None => Ok(None),
        }
    }

    pub async fn create_quote(&self, user_id: &str, quote: &QuoteRequest) -> Result<Quote> {
        let conn = self.connection().await?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().trunc_subsecs(6);

        conn.execute(
            INSERT_QUOTE_SQL,
            params![
                id.as_str(),
                quote.text.as_str(),
                quote.author.as_str(),
                user_id,
                quote.book_id.as_str(),
                quote.is_favorite as i64,
                micros(now)
            ],
        )
        .await
        .map_err(|e| quote_write_error(e, "create"))?;

        self.get_quote_for_user(&id, user_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Quote {} vanished after insert", id)))
    }

    pub async fn update_quote(&self, id: &str, user_id: &str, quote: &QuoteRequest) -> Result<bool> {
        let conn = self.connection().await?;
        let now = Utc::now().trunc_subsecs(6);

        let changed = conn
            .execute(
                "UPDATE quotes SET text = ?1, author = ?2, book_id = ?3, is_favorite = ?4,
                    updated_at = MAX(?5, COALESCE(updated_at, created_at) + 1)
                 WHERE id = ?6 AND user_id = ?7",
                params![
                    quote.text.as_str(),
                    quote.author.as_str(),
                    quote.book_id.as_str(),
                    quote.is_favorite as i64,
                    micros(now),
                    id,
                    user_id
                ],
            )
            .await
            .map_err(|e| quote_write_error(e, "update"))?;

        Ok(changed > 0)
    }

    pub async fn toggle_quote_favorite(&self, id: &str, user_id: &str) -> Result<bool> {
        let conn = self.connection().await?;
        let now = Utc::now().trunc_subsecs(6);

        let changed = conn
            .execute(
                "UPDATE quotes SET is_favorite = NOT is_favorite,
                    updated_at = MAX(?1, COALESCE(updated_at, created_at) + 1)
                 WHERE id = ?2 AND user_id = ?3",
                params![micros(now), id, user_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to toggle quote: {}", e)))?;

        Ok(changed > 0)
    }

    pub async fn delete_quote(&self, id: &str, user_id: &str) -> Result<bool> {
        let conn = self.connection().await?;

        let deleted = conn
            .execute(
                "DELETE FROM quotes WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete quote: {}", e)))?;

        Ok(deleted > 0)
    }

    async fn query_quotes(&self, sql: &str, params: impl libsql::params::IntoParams) -> Result<Vec<Quote>> {
        let conn = self.connection().await?;
        let mut rows = conn
            .query(sql, params)
            .await
            .map_err(|e| AppError::Database(format!("Failed to query quotes: {}", e)))?;

        let mut quotes = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            quotes.push(Quote {
                id: row.get(0).map_err(db_err)?,
                text: row.get(1).map_err(db_err)?,
                author: row.get(2).map_err(db_err)?,
                user_id: row.get(3).map_err(db_err)?,
                book_id: row.get(4).map_err(db_err)?,
                book_title: row.get(5).map_err(db_err)?,
                is_favorite: row.get::<i64>(6).map_err(db_err)? != 0,
                created_at: from_micros(row.get(7).map_err(db_err)?)?,
                updated_at: optional_micros(row.get(8).map_err(db_err)?)?,
            });
        }

        Ok(quotes)
    }

    // Favorite operations

    pub async fn list_favorite_books(&self, user_id: &str) -> Result<Vec<Book>> {
        let sql = format!(
            "{} JOIN favorites f ON f.book_id = b.id WHERE f.user_id = ?1
             ORDER BY f.added_at DESC, b.title COLLATE NOCASE",
            BOOK_COLUMNS
        );
        self.query_books(&sql, params![user_id]).await
    }

    /// Mark a book as favorite. The (user, book) pair is unique in the schema,
    /// so a concurrent duplicate fails here instead of creating a second row.
    pub async fn add_favorite(&self, user_id: &str, book_id: &str) -> Result<Favorite> {
        let conn = self.connection().await?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().trunc_subsecs(6);

        conn.execute(
            "INSERT INTO favorites (id, user_id, book_id, added_at) VALUES (?1, ?2, ?3, ?4)",
            params![id.as_str(), user_id, book_id, micros(now)],
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Book is already marked as favorite", "bookId")
            } else if is_foreign_key_violation(&e) {
                AppError::NotFound("Book not found".to_string())
            } else {
                AppError::Database(format!("Failed to add favorite: {}", e))
            }
        })?;

        Ok(Favorite {
            id,
            user_id: user_id.to_string(),
            book_id: book_id.to_string(),
            added_at: now,
        })
    }

    pub async fn remove_favorite(&self, user_id: &str, book_id: &str) -> Result<bool> {
        let conn = self.connection().await?;

        let deleted = conn
            .execute(
                "DELETE FROM favorites WHERE user_id = ?1 AND book_id = ?2",
                params![user_id, book_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to remove favorite: {}", e)))?;

        Ok(deleted > 0)
    }
}

async fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
        .await
        .map(|_| ())
        .map_err(|e| AppError::Database(format!("Failed to configure connection: {}", e)))
}

// Instants are stored as unix microseconds.
pub(crate) fn micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

fn from_micros(value: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(value)
        .ok_or_else(|| AppError::Database(format!("Stored timestamp out of range: {}", value)))
}

fn optional_micros(value: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    value.map(from_micros).transpose()
}

/// Publication dates are stored as RFC 3339 text so they keep whatever
/// precision they were submitted with.
pub(crate) fn date_text(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_date_text(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| AppError::Database(format!("Stored date {:?} is invalid: {}", value, e)))
}

fn db_err(e: libsql::Error) -> AppError {
    AppError::Database(e.to_string())
}

pub(crate) fn is_unique_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}

pub(crate) fn is_foreign_key_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("FOREIGN KEY constraint failed")
}

fn book_write_error(e: libsql::Error, action: &str) -> AppError {
    if is_unique_violation(&e) {
        AppError::conflict(ISBN_TAKEN, "isbn")
    } else {
        AppError::Database(format!("Failed to {} book: {}", action, e))
    }
}

fn quote_write_error(e: libsql::Error, action: &str) -> AppError {
    if is_foreign_key_violation(&e) {
        AppError::NotFound("Book not found".to_string())
    } else {
        AppError::Database(format!("Failed to {} quote: {}", action, e))
    }
}

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: row.get(0).map_err(db_err)?,
        username: row.get(1).map_err(db_err)?,
        email: row.get(2).map_err(db_err)?,
        password_hash: row.get(3).map_err(db_err)?,
        password_salt: row.get(4).map_err(db_err)?,
        first_name: row.get(5).map_err(db_err)?,
        last_name: row.get(6).map_err(db_err)?,
        created_at: from_micros(row.get(7).map_err(db_err)?)?,
        last_login: optional_micros(row.get(8).map_err(db_err)?)?,
    })
}

fn book_from_row(row: &Row) -> Result<Book> {
    Ok(Book {
        id: row.get(0).map_err(db_err)?,
        title: row.get(1).map_err(db_err)?,
        author: row.get(2).map_err(db_err)?,
        description: row.get(3).map_err(db_err)?,
        published_date: parse_date_text(&row.get::<String>(4).map_err(db_err)?)?,
        isbn: row.get(5).map_err(db_err)?,
        cover_image_url: row.get(6).map_err(db_err)?,
        added_by_user_id: row.get(7).map_err(db_err)?,
        added_by_username: row.get(8).map_err(db_err)?,
        created_at: from_micros(row.get(9).map_err(db_err)?)?,
        updated_at: optional_micros(row.get(10).map_err(db_err)?)?,
    })
}

/// Fields for a new user row.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub password_hash: &'a [u8],
    pub password_salt: &'a [u8],
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub published_date: DateTime<Utc>,
    pub isbn: String,
    pub cover_image_url: Option<String>,
    pub added_by_user_id: String,
    pub added_by_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Quote {
    pub id: String,
    pub text: String,
    pub author: String,
    pub user_id: String,
    pub book_id: String,
    pub book_title: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    pub added_at: DateTime<Utc>,
}
