use crate::auth::jwt::AuthService;
use crate::db::store::{
    date_text, micros, LibraryStore, INSERT_BOOK_SQL, INSERT_QUOTE_SQL, INSERT_USER_SQL,
};
use crate::types::{AppError, Result};
use chrono::{NaiveDate, Utc};
use libsql::{params, Transaction};
use uuid::Uuid;

pub const DEMO_USERNAME: &str = "testuser";
pub const DEMO_EMAIL: &str = "test@example.com";
pub const DEMO_PASSWORD: &str = "Test123!";

struct DemoBook {
    title: &'static str,
    author: &'static str,
    isbn: &'static str,
    description: &'static str,
    published: (i32, u32, u32),
    quote: &'static str,
    quote_is_favorite: bool,
}

const DEMO_BOOKS: [DemoBook; 2] = [
    DemoBook {
        title: "The Great Gatsby",
        author: "F. Scott Fitzgerald",
        isbn: "978-0743273565",
        description: "A story of the fabulously wealthy Jay Gatsby and his love for the beautiful Daisy Buchanan.",
        published: (1925, 4, 10),
        quote: "So we beat on, boats against the current, borne back ceaselessly into the past.",
        quote_is_favorite: true,
    },
    DemoBook {
        title: "1984",
        author: "George Orwell",
        isbn: "978-0451524935",
        description: "A dystopian novel set in a totalitarian society where critical thought is suppressed.",
        published: (1949, 6, 8),
        quote: "Big Brother is watching you.",
        quote_is_favorite: false,
    },
];

/// Populate an empty database with a demo user, two books and a quote each.
///
/// Returns `false` without writing anything when users already exist. All
/// rows go in one transaction, so a failure leaves the database untouched.
pub async fn seed_demo_data(store: &LibraryStore, auth: &AuthService) -> Result<bool> {
    if store.count_users().await? > 0 {
        tracing::debug!("database already has users, skipping demo data");
        return Ok(false);
    }

    let digest = auth.hash_password(DEMO_PASSWORD)?;

    let conn = store.connection().await?;
    let tx = conn
        .transaction()
        .await
        .map_err(|e| AppError::Database(format!("Failed to begin seed transaction: {}", e)))?;

    match insert_demo_rows(&tx, &digest.hash, &digest.salt).await {
        Ok(()) => {
            tx.commit()
                .await
                .map_err(|e| AppError::Database(format!("Failed to commit demo data: {}", e)))?;
            tracing::info!(username = DEMO_USERNAME, "seeded demo data");
            Ok(true)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "failed to roll back demo data");
            }
            Err(e)
        }
    }
}

async fn insert_demo_rows(tx: &Transaction, hash: &[u8], salt: &[u8]) -> Result<()> {
    let now = micros(Utc::now());
    let user_id = Uuid::new_v4().to_string();

    tx.execute(
        INSERT_USER_SQL,
        params![
            user_id.as_str(),
            DEMO_USERNAME,
            DEMO_EMAIL,
            hash.to_vec(),
            salt.to_vec(),
            "Test",
            "User",
            now
        ],
    )
    .await
    .map_err(|e| AppError::Database(format!("Failed to seed user: {}", e)))?;

    for book in &DEMO_BOOKS {
        let book_id = Uuid::new_v4().to_string();
        let (year, month, day) = book.published;
        let published = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| date_text(dt.and_utc()))
            .ok_or_else(|| AppError::Internal(format!("Bad publish date for {}", book.title)))?;

        tx.execute(
            INSERT_BOOK_SQL,
            params![
                book_id.as_str(),
                book.title,
                book.author,
                book.description,
                published,
                book.isbn,
                None::<String>,
                user_id.as_str(),
                now
            ],
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to seed book {}: {}", book.title, e)))?;

        tx.execute(
            INSERT_QUOTE_SQL,
            params![
                Uuid::new_v4().to_string(),
                book.quote,
                book.author,
                user_id.as_str(),
                book_id.as_str(),
                book.quote_is_favorite as i64,
                now
            ],
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to seed quote: {}", e)))?;
    }

    Ok(())
}
