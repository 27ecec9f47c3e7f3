//! Database integration tests
//!
//! These tests exercise the LibraryStore against in-memory SQLite.

use bookshelf::{
    auth::jwt::AuthService,
    db::{seed::seed_demo_data, LibraryStore, NewUser},
    types::{AppError, BookRequest, QuoteRequest},
};
use chrono::{Duration, SubsecRound, TimeZone, Utc};
use tempfile::TempDir;

/// Test helper to create a LibraryStore with an in-memory database
async fn create_test_store() -> LibraryStore {
    LibraryStore::new_memory()
        .await
        .expect("Failed to create in-memory database")
}

fn test_auth() -> AuthService {
    AuthService::new(
        "test-secret-key-that-is-at-least-32-chars",
        "bookshelf-api",
        "bookshelf-web",
        Duration::hours(3),
    )
}

async fn add_user(store: &LibraryStore, username: &str, email: &str) -> String {
    store
        .create_user(NewUser {
            username,
            email,
            first_name: None,
            last_name: None,
            password_hash: &[1u8; 64],
            password_salt: &[2u8; 128],
        })
        .await
        .expect("Failed to create user")
        .id
}

fn book(title: &str, isbn: &str) -> BookRequest {
    BookRequest {
        title: title.to_string(),
        author: "Some Author".to_string(),
        description: None,
        published_date: Utc.with_ymd_and_hms(1950, 1, 1, 0, 0, 0).unwrap(),
        isbn: isbn.to_string(),
        cover_image_url: None,
    }
}

fn quote(book_id: &str, text: &str) -> QuoteRequest {
    QuoteRequest {
        text: text.to_string(),
        author: "Some Author".to_string(),
        book_id: book_id.to_string(),
        is_favorite: false,
    }
}

#[tokio::test]
async fn test_create_local_store_creates_parent_dir() {
    let temp_dir = TempDir::new().expect("tempdir");
    let path = temp_dir.path().join("nested").join("bookshelf.db");

    let store = LibraryStore::open(path.to_str().expect("utf8 path"))
        .await
        .expect("Failed to create local database");

    assert!(path.exists());
    assert_eq!(store.count_users().await.expect("count"), 0);
}

#[tokio::test]
async fn test_create_and_fetch_user() {
    let store = create_test_store().await;
    let id = add_user(&store, "reader", "reader@example.com").await;

    let user = store.get_user(&id).await.expect("query").expect("user exists");
    assert_eq!(user.username, "reader");
    assert_eq!(user.password_hash.len(), 64);
    assert_eq!(user.password_salt.len(), 128);
    assert!(user.last_login.is_none());
}

#[tokio::test]
async fn test_username_is_unique_case_insensitively() {
    let store = create_test_store().await;
    add_user(&store, "Reader", "one@example.com").await;

    let result = store
        .create_user(NewUser {
            username: "reader",
            email: "two@example.com",
            first_name: None,
            last_name: None,
            password_hash: &[1u8; 64],
            password_salt: &[2u8; 128],
        })
        .await;

    match result {
        Err(AppError::Conflict { fields, message }) => {
            assert_eq!(fields, vec!["username".to_string()]);
            assert_eq!(message, "Username is already registered");
        }
        other => panic!("expected conflict, got {:?}", other.map(|u| u.id)),
    }
}

#[tokio::test]
async fn test_conflict_reports_username_and_email() {
    let store = create_test_store().await;
    add_user(&store, "alice", "alice@example.com").await;
    add_user(&store, "bob", "bob@example.com").await;

    let result = store
        .create_user(NewUser {
            username: "ALICE",
            email: "Bob@Example.com",
            first_name: None,
            last_name: None,
            password_hash: &[1u8; 64],
            password_salt: &[2u8; 128],
        })
        .await;

    match result {
        Err(AppError::Conflict { fields, .. }) => {
            assert!(fields.contains(&"username".to_string()));
            assert!(fields.contains(&"email".to_string()));
        }
        other => panic!("expected conflict, got {:?}", other.map(|u| u.id)),
    }
    assert_eq!(store.count_users().await.expect("count"), 2);
}

#[tokio::test]
async fn test_login_lookup_by_username_or_email() {
    let store = create_test_store().await;
    let id = add_user(&store, "reader", "reader@example.com").await;

    let by_name = store.find_user_for_login("READER").await.expect("query");
    let by_email = store
        .find_user_for_login("reader@example.com")
        .await
        .expect("query");
    let missing = store.find_user_for_login("nobody").await.expect("query");

    assert_eq!(by_name.map(|u| u.id), Some(id.clone()));
    assert_eq!(by_email.map(|u| u.id), Some(id));
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_record_login() {
    let store = create_test_store().await;
    let id = add_user(&store, "reader", "reader@example.com").await;
    let now = Utc::now().trunc_subsecs(6);

    store.record_login(&id, now).await.expect("record");

    let user = store.get_user(&id).await.expect("query").expect("user");
    assert_eq!(user.last_login, Some(now));
}

#[tokio::test]
async fn test_duplicate_isbn_is_conflict() {
    let store = create_test_store().await;
    let owner = add_user(&store, "reader", "reader@example.com").await;

    store
        .create_book(&owner, &book("First", "978-1"))
        .await
        .expect("first book");
    let result = store.create_book(&owner, &book("Second", "978-1")).await;

    assert!(matches!(
        result,
        Err(AppError::Conflict { ref fields, .. }) if fields == &vec!["isbn".to_string()]
    ));
    assert_eq!(store.list_books().await.expect("list").len(), 1);
}

#[tokio::test]
async fn test_book_update_is_guarded_by_expected_owner() {
    let store = create_test_store().await;
    let alice = add_user(&store, "alice", "alice@example.com").await;
    let bob = add_user(&store, "bob", "bob@example.com").await;
    let created = store
        .create_book(&alice, &book("Dune", "978-2"))
        .await
        .expect("book");
    assert!(created.updated_at.is_none());

    // Stale owner: nothing changes
    let stale = store
        .update_book(&created.id, &bob, &bob, &book("Dune Messiah", "978-2"))
        .await
        .expect("update");
    assert!(stale.is_none());

    // Claim from the real owner
    let updated = store
        .update_book(&created.id, &bob, &alice, &book("Dune Messiah", "978-2"))
        .await
        .expect("update")
        .expect("row matched");
    assert_eq!(updated.title, "Dune Messiah");
    assert_eq!(updated.added_by_user_id, bob);
    assert_eq!(updated.added_by_username, "bob");
    assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn test_book_fields_are_stored_exactly() {
    let store = create_test_store().await;
    let owner = add_user(&store, "reader", "reader@example.com").await;
    let submitted = BookRequest {
        title: "  Dune ".to_string(),
        author: "Frank Herbert".to_string(),
        description: Some(" Spice and sandworms. ".to_string()),
        published_date: Utc
            .with_ymd_and_hms(1965, 8, 1, 12, 34, 56)
            .unwrap()
            + Duration::nanoseconds(789_123_456),
        isbn: "978-0441013593".to_string(),
        cover_image_url: Some("https://covers.example.com/dune.jpg ".to_string()),
    };

    let created = store.create_book(&owner, &submitted).await.expect("book");
    let fetched = store
        .get_book(&created.id)
        .await
        .expect("query")
        .expect("book");

    assert_eq!(fetched.title, submitted.title);
    assert_eq!(fetched.author, submitted.author);
    assert_eq!(fetched.description, submitted.description);
    assert_eq!(fetched.published_date, submitted.published_date);
    assert_eq!(fetched.isbn, submitted.isbn);
    assert_eq!(fetched.cover_image_url, submitted.cover_image_url);
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn test_updated_at_advances_on_every_write() {
    let store = create_test_store().await;
    let owner = add_user(&store, "reader", "reader@example.com").await;
    let created = store
        .create_book(&owner, &book("Dune", "978-2"))
        .await
        .expect("book");

    let mut last = created.created_at;
    for title in ["Dune Messiah", "Children of Dune", "God Emperor of Dune"] {
        let updated = store
            .update_book(&created.id, &owner, &owner, &book(title, "978-2"))
            .await
            .expect("update")
            .expect("row matched");
        let stamp = updated.updated_at.expect("updated_at set");
        assert!(stamp > last, "{} should be after {}", stamp, last);
        last = stamp;
    }

    let saved = store
        .create_quote(&owner, &quote(&created.id, "Fear is the mind-killer."))
        .await
        .expect("quote");
    assert!(store.toggle_quote_favorite(&saved.id, &owner).await.expect("toggle"));
    let first = store
        .get_quote_for_user(&saved.id, &owner)
        .await
        .expect("get")
        .and_then(|q| q.updated_at)
        .expect("updated_at set");
    assert!(store.toggle_quote_favorite(&saved.id, &owner).await.expect("toggle"));
    let second = store
        .get_quote_for_user(&saved.id, &owner)
        .await
        .expect("get")
        .and_then(|q| q.updated_at)
        .expect("updated_at set");
    assert!(second > first);
}

#[tokio::test]
async fn test_deleting_book_cascades_to_quotes_and_favorites() {
    let store = create_test_store().await;
    let owner = add_user(&store, "reader", "reader@example.com").await;
    let created = store
        .create_book(&owner, &book("Dune", "978-2"))
        .await
        .expect("book");
    store
        .create_quote(&owner, &quote(&created.id, "Fear is the mind-killer."))
        .await
        .expect("quote");
    store.add_favorite(&owner, &created.id).await.expect("favorite");

    assert!(!store.delete_book(&created.id, "someone-else").await.expect("delete"));
    assert!(store.delete_book(&created.id, &owner).await.expect("delete"));

    assert!(store.list_quotes(&owner).await.expect("quotes").is_empty());
    assert!(store
        .list_favorite_books(&owner)
        .await
        .expect("favorites")
        .is_empty());
}

#[tokio::test]
async fn test_quote_for_missing_book_is_not_found() {
    let store = create_test_store().await;
    let owner = add_user(&store, "reader", "reader@example.com").await;

    let result = store.create_quote(&owner, &quote("no-such-book", "text")).await;

    assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Book not found"));
}

#[tokio::test]
async fn test_quotes_are_scoped_to_their_owner() {
    let store = create_test_store().await;
    let alice = add_user(&store, "alice", "alice@example.com").await;
    let bob = add_user(&store, "bob", "bob@example.com").await;
    let created = store
        .create_book(&alice, &book("Dune", "978-2"))
        .await
        .expect("book");
    let saved = store
        .create_quote(&alice, &quote(&created.id, "Fear is the mind-killer."))
        .await
        .expect("quote");
    assert_eq!(saved.book_title, "Dune");

    assert!(store.list_quotes(&bob).await.expect("list").is_empty());
    assert!(store
        .get_quote_for_user(&saved.id, &bob)
        .await
        .expect("get")
        .is_none());
    assert_eq!(
        store.quote_owner(&saved.id).await.expect("owner"),
        Some(alice.clone())
    );
    assert!(!store.delete_quote(&saved.id, &bob).await.expect("delete"));
    assert!(!store.toggle_quote_favorite(&saved.id, &bob).await.expect("toggle"));

    assert!(store.toggle_quote_favorite(&saved.id, &alice).await.expect("toggle"));
    let toggled = store
        .get_quote_for_user(&saved.id, &alice)
        .await
        .expect("get")
        .expect("own quote");
    assert!(toggled.is_favorite);
    assert!(toggled.updated_at.is_some());
}

#[tokio::test]
async fn test_favorite_pair_is_unique() {
    let store = create_test_store().await;
    let owner = add_user(&store, "reader", "reader@example.com").await;
    let created = store
        .create_book(&owner, &book("Dune", "978-2"))
        .await
        .expect("book");

    store.add_favorite(&owner, &created.id).await.expect("first");
    let duplicate = store.add_favorite(&owner, &created.id).await;
    assert!(matches!(duplicate, Err(AppError::Conflict { .. })));

    let missing_book = store.add_favorite(&owner, "no-such-book").await;
    assert!(matches!(missing_book, Err(AppError::NotFound(_))));

    let favorites = store.list_favorite_books(&owner).await.expect("list");
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, created.id);

    assert!(store.remove_favorite(&owner, &created.id).await.expect("remove"));
    assert!(!store.remove_favorite(&owner, &created.id).await.expect("remove"));
}

#[tokio::test]
async fn test_user_owning_books_cannot_be_deleted() {
    let store = create_test_store().await;
    let owner = add_user(&store, "reader", "reader@example.com").await;
    store
        .create_book(&owner, &book("Dune", "978-2"))
        .await
        .expect("book");

    let conn = store.connection().await.expect("conn");
    let result = conn
        .execute("DELETE FROM users WHERE id = ?1", libsql::params![owner.as_str()])
        .await;

    assert!(result.is_err(), "RESTRICT should keep the owner row");
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let store = create_test_store().await;
    let auth = test_auth();

    assert!(seed_demo_data(&store, &auth).await.expect("seed"));
    assert!(!seed_demo_data(&store, &auth).await.expect("second seed"));

    assert_eq!(store.count_users().await.expect("count"), 1);
    let books = store.list_books().await.expect("books");
    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["1984", "The Great Gatsby"]);

    let user = store
        .find_user_for_login("testuser")
        .await
        .expect("query")
        .expect("demo user");
    assert_eq!(store.list_quotes(&user.id).await.expect("quotes").len(), 2);
    assert!(auth
        .verify_password("Test123!", Some((&user.password_salt, &user.password_hash)))
        .expect("verify"));
}

#[tokio::test]
async fn test_seed_rolls_back_on_failure() {
    let store = create_test_store().await;
    let auth = test_auth();

    // A stray book holding a demo ISBN makes the seed fail partway through
    let conn = store.connection().await.expect("conn");
    conn.execute_batch(
        "PRAGMA foreign_keys = OFF;
         INSERT INTO books (id, title, author, published_date, isbn, added_by_user_id, created_at)
         VALUES ('b0', 'Squatter', 'X', '1970-01-01T00:00:00Z', '978-0451524935', 'ghost', 0);
         PRAGMA foreign_keys = ON;",
    )
    .await
    .expect("plant book");

    let result = seed_demo_data(&store, &auth).await;

    assert!(result.is_err());
    assert_eq!(store.count_users().await.expect("count"), 0);
}
