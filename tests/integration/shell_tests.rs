//! Shell operations end to end over HTTP

use std::sync::Arc;

use serde_json::json;

use library_client::{
    api::HttpLibraryApi,
    config::ApiConfig,
    models::{BookDraft, LoginForm, RegistrationForm},
    notify::Level,
    routes::{Decision, Route},
    session::{MemoryStorage, SessionStorage},
    Shell,
};

use crate::mock_server::{MockApi, SEEDED_BOOKS};

fn client(base_url: String) -> HttpLibraryApi {
    HttpLibraryApi::new(&ApiConfig {
        base_url,
        timeout_secs: 5,
    })
    .expect("Failed to build client")
}

/// Start a seeded mock server and a shell pointed at it
async fn setup() -> (Shell, Arc<MemoryStorage>, MockApi) {
    let mock = MockApi::seeded();
    let base_url = mock.clone().spawn().await;
    let storage = Arc::new(MemoryStorage::new());
    let shell = Shell::new(Arc::new(client(base_url)), storage.clone(), 8);
    (shell, storage, mock)
}

fn credentials(username: &str, password: &str) -> LoginForm {
    LoginForm {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_catalog_pagination() {
    let (mut shell, _, _) = setup().await;

    assert!(shell.fetch_catalog_page().await);
    assert_eq!(shell.state().library.len(), 8);
    assert_eq!(shell.state().page, 1);
    assert_eq!(shell.state().total_pages, Some(3));

    assert!(shell.load_more().await);
    assert_eq!(shell.state().page, 2);
    assert_eq!(shell.state().library.len(), 16);
    assert!(!shell.state().scrolling);

    assert!(shell.load_more().await);
    assert_eq!(shell.state().library.len(), SEEDED_BOOKS as usize);

    assert!(!shell.load_more().await);
    assert_eq!(shell.state().page, 3);
}

#[tokio::test]
async fn test_refetching_a_page_duplicates_entries() {
    let (mut shell, _, _) = setup().await;

    shell.fetch_catalog_page().await;
    shell.fetch_catalog_page().await;

    assert_eq!(shell.state().library.len(), 16);
    assert_eq!(shell.state().library[0], shell.state().library[8]);
}

#[tokio::test]
async fn test_register_login_logout() {
    let (mut shell, storage, _) = setup().await;

    let form = RegistrationForm {
        username: "ada".to_string(),
        email: "ada@library.test".to_string(),
        password: "engine".to_string(),
    };
    assert!(shell.register(&form).await);
    assert!(shell.state().registered);

    assert!(!shell.register(&form).await);
    assert_eq!(
        shell.state().errors.registration.get("username"),
        Some(&json!("Username already taken"))
    );

    assert!(shell.log_in(&credentials("ada", "engine")).await);
    assert_eq!(
        storage.access_token().unwrap().as_deref(),
        Some("token-ada")
    );
    assert!(shell.state().session.logged_in);
    assert!(!shell.state().session.is_admin);
    assert!(shell.state().errors.login.is_empty());

    assert!(shell.fetch_user().await);
    let user = shell.state().session.user.clone().expect("No user loaded");
    assert_eq!(user.email.as_deref(), Some("ada@library.test"));

    shell.log_out();
    assert_eq!(storage.access_token().unwrap(), None);
    assert!(!shell.state().session.logged_in);
    assert!(shell.state().session.user.is_none());
}

#[tokio::test]
async fn test_bad_credentials_ignore_http_status() {
    let (mut shell, storage, _) = setup().await;

    assert!(!shell.log_in(&credentials("admin", "wrong")).await);
    assert_eq!(
        shell.state().errors.login.message(),
        Some("Invalid username or password")
    );
    assert_eq!(storage.access_token().unwrap(), None);
    assert!(!shell.state().loading);
}

#[tokio::test]
async fn test_admin_manages_books() {
    let (mut shell, _, _) = setup().await;
    assert!(shell.log_in(&credentials("admin", "admin")).await);
    assert!(shell.state().session.is_admin);
    shell.fetch_catalog_page().await;

    let draft = BookDraft::new("Kindred").with_field("author", "Octavia E. Butler");
    assert!(shell.create_book(&draft).await);
    let created = shell.state().library.last().cloned().expect("No book added");
    assert_eq!(created.title, "Kindred");
    assert_eq!(created.field_str("author"), Some("Octavia E. Butler"));

    assert!(!shell.create_book(&BookDraft::new("")).await);
    assert_eq!(
        shell.state().errors.book.get("title"),
        Some(&json!("Title is required"))
    );

    let before = shell.state().library.clone();
    assert!(shell.edit_book(3, &BookDraft::new("Book three")).await);
    assert!(shell.state().errors.book.is_empty());
    for (old, new) in before.iter().zip(&shell.state().library) {
        if old.id == 3 {
            assert_eq!(new.title, "Book three");
            assert_eq!(new.field_str("author"), Some("Author 3"));
        } else {
            assert_eq!(old, new);
        }
    }

    assert!(shell.delete_book(created.id).await);
    assert!(shell.state().find_book(created.id).is_none());

    assert!(!shell.delete_book(created.id).await);
    assert_eq!(shell.state().errors.delete.message(), Some("Book not found"));

    let titles: Vec<_> = shell
        .drain_notifications()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(
        titles,
        vec![
            "Logged In Successfully",
            "Added Kindred",
            "Updated Book three",
            "Book deleted successfully",
        ]
    );
}

#[tokio::test]
async fn test_reader_cannot_create_books() {
    let (mut shell, _, _) = setup().await;
    let form = RegistrationForm {
        username: "reader".to_string(),
        email: "reader@library.test".to_string(),
        password: "pages".to_string(),
    };
    shell.register(&form).await;
    shell.log_in(&credentials("reader", "pages")).await;

    assert_eq!(
        shell.visit("/managebooks").unwrap().decision,
        Decision::Redirect(Route::Login)
    );
    assert!(!shell.create_book(&BookDraft::new("Sneaky")).await);
    assert_eq!(
        shell.state().errors.book.message(),
        Some("Admin access required")
    );
}

#[tokio::test]
async fn test_borrow_return_history() {
    let (mut shell, _, _) = setup().await;
    shell.log_in(&credentials("admin", "admin")).await;
    shell.fetch_catalog_page().await;
    shell.drain_notifications();

    assert!(shell.borrow_book(2).await);
    assert_eq!(
        shell.state().find_book(2).and_then(|b| b.fields.get("available")),
        Some(&json!(false))
    );
    assert!(shell.state().borrowed_books.is_empty());

    assert!(!shell.borrow_book(2).await);
    let warnings: Vec<_> = shell
        .drain_notifications()
        .into_iter()
        .filter(|n| n.level == Level::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].title, "You have already borrowed this book");

    assert!(shell.fetch_borrowed().await);
    assert!(shell.state().is_borrowed(2));

    let library_before = shell.state().library.clone();
    assert!(shell.return_book(2).await);
    assert!(!shell.state().is_borrowed(2));
    assert_eq!(shell.state().library, library_before);

    assert!(!shell.return_book(2).await);
    assert_eq!(
        shell.drain_notifications().last().map(|n| n.title.clone()),
        Some("You have not borrowed this book".to_string())
    );

    assert!(shell.fetch_borrow_history().await);
    let history = &shell.state().history;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].book_id, Some(2));
    assert_eq!(history[0].returned, Some(true));
}

#[tokio::test]
async fn test_authenticated_views_after_login() {
    let (mut shell, _, _) = setup().await;

    assert_eq!(
        shell.visit("/history").unwrap().decision,
        Decision::Redirect(Route::Login)
    );
    shell.log_in(&credentials("admin", "admin")).await;
    assert_eq!(
        shell.visit("/history").unwrap().decision,
        Decision::Render(Route::History)
    );
    assert_eq!(
        shell.visit("/admin").unwrap().decision,
        Decision::Render(Route::Admin)
    );
}

#[tokio::test]
async fn test_every_call_carries_request_id() {
    let (mut shell, _, mock) = setup().await;

    shell.fetch_catalog_page().await;
    shell.log_in(&credentials("admin", "admin")).await;

    let ids = mock.request_ids();
    assert_eq!(ids.len(), 2);
    for id in ids {
        assert!(uuid::Uuid::parse_str(&id).is_ok(), "bad request id {}", id);
    }
}

#[tokio::test]
async fn test_unreachable_server_is_not_fatal() {
    // Reserve a port, then free it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);

    let storage = Arc::new(MemoryStorage::new());
    let mut shell = Shell::new(
        Arc::new(client(format!("http://{}", addr))),
        storage.clone(),
        8,
    );

    assert!(!shell.fetch_catalog_page().await);
    assert!(!shell.state().loading);
    assert!(shell
        .state()
        .errors
        .general
        .message()
        .is_some_and(|m| m.starts_with("HTTP error")));

    storage.store_access_token("token-admin").unwrap();
    assert!(!shell.borrow_book(1).await);
    let toasts = shell.drain_notifications();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, Level::Warning);
}
