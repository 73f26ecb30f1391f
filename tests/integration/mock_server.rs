//! In-process stand-in for the library API

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use library_client::models::{Book, BookId};

pub const SEEDED_BOOKS: i64 = 20;

type Reply = (StatusCode, Json<Value>);

struct Account {
    password: String,
    email: String,
    is_admin: bool,
}

#[derive(Default)]
struct Library {
    books: Vec<Book>,
    accounts: HashMap<String, Account>,
    borrowed: HashMap<String, Vec<BookId>>,
    history: HashMap<String, Vec<Value>>,
    next_id: BookId,
    request_ids: Vec<String>,
}

#[derive(Clone, Default)]
pub struct MockApi {
    inner: Arc<Mutex<Library>>,
}

impl MockApi {
    pub fn seeded() -> Self {
        let mut library = Library::default();
        for id in 1..=SEEDED_BOOKS {
            library.books.push(
                Book::new(id, format!("Book {}", id))
                    .with_field("author", format!("Author {}", id))
                    .with_field("available", true),
            );
        }
        library.next_id = SEEDED_BOOKS + 1;
        library.accounts.insert(
            "admin".to_string(),
            Account {
                password: "admin".to_string(),
                email: "admin@library.test".to_string(),
                is_admin: true,
            },
        );
        Self {
            inner: Arc::new(Mutex::new(library)),
        }
    }

    pub fn request_ids(&self) -> Vec<String> {
        self.inner.lock().unwrap().request_ids.clone()
    }

    /// Serve on an ephemeral port and return the API base URL
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/books", get(list_books).post(create_book))
            .route("/books/:id", put(update_book).delete(delete_book))
            .route("/auth/signup", post(signup))
            .route("/auth/login", post(login))
            .route("/users", get(current_user))
            .route("/users/books", get(user_books))
            .route("/users/books/:id", post(borrow_book).put(return_book))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr: SocketAddr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server failed");
        });
        format!("http://{}", addr)
    }
}

fn success(mut body: Value) -> Reply {
    body["status"] = json!("success");
    (StatusCode::OK, Json(body))
}

fn failure(status: StatusCode, error: Value) -> Reply {
    (status, Json(json!({"status": "fail", "error": error})))
}

fn record_request(library: &mut Library, headers: &HeaderMap) {
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        library.request_ids.push(id.to_string());
    }
}

/// Tokens are `token-<username>`
fn caller(library: &Library, headers: &HeaderMap) -> Option<String> {
    let token = headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    let username = token.strip_prefix("token-")?;
    library
        .accounts
        .contains_key(username)
        .then(|| username.to_string())
}

fn unauthorized() -> Reply {
    failure(
        StatusCode::UNAUTHORIZED,
        json!({"message": "Please log in"}),
    )
}

#[derive(Deserialize)]
struct PageQuery {
    page: usize,
    limit: usize,
}

async fn list_books(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Reply {
    let mut library = api.inner.lock().unwrap();
    record_request(&mut library, &headers);

    let limit = query.limit.max(1);
    let total_pages = library.books.len().div_ceil(limit);
    let books: Vec<&Book> = library
        .books
        .iter()
        .skip(query.page.saturating_sub(1) * limit)
        .take(limit)
        .collect();
    success(json!({"books": books, "totalPages": total_pages}))
}

async fn signup(State(api): State<MockApi>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut library = api.inner.lock().unwrap();
    record_request(&mut library, &headers);

    let username = body["username"].as_str().unwrap_or_default().to_string();
    if username.is_empty() {
        return failure(
            StatusCode::BAD_REQUEST,
            json!({"username": "Username is required"}),
        );
    }
    if library.accounts.contains_key(&username) {
        return failure(
            StatusCode::CONFLICT,
            json!({"username": "Username already taken"}),
        );
    }
    library.accounts.insert(
        username,
        Account {
            password: body["password"].as_str().unwrap_or_default().to_string(),
            email: body["email"].as_str().unwrap_or_default().to_string(),
            is_admin: false,
        },
    );
    success(json!({}))
}

async fn login(State(api): State<MockApi>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut library = api.inner.lock().unwrap();
    record_request(&mut library, &headers);

    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match library.accounts.get(username) {
        Some(account) if account.password == password => success(json!({
            "accessToken": format!("token-{}", username),
            "user": {"username": username, "email": account.email, "is_admin": account.is_admin}
        })),
        _ => failure(
            StatusCode::UNAUTHORIZED,
            json!({"message": "Invalid username or password"}),
        ),
    }
}

async fn current_user(State(api): State<MockApi>, headers: HeaderMap) -> Reply {
    let library = api.inner.lock().unwrap();
    let Some(username) = caller(&library, &headers) else {
        return unauthorized();
    };
    let account = &library.accounts[&username];
    success(json!({
        "user": {"username": username, "email": account.email, "is_admin": account.is_admin}
    }))
}

fn require_admin(library: &Library, headers: &HeaderMap) -> Result<(), Reply> {
    let username = caller(library, headers).ok_or_else(unauthorized)?;
    if library.accounts[&username].is_admin {
        Ok(())
    } else {
        Err(failure(
            StatusCode::FORBIDDEN,
            json!({"message": "Admin access required"}),
        ))
    }
}

async fn create_book(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut library = api.inner.lock().unwrap();
    if let Err(reply) = require_admin(&library, &headers) {
        return reply;
    }

    let Some(title) = body["title"].as_str().filter(|t| !t.is_empty()) else {
        return failure(StatusCode::BAD_REQUEST, json!({"title": "Title is required"}));
    };
    let mut book = Book::new(library.next_id, title).with_field("available", true);
    if let Some(author) = body["author"].as_str() {
        book = book.with_field("author", author);
    }
    library.next_id += 1;
    library.books.push(book.clone());
    success(json!({"book": book}))
}

async fn update_book(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<BookId>,
    Json(body): Json<Value>,
) -> Reply {
    let mut library = api.inner.lock().unwrap();
    if let Err(reply) = require_admin(&library, &headers) {
        return reply;
    }

    let Some(book) = library.books.iter_mut().find(|b| b.id == id) else {
        return failure(StatusCode::NOT_FOUND, json!({"message": "Book not found"}));
    };
    if let Some(title) = body["title"].as_str() {
        book.title = title.to_string();
    }
    if let Some(author) = body["author"].as_str() {
        book.fields.insert("author".to_string(), json!(author));
    }
    let book = book.clone();
    success(json!({"book": book}))
}

async fn delete_book(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<BookId>,
) -> Reply {
    let mut library = api.inner.lock().unwrap();
    if let Err(reply) = require_admin(&library, &headers) {
        return reply;
    }

    let before = library.books.len();
    library.books.retain(|b| b.id != id);
    if library.books.len() == before {
        return failure(StatusCode::NOT_FOUND, json!({"message": "Book not found"}));
    }
    success(json!({}))
}

async fn borrow_book(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<BookId>,
) -> Reply {
    let mut library = api.inner.lock().unwrap();
    let Some(username) = caller(&library, &headers) else {
        return unauthorized();
    };

    let already = library
        .borrowed
        .get(&username)
        .is_some_and(|ids| ids.contains(&id));
    if already {
        return failure(
            StatusCode::CONFLICT,
            json!({"Message": "You have already borrowed this book"}),
        );
    }
    let Some(book) = library.books.iter_mut().find(|b| b.id == id) else {
        return failure(StatusCode::NOT_FOUND, json!({"Message": "Book not found"}));
    };
    book.fields.insert("available".to_string(), json!(false));
    let book = book.clone();

    library.borrowed.entry(username.clone()).or_default().push(id);
    library
        .history
        .entry(username)
        .or_default()
        .push(json!({"id": id, "book_id": id, "returned": false}));
    success(json!({"book": book}))
}

async fn return_book(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<BookId>,
) -> Reply {
    let mut library = api.inner.lock().unwrap();
    let Some(username) = caller(&library, &headers) else {
        return unauthorized();
    };

    let ids = library.borrowed.entry(username.clone()).or_default();
    let Some(position) = ids.iter().position(|b| *b == id) else {
        return failure(
            StatusCode::BAD_REQUEST,
            json!({"Message": "You have not borrowed this book"}),
        );
    };
    ids.remove(position);

    if let Some(book) = library.books.iter_mut().find(|b| b.id == id) {
        book.fields.insert("available".to_string(), json!(true));
    }
    if let Some(record) = library
        .history
        .entry(username)
        .or_default()
        .iter_mut()
        .rev()
        .find(|r| r["book_id"] == json!(id) && r["returned"] == json!(false))
    {
        record["returned"] = json!(true);
    }
    success(json!({}))
}

#[derive(Deserialize)]
struct LoanQuery {
    returned: Option<bool>,
}

async fn user_books(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Query(query): Query<LoanQuery>,
) -> Reply {
    let library = api.inner.lock().unwrap();
    let Some(username) = caller(&library, &headers) else {
        return unauthorized();
    };

    match query.returned {
        Some(false) => {
            let ids = library.borrowed.get(&username).cloned().unwrap_or_default();
            let books: Vec<&Book> = library
                .books
                .iter()
                .filter(|b| ids.contains(&b.id))
                .collect();
            success(json!({"borrowedBooks": books}))
        }
        _ => {
            let history = library.history.get(&username).cloned().unwrap_or_default();
            success(json!({"history": history}))
        }
    }
}
