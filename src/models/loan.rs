//! Loan (borrow) payloads and history records

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::book::{Book, BookId};

/// Past borrow record; opaque beyond the identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub book_id: Option<BookId>,
    #[serde(default)]
    pub returned: Option<bool>,
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

/// Books the session user has not returned yet
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BorrowedPayload {
    #[serde(rename = "borrowedBooks")]
    pub borrowed_books: Vec<Book>,
}

/// Borrowing history of the session user
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryPayload {
    pub history: Vec<BorrowRecord>,
}
