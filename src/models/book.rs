//! Book (catalog entry) model and related types

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub type BookId = i64;

/// Catalog entry as returned by the server.
///
/// Only `id` and `title` are interpreted here; every other catalog field is
/// carried through untouched in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl Book {
    pub fn new(id: BookId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Servers send `"title": null` for untitled entries
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Create/edit book request body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl BookDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// One page of the catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BooksPage {
    pub books: Vec<Book>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: Option<u32>,
}

/// Single book payload (create, edit and borrow responses)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookPayload {
    pub book: Book,
}
