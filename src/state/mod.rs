//! Client-side application state
//!
//! [`AppState`] holds every piece of session and catalog state the views read.
//! It only changes through [`reduce`], which applies one [`Action`] at a time
//! and performs no I/O.

pub mod action;
pub mod reducer;
pub mod ticket;

use serde::Serialize;

use crate::models::{Book, BookId, BorrowRecord, ErrorBucket, UserProfile};
use crate::notify::Notification;

pub use action::Action;
pub use reducer::reduce;
pub use ticket::{Operation, RequestTickets, Ticket};

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// Authentication status of the current user
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub logged_in: bool,
    pub is_admin: bool,
    pub user: Option<UserProfile>,
}

/// Form context an error bucket belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorContext {
    General,
    Login,
    Registration,
    Book,
    Delete,
}

/// One bucket per form context, each cleared independently
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorBuckets {
    pub general: ErrorBucket,
    pub login: ErrorBucket,
    pub registration: ErrorBucket,
    pub book: ErrorBucket,
    pub delete: ErrorBucket,
}

impl ErrorBuckets {
    pub fn get(&self, context: ErrorContext) -> &ErrorBucket {
        match context {
            ErrorContext::General => &self.general,
            ErrorContext::Login => &self.login,
            ErrorContext::Registration => &self.registration,
            ErrorContext::Book => &self.book,
            ErrorContext::Delete => &self.delete,
        }
    }

    pub fn set(&mut self, context: ErrorContext, bucket: ErrorBucket) {
        match context {
            ErrorContext::General => self.general = bucket,
            ErrorContext::Login => self.login = bucket,
            ErrorContext::Registration => self.registration = bucket,
            ErrorContext::Book => self.book = bucket,
            ErrorContext::Delete => self.delete = bucket,
        }
    }

    pub fn clear(&mut self, context: ErrorContext) {
        self.set(context, ErrorBucket::new());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    /// Full-page loading indicator
    pub loading: bool,
    /// Append-style loading; the current list stays visible
    pub scrolling: bool,
    pub errors: ErrorBuckets,
    pub session: Session,
    pub registered: bool,

    /// Catalog accumulated across pages, never de-duplicated
    pub library: Vec<Book>,
    pub page: u32,
    pub limit: u32,
    pub total_pages: Option<u32>,

    pub render_modal: bool,
    pub render_delete_alert: bool,

    pub borrowed_books: Vec<Book>,
    pub history: Vec<BorrowRecord>,

    #[serde(skip)]
    pub notifications: Vec<Notification>,
    #[serde(skip)]
    pub tickets: RequestTickets,
}

impl AppState {
    pub fn new(limit: u32) -> Self {
        Self {
            loading: false,
            scrolling: false,
            errors: ErrorBuckets::default(),
            session: Session::default(),
            registered: false,
            library: Vec::new(),
            page: 1,
            limit: limit.max(1),
            total_pages: None,
            render_modal: false,
            render_delete_alert: false,
            borrowed_books: Vec::new(),
            history: Vec::new(),
            notifications: Vec::new(),
            tickets: RequestTickets::default(),
        }
    }

    /// Whether a catalog request (fresh or paged) is still awaiting its response
    pub fn catalog_pending(&self) -> bool {
        self.tickets.is_pending(Operation::FetchCatalog)
    }

    /// More pages exist, or the page count is not known yet
    pub fn has_more_pages(&self) -> bool {
        self.total_pages.map_or(true, |total| self.page < total)
    }

    pub fn find_book(&self, id: BookId) -> Option<&Book> {
        self.library.iter().find(|book| book.id == id)
    }

    pub fn is_borrowed(&self, id: BookId) -> bool {
        self.borrowed_books.iter().any(|book| book.id == id)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
