//! Data models exchanged with the library API

pub mod book;
pub mod loan;
pub mod reply;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookDraft, BookId, BookPayload, BooksPage};
pub use loan::{BorrowRecord, BorrowedPayload, HistoryPayload};
pub use reply::{Ack, ApiReply, ErrorBucket};
pub use user::{LoginForm, LoginGrant, RegistrationForm, Role, UserPayload, UserProfile};
