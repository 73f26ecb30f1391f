//! Remote library API surface consumed by the shell

pub mod http;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        Ack, ApiReply, BookDraft, BookId, BookPayload, BooksPage, BorrowedPayload,
        HistoryPayload, LoginForm, LoginGrant, RegistrationForm, UserPayload,
    },
};

pub use http::HttpLibraryApi;

/// One method per remote call.
///
/// `Err` means the call never produced a status-tagged body (network or decode
/// failure); server-side rejections come back as `Ok(ApiReply::Failure(_))`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryApi: Send + Sync {
    async fn fetch_books(&self, page: u32, limit: u32) -> AppResult<ApiReply<BooksPage>>;

    async fn register_user(&self, form: &RegistrationForm) -> AppResult<ApiReply<Ack>>;

    async fn login_user(&self, form: &LoginForm) -> AppResult<ApiReply<LoginGrant>>;

    async fn fetch_user(&self, token: &str) -> AppResult<ApiReply<UserPayload>>;

    async fn add_book(&self, draft: &BookDraft, token: &str) -> AppResult<ApiReply<BookPayload>>;

    async fn edit_book(
        &self,
        draft: &BookDraft,
        id: BookId,
        token: &str,
    ) -> AppResult<ApiReply<BookPayload>>;

    async fn remove_book(&self, id: BookId, token: &str) -> AppResult<ApiReply<Ack>>;

    async fn borrow(&self, id: BookId, token: &str) -> AppResult<ApiReply<BookPayload>>;

    async fn not_returned(&self, token: &str) -> AppResult<ApiReply<BorrowedPayload>>;

    async fn return_book(&self, id: BookId, token: &str) -> AppResult<ApiReply<Ack>>;

    async fn borrowing_history(&self, token: &str) -> AppResult<ApiReply<HistoryPayload>>;
}
