//! reqwest-backed implementation of the library API

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    config::ApiConfig,
    error::AppResult,
    models::{
        Ack, ApiReply, BookDraft, BookId, BookPayload, BooksPage, BorrowedPayload,
        HistoryPayload, LoginForm, LoginGrant, RegistrationForm, UserPayload,
    },
};

use super::LibraryApi;

/// Header carrying a per-call correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct HttpLibraryApi {
    client: Client,
    base_url: String,
}

impl HttpLibraryApi {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode the status-tagged body.
    ///
    /// The HTTP status is logged but not interpreted.
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> AppResult<ApiReply<T>> {
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, operation, "Sending API request");

        let response = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await?;
        let http_status = response.status();
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        let reply = ApiReply::from_value(body)?;

        tracing::debug!(
            %request_id,
            operation,
            http_status = http_status.as_u16(),
            success = reply.is_success(),
            "API response received"
        );
        Ok(reply)
    }
}

#[async_trait]
impl LibraryApi for HttpLibraryApi {
    async fn fetch_books(&self, page: u32, limit: u32) -> AppResult<ApiReply<BooksPage>> {
        let request = self
            .client
            .get(self.url("/books"))
            .query(&[("page", page), ("limit", limit)]);
        self.send("fetch_books", request).await
    }

    async fn register_user(&self, form: &RegistrationForm) -> AppResult<ApiReply<Ack>> {
        let request = self.client.post(self.url("/auth/signup")).json(form);
        self.send("register_user", request).await
    }

    async fn login_user(&self, form: &LoginForm) -> AppResult<ApiReply<LoginGrant>> {
        let request = self.client.post(self.url("/auth/login")).json(form);
        self.send("login_user", request).await
    }

    async fn fetch_user(&self, token: &str) -> AppResult<ApiReply<UserPayload>> {
        let request = self.client.get(self.url("/users")).bearer_auth(token);
        self.send("fetch_user", request).await
    }

    async fn add_book(&self, draft: &BookDraft, token: &str) -> AppResult<ApiReply<BookPayload>> {
        let request = self
            .client
            .post(self.url("/books"))
            .bearer_auth(token)
            .json(draft);
        self.send("add_book", request).await
    }

    async fn edit_book(
        &self,
        draft: &BookDraft,
        id: BookId,
        token: &str,
    ) -> AppResult<ApiReply<BookPayload>> {
        let request = self
            .client
            .put(self.url(&format!("/books/{}", id)))
            .bearer_auth(token)
            .json(draft);
        self.send("edit_book", request).await
    }

    async fn remove_book(&self, id: BookId, token: &str) -> AppResult<ApiReply<Ack>> {
        let request = self
            .client
            .delete(self.url(&format!("/books/{}", id)))
            .bearer_auth(token);
        self.send("remove_book", request).await
    }

    async fn borrow(&self, id: BookId, token: &str) -> AppResult<ApiReply<BookPayload>> {
        let request = self
            .client
            .post(self.url(&format!("/users/books/{}", id)))
            .bearer_auth(token);
        self.send("borrow", request).await
    }

    async fn not_returned(&self, token: &str) -> AppResult<ApiReply<BorrowedPayload>> {
        let request = self
            .client
            .get(self.url("/users/books"))
            .query(&[("returned", "false")])
            .bearer_auth(token);
        self.send("not_returned", request).await
    }

    async fn return_book(&self, id: BookId, token: &str) -> AppResult<ApiReply<Ack>> {
        let request = self
            .client
            .put(self.url(&format!("/users/books/{}", id)))
            .bearer_auth(token);
        self.send("return_book", request).await
    }

    async fn borrowing_history(&self, token: &str) -> AppResult<ApiReply<HistoryPayload>> {
        let request = self.client.get(self.url("/users/books")).bearer_auth(token);
        self.send("borrowing_history", request).await
    }
}
