//! Application shell: runs remote calls and reconciles them into state
//!
//! Every operation follows the same shape: issue a ticket, mark the request
//! as started, await one status-tagged reply, then apply exactly one action.
//! Transport failures are folded into the same failure path as server
//! rejections, so no operation can leave a loading indicator stuck on.

use std::sync::Arc;

use crate::{
    api::LibraryApi,
    error::{AppError, AppResult},
    models::{ApiReply, BookDraft, BookId, ErrorBucket, LoginForm, RegistrationForm},
    notify::Notification,
    routes::{guard, Decision, Route},
    session::SessionStorage,
    state::{reduce, Action, AppState, Operation, Ticket},
    views::{props_for, ViewProps},
};

/// Result of navigating to a path
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub decision: Decision,
    pub props: ViewProps,
}

pub struct Shell {
    api: Arc<dyn LibraryApi>,
    storage: Arc<dyn SessionStorage>,
    state: AppState,
}

impl Shell {
    pub fn new(api: Arc<dyn LibraryApi>, storage: Arc<dyn SessionStorage>, page_size: u32) -> Self {
        Self {
            api,
            storage,
            state: AppState::new(page_size),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply an action directly. Event loops that run requests themselves
    /// pair this with [`Shell::begin`].
    pub fn dispatch(&mut self, action: Action) {
        reduce(&mut self.state, action);
    }

    /// Issue a ticket for `operation` and mark the request as started
    pub fn begin(&mut self, operation: Operation) -> Ticket {
        let ticket = self.state.tickets.issue(operation);
        self.dispatch(Action::Requested(ticket));
        ticket
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.state.take_notifications()
    }

    fn token(&self) -> Result<String, ErrorBucket> {
        match self.storage.access_token() {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(AppError::Unauthorized("no access token, log in first".to_string())
                .to_bucket()),
            Err(e) => Err(e.to_bucket()),
        }
    }

    /// Fetch the current page and append it to the library
    pub async fn fetch_catalog_page(&mut self) -> bool {
        let ticket = self.begin(Operation::FetchCatalog);
        let (page, limit) = (self.state.page, self.state.limit);
        let reply = settle(ticket, self.api.fetch_books(page, limit).await);

        if let ApiReply::Success(result) = &reply {
            tracing::info!(page, limit, books = result.books.len(), "Catalog page loaded");
        }
        let success = reply.is_success();
        self.dispatch(Action::CatalogLoaded { ticket, reply });
        success
    }

    /// Advance to the next page and fetch it.
    ///
    /// Returns `false` without doing anything while a catalog request is
    /// pending or when the last known page was already loaded.
    pub async fn load_more(&mut self) -> bool {
        if self.state.catalog_pending() || !self.state.has_more_pages() {
            tracing::debug!(
                page = self.state.page,
                total_pages = ?self.state.total_pages,
                "Load more skipped"
            );
            return false;
        }
        self.dispatch(Action::LoadMoreRequested);
        self.fetch_catalog_page().await;
        true
    }

    pub async fn register(&mut self, form: &RegistrationForm) -> bool {
        let ticket = self.begin(Operation::Register);
        let reply = settle(ticket, self.api.register_user(form).await);

        if reply.is_success() {
            tracing::info!(username = %form.username, "User registered");
        }
        let success = reply.is_success();
        self.dispatch(Action::Registered { ticket, reply });
        success
    }

    pub async fn log_in(&mut self, form: &LoginForm) -> bool {
        let ticket = self.begin(Operation::LogIn);
        let mut reply = settle(ticket, self.api.login_user(form).await);

        // A session whose token cannot be persisted is not a session
        let persisted = match &reply {
            ApiReply::Success(grant) => Some(
                self.storage
                    .store_access_token(&grant.access_token)
                    .map(|()| grant.user.role()),
            ),
            ApiReply::Failure(_) => None,
        };
        match persisted {
            Some(Ok(role)) => tracing::info!(username = %form.username, %role, "Logged in"),
            Some(Err(e)) => reply = ApiReply::Failure(e.to_bucket()),
            None => {}
        }
        let success = reply.is_success();
        self.dispatch(Action::LoggedIn { ticket, reply });
        success
    }

    /// Local only; a storage failure is logged and the session still ends
    pub fn log_out(&mut self) {
        if let Err(e) = self.storage.clear_access_token() {
            tracing::warn!(error = %e, "Failed to clear persisted access token");
        }
        self.dispatch(Action::LoggedOut);
        tracing::info!("Logged out");
    }

    pub async fn fetch_user(&mut self) -> bool {
        let ticket = self.begin(Operation::FetchUser);
        let reply = match self.token() {
            Ok(token) => settle(ticket, self.api.fetch_user(&token).await),
            Err(bucket) => ApiReply::Failure(bucket),
        };
        let success = reply.is_success();
        self.dispatch(Action::UserLoaded { ticket, reply });
        success
    }

    pub async fn create_book(&mut self, draft: &BookDraft) -> bool {
        let ticket = self.begin(Operation::CreateBook);
        let reply = match self.token() {
            Ok(token) => settle(ticket, self.api.add_book(draft, &token).await),
            Err(bucket) => ApiReply::Failure(bucket),
        };

        if let ApiReply::Success(payload) = &reply {
            tracing::info!(book_id = payload.book.id, title = %payload.book.title, "Book created");
        }
        let success = reply.is_success();
        self.dispatch(Action::BookCreated { ticket, reply });
        success
    }

    pub async fn edit_book(&mut self, id: BookId, draft: &BookDraft) -> bool {
        let ticket = self.begin(Operation::EditBook);
        let reply = match self.token() {
            Ok(token) => settle(ticket, self.api.edit_book(draft, id, &token).await),
            Err(bucket) => ApiReply::Failure(bucket),
        };

        if reply.is_success() {
            tracing::info!(book_id = id, "Book updated");
        }
        let success = reply.is_success();
        self.dispatch(Action::BookEdited { ticket, reply });
        success
    }

    pub async fn delete_book(&mut self, id: BookId) -> bool {
        let ticket = self.begin(Operation::DeleteBook);
        let reply = match self.token() {
            Ok(token) => settle(ticket, self.api.remove_book(id, &token).await),
            Err(bucket) => ApiReply::Failure(bucket),
        };

        if reply.is_success() {
            tracing::info!(book_id = id, "Book deleted");
        }
        let success = reply.is_success();
        self.dispatch(Action::BookDeleted { ticket, id, reply });
        success
    }

    /// Borrow a book. The borrowed list is only refreshed by
    /// [`Shell::fetch_borrowed`].
    pub async fn borrow_book(&mut self, id: BookId) -> bool {
        let ticket = self.begin(Operation::Borrow);
        let reply = match self.token() {
            Ok(token) => settle(ticket, self.api.borrow(id, &token).await),
            Err(bucket) => ApiReply::Failure(bucket),
        };

        if reply.is_success() {
            tracing::info!(book_id = id, "Book borrowed");
        }
        let success = reply.is_success();
        self.dispatch(Action::BookBorrowed { ticket, reply });
        success
    }

    pub async fn fetch_borrowed(&mut self) -> bool {
        let ticket = self.begin(Operation::FetchBorrowed);
        let reply = match self.token() {
            Ok(token) => settle(ticket, self.api.not_returned(&token).await),
            Err(bucket) => ApiReply::Failure(bucket),
        };
        let success = reply.is_success();
        self.dispatch(Action::BorrowedLoaded { ticket, reply });
        success
    }

    pub async fn return_book(&mut self, id: BookId) -> bool {
        let ticket = self.begin(Operation::ReturnBook);
        let reply = match self.token() {
            Ok(token) => settle(ticket, self.api.return_book(id, &token).await),
            Err(bucket) => ApiReply::Failure(bucket),
        };

        if reply.is_success() {
            tracing::info!(book_id = id, "Book returned");
        }
        let success = reply.is_success();
        self.dispatch(Action::BookReturned { ticket, id, reply });
        success
    }

    pub async fn fetch_borrow_history(&mut self) -> bool {
        let ticket = self.begin(Operation::FetchHistory);
        let reply = match self.token() {
            Ok(token) => settle(ticket, self.api.borrowing_history(&token).await),
            Err(bucket) => ApiReply::Failure(bucket),
        };
        let success = reply.is_success();
        self.dispatch(Action::HistoryLoaded { ticket, reply });
        success
    }

    pub fn clear_errors(&mut self) {
        self.dispatch(Action::ErrorsCleared);
    }

    pub fn toggle_modal(&mut self) {
        self.dispatch(Action::ModalToggled);
    }

    pub fn toggle_delete_alert(&mut self) {
        self.dispatch(Action::DeleteAlertToggled);
    }

    pub fn toggle_loading(&mut self) {
        self.dispatch(Action::LoadingToggled);
    }

    /// Resolve a path, apply the guard and project the props of the view
    /// that ends up rendering
    pub fn visit(&self, path: &str) -> AppResult<Visit> {
        let route = Route::from_path(path)
            .ok_or_else(|| AppError::InvalidCommand(format!("no route for {}", path)))?;
        let decision = guard(route, &self.state.session);
        Ok(Visit {
            decision,
            props: props_for(decision.route(), &self.state),
        })
    }
}

/// Fold a transport failure into the failure variant
fn settle<T>(ticket: Ticket, result: AppResult<ApiReply<T>>) -> ApiReply<T> {
    match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(operation = %ticket.operation, error = %e, "Request failed");
            ApiReply::Failure(e.to_bucket())
        }
    }
}
