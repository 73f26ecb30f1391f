//! Pure state transitions

use std::time::Duration;

use crate::models::{ApiReply, Book, BookId, ErrorBucket};
use crate::notify::Notification;

use super::{Action, AppState, ErrorContext, Operation, Ticket};

const LOGIN_TOAST: Duration = Duration::from_secs(1);
const CATALOG_TOAST: Duration = Duration::from_secs(3);
const FALLBACK_WARNING: &str = "Request failed";

/// Apply one action to the state.
///
/// A completion whose ticket was superseded by a newer request of the same
/// operation class is dropped without touching anything.
pub fn reduce(state: &mut AppState, action: Action) {
    if let Some(ticket) = action.ticket() {
        if !matches!(action, Action::Requested(_)) {
            if !state.tickets.is_current(ticket) {
                tracing::debug!(
                    operation = %ticket.operation,
                    generation = ticket.generation,
                    "Discarding superseded response"
                );
                return;
            }
            state.tickets.settle(ticket);
        }
    }

    match action {
        Action::Requested(ticket) => requested(state, ticket),
        Action::LoadMoreRequested => {
            state.page += 1;
            state.scrolling = true;
        }
        Action::CatalogLoaded { reply, .. } => match reply {
            ApiReply::Success(page) => {
                state.library.extend(page.books);
                if page.total_pages.is_some() {
                    state.total_pages = page.total_pages;
                }
                state.loading = false;
                state.scrolling = false;
                state.errors.clear(ErrorContext::General);
            }
            ApiReply::Failure(bucket) => {
                fail(state, ErrorContext::General, bucket);
                state.scrolling = false;
            }
        },
        Action::Registered { reply, .. } => match reply {
            ApiReply::Success(_) => {
                state.registered = true;
                state.loading = false;
                state.errors.clear(ErrorContext::Registration);
                state
                    .notifications
                    .push(Notification::success("Registration successful"));
            }
            ApiReply::Failure(bucket) => fail(state, ErrorContext::Registration, bucket),
        },
        Action::LoggedIn { reply, .. } => match reply {
            ApiReply::Success(grant) => {
                state.session.logged_in = true;
                state.session.is_admin = grant.user.is_admin;
                state.session.user = Some(grant.user);
                state.loading = false;
                state.errors.clear(ErrorContext::Login);
                state
                    .notifications
                    .push(Notification::success("Logged In Successfully").with_timer(LOGIN_TOAST));
            }
            ApiReply::Failure(bucket) => fail(state, ErrorContext::Login, bucket),
        },
        Action::LoggedOut => {
            state.session.logged_in = false;
            state.session.is_admin = false;
            state.session.user = None;
        }
        Action::UserLoaded { reply, .. } => match reply {
            ApiReply::Success(payload) => state.session.user = Some(payload.user),
            ApiReply::Failure(bucket) => state.errors.set(ErrorContext::General, bucket),
        },
        Action::BookCreated { reply, .. } => match reply {
            ApiReply::Success(payload) => {
                let title = format!("Added {}", payload.book.title);
                state.library.push(payload.book);
                state.render_modal = false;
                state.loading = false;
                state.errors.clear(ErrorContext::Book);
                state.errors.clear(ErrorContext::General);
                state
                    .notifications
                    .push(Notification::success(title).with_timer(CATALOG_TOAST));
            }
            ApiReply::Failure(bucket) => fail(state, ErrorContext::Book, bucket),
        },
        Action::BookEdited { reply, .. } => match reply {
            ApiReply::Success(payload) => {
                let title = format!("Updated {}", payload.book.title);
                replace_book(&mut state.library, payload.book);
                state.render_modal = false;
                state.loading = false;
                state.errors.clear(ErrorContext::Book);
                state
                    .notifications
                    .push(Notification::success(title).with_timer(CATALOG_TOAST));
            }
            ApiReply::Failure(bucket) => fail(state, ErrorContext::Book, bucket),
        },
        Action::BookDeleted { id, reply, .. } => match reply {
            ApiReply::Success(_) => {
                remove_book(&mut state.library, id);
                state.render_delete_alert = false;
                state.loading = false;
                state.errors.clear(ErrorContext::Delete);
                state.notifications.push(
                    Notification::success("Book deleted successfully").with_timer(CATALOG_TOAST),
                );
            }
            ApiReply::Failure(bucket) => fail(state, ErrorContext::Delete, bucket),
        },
        Action::BookBorrowed { reply, .. } => match reply {
            ApiReply::Success(payload) => {
                let title = format!("Borrowed {}", payload.book.title);
                replace_book(&mut state.library, payload.book);
                state.loading = false;
                state
                    .notifications
                    .push(Notification::success(title).with_timer(CATALOG_TOAST));
            }
            ApiReply::Failure(bucket) => warn(state, &bucket),
        },
        Action::BorrowedLoaded { reply, .. } => match reply {
            ApiReply::Success(payload) => {
                state.borrowed_books = payload.borrowed_books;
                state.loading = false;
            }
            ApiReply::Failure(bucket) => fail(state, ErrorContext::General, bucket),
        },
        Action::BookReturned { id, reply, .. } => match reply {
            ApiReply::Success(_) => {
                remove_book(&mut state.borrowed_books, id);
                state.loading = false;
                state.notifications.push(
                    Notification::success("Returned successfully").with_timer(CATALOG_TOAST),
                );
            }
            ApiReply::Failure(bucket) => warn(state, &bucket),
        },
        Action::HistoryLoaded { reply, .. } => match reply {
            ApiReply::Success(payload) => {
                state.history = payload.history;
                state.loading = false;
            }
            ApiReply::Failure(bucket) => fail(state, ErrorContext::General, bucket),
        },
        Action::ErrorsCleared => {
            state.errors.clear(ErrorContext::General);
            state.errors.clear(ErrorContext::Registration);
            state.errors.clear(ErrorContext::Login);
        }
        Action::ModalToggled => state.render_modal = !state.render_modal,
        Action::DeleteAlertToggled => state.render_delete_alert = !state.render_delete_alert,
        Action::LoadingToggled => state.loading = !state.loading,
    }
}

fn requested(state: &mut AppState, ticket: Ticket) {
    match ticket.operation {
        // Paged loads keep the list on screen
        Operation::FetchCatalog if state.scrolling => {}
        Operation::FetchUser => {}
        _ => state.loading = true,
    }
}

fn fail(state: &mut AppState, context: ErrorContext, bucket: ErrorBucket) {
    tracing::warn!(?context, error = %bucket, "Request rejected");
    state.errors.set(context, bucket);
    state.loading = false;
}

/// Borrow and return failures only surface as a transient warning
fn warn(state: &mut AppState, bucket: &ErrorBucket) {
    let message = match bucket.message() {
        Some(message) => message.to_string(),
        None if bucket.is_empty() => FALLBACK_WARNING.to_string(),
        None => bucket.to_string(),
    };
    tracing::warn!(%message, "Loan request rejected");
    state.loading = false;
    state.notifications.push(Notification::warning(message));
}

fn replace_book(books: &mut [Book], updated: Book) {
    if let Some(slot) = books.iter_mut().find(|book| book.id == updated.id) {
        *slot = updated;
    }
}

fn remove_book(books: &mut Vec<Book>, id: BookId) {
    books.retain(|book| book.id != id);
}
