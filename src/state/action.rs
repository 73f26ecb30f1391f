//! Tagged state transitions

use crate::models::{
    Ack, ApiReply, BookId, BookPayload, BooksPage, BorrowedPayload, HistoryPayload, LoginGrant,
    UserPayload,
};

use super::ticket::Ticket;

/// Everything that can change [`AppState`](super::AppState).
///
/// Completion variants carry the ticket of the request they answer so late
/// responses can be recognized and dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A remote call was issued
    Requested(Ticket),
    /// Next catalog page requested by scrolling
    LoadMoreRequested,
    CatalogLoaded {
        ticket: Ticket,
        reply: ApiReply<BooksPage>,
    },
    Registered {
        ticket: Ticket,
        reply: ApiReply<Ack>,
    },
    LoggedIn {
        ticket: Ticket,
        reply: ApiReply<LoginGrant>,
    },
    LoggedOut,
    UserLoaded {
        ticket: Ticket,
        reply: ApiReply<UserPayload>,
    },
    BookCreated {
        ticket: Ticket,
        reply: ApiReply<BookPayload>,
    },
    BookEdited {
        ticket: Ticket,
        reply: ApiReply<BookPayload>,
    },
    BookDeleted {
        ticket: Ticket,
        id: BookId,
        reply: ApiReply<Ack>,
    },
    BookBorrowed {
        ticket: Ticket,
        reply: ApiReply<BookPayload>,
    },
    BorrowedLoaded {
        ticket: Ticket,
        reply: ApiReply<BorrowedPayload>,
    },
    BookReturned {
        ticket: Ticket,
        id: BookId,
        reply: ApiReply<Ack>,
    },
    HistoryLoaded {
        ticket: Ticket,
        reply: ApiReply<HistoryPayload>,
    },
    /// Clear the generic, registration and login buckets
    ErrorsCleared,
    ModalToggled,
    DeleteAlertToggled,
    LoadingToggled,
}

impl Action {
    pub fn ticket(&self) -> Option<&Ticket> {
        match self {
            Action::Requested(ticket)
            | Action::CatalogLoaded { ticket, .. }
            | Action::Registered { ticket, .. }
            | Action::LoggedIn { ticket, .. }
            | Action::UserLoaded { ticket, .. }
            | Action::BookCreated { ticket, .. }
            | Action::BookEdited { ticket, .. }
            | Action::BookDeleted { ticket, .. }
            | Action::BookBorrowed { ticket, .. }
            | Action::BorrowedLoaded { ticket, .. }
            | Action::BookReturned { ticket, .. }
            | Action::HistoryLoaded { ticket, .. } => Some(ticket),
            Action::LoadMoreRequested
            | Action::LoggedOut
            | Action::ErrorsCleared
            | Action::ModalToggled
            | Action::DeleteAlertToggled
            | Action::LoadingToggled => None,
        }
    }
}
