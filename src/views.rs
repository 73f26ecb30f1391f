//! Props each routed view consumes, projected from [`AppState`]
//!
//! Views are pure consumers: everything they need is copied out of the state
//! here, and they talk back only through shell operations.

use serde::Serialize;

use crate::models::{Book, BorrowRecord, ErrorBucket, UserProfile};
use crate::routes::Route;
use crate::state::AppState;

/// Paginated book list shared by the catalog-style views
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogProps {
    pub library: Vec<Book>,
    pub loading: bool,
    pub page: u32,
    pub total_pages: Option<u32>,
    pub scrolling: bool,
    pub has_more: bool,
}

/// Admin book management: the catalog plus modal state and its buckets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManageProps {
    pub catalog: CatalogProps,
    pub render_modal: bool,
    pub render_delete_alert: bool,
    pub book_errors: ErrorBucket,
    pub delete_book_errors: ErrorBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewProps {
    Index,
    Loader,
    Login {
        login_errors: ErrorBucket,
        logged_in: bool,
        is_admin: bool,
        loading: bool,
    },
    Register {
        registered: bool,
        reg_errors: ErrorBucket,
        loading: bool,
    },
    Library(CatalogProps),
    AdminDashboard {
        logged_in: bool,
        is_admin: bool,
        user: Option<UserProfile>,
    },
    ManageBooks(ManageProps),
    ManageUsers(ManageProps),
    UserDashboard {
        user: Option<UserProfile>,
        borrowed_books: Vec<Book>,
        loading: bool,
    },
    Borrow(CatalogProps),
    History {
        history: Vec<BorrowRecord>,
        loading: bool,
    },
    Logout,
}

fn catalog(state: &AppState) -> CatalogProps {
    CatalogProps {
        library: state.library.clone(),
        loading: state.loading,
        page: state.page,
        total_pages: state.total_pages,
        scrolling: state.scrolling,
        has_more: state.has_more_pages(),
    }
}

fn manage(state: &AppState) -> ManageProps {
    ManageProps {
        catalog: catalog(state),
        render_modal: state.render_modal,
        render_delete_alert: state.render_delete_alert,
        book_errors: state.errors.book.clone(),
        delete_book_errors: state.errors.delete.clone(),
    }
}

/// Props for `route`. Guarding is the caller's job.
pub fn props_for(route: Route, state: &AppState) -> ViewProps {
    match route {
        Route::Index => ViewProps::Index,
        Route::Loader => ViewProps::Loader,
        Route::Login => ViewProps::Login {
            login_errors: state.errors.login.clone(),
            logged_in: state.session.logged_in,
            is_admin: state.session.is_admin,
            loading: state.loading,
        },
        Route::Register => ViewProps::Register {
            registered: state.registered,
            reg_errors: state.errors.registration.clone(),
            loading: state.loading,
        },
        Route::Library => ViewProps::Library(catalog(state)),
        Route::Admin => ViewProps::AdminDashboard {
            logged_in: state.session.logged_in,
            is_admin: state.session.is_admin,
            user: state.session.user.clone(),
        },
        Route::ManageBooks => ViewProps::ManageBooks(manage(state)),
        Route::ManageUsers => ViewProps::ManageUsers(manage(state)),
        Route::User => ViewProps::UserDashboard {
            user: state.session.user.clone(),
            borrowed_books: state.borrowed_books.clone(),
            loading: state.loading,
        },
        Route::Borrow => ViewProps::Borrow(catalog(state)),
        Route::History => ViewProps::History {
            history: state.history.clone(),
            loading: state.loading,
        },
        Route::Logout => ViewProps::Logout,
    }
}
