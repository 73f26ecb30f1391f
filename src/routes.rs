//! Route table and the guard deciding whether a view may render

use serde::Serialize;

use crate::state::Session;

/// Authorization a route requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Index,
    Loader,
    Login,
    Register,
    Library,
    Admin,
    ManageBooks,
    ManageUsers,
    User,
    Borrow,
    History,
    Logout,
}

impl Route {
    pub const ALL: [Route; 12] = [
        Route::Index,
        Route::Loader,
        Route::Login,
        Route::Register,
        Route::Library,
        Route::Admin,
        Route::ManageBooks,
        Route::ManageUsers,
        Route::User,
        Route::Borrow,
        Route::History,
        Route::Logout,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Index => "/",
            Route::Loader => "/loader",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Library => "/library",
            Route::Admin => "/admin",
            Route::ManageBooks => "/managebooks",
            Route::ManageUsers => "/manageusers",
            Route::User => "/user",
            Route::Borrow => "/borrow",
            Route::History => "/history",
            Route::Logout => "/logout",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Index | Route::Loader | Route::Login | Route::Register | Route::Library => {
                Access::Public
            }
            Route::Admin | Route::ManageBooks | Route::ManageUsers => Access::Admin,
            Route::User | Route::Borrow | Route::History | Route::Logout => Access::Authenticated,
        }
    }

    /// Resolve a path. `/` matches exactly; other routes also match their
    /// sub-paths (`/library/2`), and a trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        if path == "/" {
            return Some(Route::Index);
        }
        let trimmed = path.trim_end_matches('/');
        Route::ALL
            .into_iter()
            .filter(|route| *route != Route::Index)
            .find(|route| {
                trimmed == route.path()
                    || trimmed
                        .strip_prefix(route.path())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Outcome of guarding a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    Render(Route),
    Redirect(Route),
}

impl Decision {
    pub fn route(&self) -> Route {
        match self {
            Decision::Render(route) | Decision::Redirect(route) => *route,
        }
    }
}

/// Pure predicate over (logged_in, is_admin, required access)
pub fn is_allowed(logged_in: bool, is_admin: bool, access: Access) -> bool {
    match access {
        Access::Public => true,
        Access::Authenticated => logged_in,
        Access::Admin => logged_in && is_admin,
    }
}

pub fn guard(route: Route, session: &Session) -> Decision {
    if is_allowed(session.logged_in, session.is_admin, route.access()) {
        Decision::Render(route)
    } else {
        tracing::debug!(%route, access = ?route.access(), "Redirecting to login");
        Decision::Redirect(Route::Login)
    }
}
