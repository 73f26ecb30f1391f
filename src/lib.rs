//! Library Management System - client shell
//!
//! Client-side state and routing for the library web application:
//! registration and login, paginated catalog browsing, borrowing and
//! returning books, and admin book management. All state lives in
//! [`state::AppState`] and changes only through the pure
//! [`state::reduce`]; [`shell::Shell`] drives the remote API and feeds
//! its replies back in.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod routes;
pub mod session;
pub mod shell;
pub mod state;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use shell::Shell;
pub use state::AppState;
