//! Line commands understood by the terminal client

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::error::{AppError, AppResult};
use crate::models::{BookDraft, BookId, LoginForm, RegistrationForm};

/// One line of input at the client prompt
#[derive(Debug, Parser)]
#[command(
    name = "library-client",
    no_binary_name = true,
    about = "Library client commands",
    after_help = "Quote titles containing spaces: add \"The Left Hand of Darkness\" --author \"Ursula K. Le Guin\""
)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Fetch the current catalog page
    Books,
    /// Load the next catalog page
    More,
    /// Create an account
    Register(RegisterArgs),
    /// Start a session
    Login(LoginArgs),
    /// End the session
    Logout,
    /// Fetch the session user
    Me,
    /// Create a book (admin)
    Add(BookArgs),
    /// Update a book (admin)
    Edit {
        id: BookId,
        #[command(flatten)]
        book: BookArgs,
    },
    /// Delete a book (admin)
    Delete { id: BookId },
    /// Borrow a book
    Borrow { id: BookId },
    /// List books not returned yet
    Borrowed,
    /// Return a borrowed book
    Return { id: BookId },
    /// Borrowing history
    History,
    /// Open a route, e.g. /library
    Goto { path: String },
    /// Dump the client state
    State,
    /// Exit
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct RegisterArgs {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<RegisterArgs> for RegistrationForm {
    fn from(args: RegisterArgs) -> Self {
        Self {
            username: args.username,
            email: args.email,
            password: args.password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct LoginArgs {
    pub username: String,
    pub password: String,
}

impl From<LoginArgs> for LoginForm {
    fn from(args: LoginArgs) -> Self {
        Self {
            username: args.username,
            password: args.password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct BookArgs {
    pub title: String,
    #[arg(long)]
    pub author: Option<String>,
}

impl From<BookArgs> for BookDraft {
    fn from(args: BookArgs) -> Self {
        let draft = BookDraft::new(args.title);
        match args.author {
            Some(author) => draft.with_field("author", author),
            None => draft,
        }
    }
}

impl Command {
    /// Parse one input line; `Ok(None)` for a blank line.
    ///
    /// Words follow POSIX shell quoting. Usage errors and `help` come back as
    /// [`AppError::Usage`], whose text is what clap would print.
    pub fn parse(line: &str) -> AppResult<Option<Command>> {
        let words = shlex::split(line)
            .ok_or_else(|| AppError::InvalidCommand("unterminated quote or escape".to_string()))?;
        if words.is_empty() {
            return Ok(None);
        }
        let line = Line::try_parse_from(words)?;
        Ok(Some(line.command))
    }
}

/// Full help text for the prompt
pub fn help() -> String {
    Line::command().render_help().to_string()
}
