//! Library Client - terminal front end for the library shell

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use library_client::{
    api::HttpLibraryApi,
    cli::{self, Command},
    config::{AppConfig, LoggingConfig},
    models::{BookDraft, LoginForm, RegistrationForm},
    session::FileStorage,
    state::{AppState, ErrorContext},
    Shell,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config.logging);

    tracing::info!(
        "Starting Library Client v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api.base_url
    );

    let api = HttpLibraryApi::new(&config.api)?;
    let storage = FileStorage::open(&config.session.storage_path)?;
    let mut shell = Shell::new(Arc::new(api), Arc::new(storage), config.catalog.page_size);

    println!("{}", cli::help());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        execute(&mut shell, command).await?;
        for notification in shell.drain_notifications() {
            println!("{}", notification);
        }
    }

    tracing::info!("Library Client stopped");
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

/// Install the tracing subscriber: stderr in the configured format, plus a
/// daily rolling file when a log directory is set
fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_client={}", config.level).into());

    let (file_layer, guard) = match &config.file {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "library-client.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    guard
}

fn print_library(shell: &Shell) {
    let state = shell.state();
    for book in &state.library {
        println!("{:>6}  {}", book.id, book.title);
    }
    match state.total_pages {
        Some(total) => println!("page {}/{}", state.page, total),
        None => println!("page {}", state.page),
    }
}

/// Only a load that actually ran can have failed; a skipped one must not
/// report an error left behind by an earlier command
fn more_error(ran: bool, state: &AppState) -> Option<ErrorContext> {
    (ran && !state.errors.general.is_empty()).then_some(ErrorContext::General)
}

async fn execute(shell: &mut Shell, command: Command) -> anyhow::Result<()> {
    let failed = match command {
        Command::Books => {
            let loaded = shell.fetch_catalog_page().await;
            print_library(shell);
            (!loaded).then_some(ErrorContext::General)
        }
        Command::More => {
            let ran = shell.load_more().await;
            if ran {
                print_library(shell);
            } else if shell.state().has_more_pages() {
                println!("a catalog request is already running");
            } else {
                println!("no more pages");
            }
            more_error(ran, shell.state())
        }
        Command::Register(args) => {
            shell.clear_errors();
            let form = RegistrationForm::from(args);
            (!shell.register(&form).await).then_some(ErrorContext::Registration)
        }
        Command::Login(args) => {
            let form = LoginForm::from(args);
            (!shell.log_in(&form).await).then_some(ErrorContext::Login)
        }
        Command::Logout => {
            shell.log_out();
            None
        }
        Command::Me => {
            if shell.fetch_user().await {
                println!("{}", serde_json::to_string_pretty(&shell.state().session)?);
                None
            } else {
                Some(ErrorContext::General)
            }
        }
        Command::Add(args) => {
            let draft = BookDraft::from(args);
            shell.toggle_modal();
            let created = shell.create_book(&draft).await;
            if !created {
                shell.toggle_modal();
            }
            (!created).then_some(ErrorContext::Book)
        }
        Command::Edit { id, book } => {
            let draft = BookDraft::from(book);
            shell.toggle_modal();
            let edited = shell.edit_book(id, &draft).await;
            if !edited {
                shell.toggle_modal();
            }
            (!edited).then_some(ErrorContext::Book)
        }
        Command::Delete { id } => {
            shell.toggle_delete_alert();
            let deleted = shell.delete_book(id).await;
            if !deleted {
                shell.toggle_delete_alert();
            }
            (!deleted).then_some(ErrorContext::Delete)
        }
        // Failures surface as warning notifications
        Command::Borrow { id } => {
            shell.borrow_book(id).await;
            None
        }
        Command::Return { id } => {
            shell.return_book(id).await;
            None
        }
        Command::Borrowed => {
            if shell.fetch_borrowed().await {
                for book in &shell.state().borrowed_books {
                    println!("{:>6}  {}", book.id, book.title);
                }
                None
            } else {
                Some(ErrorContext::General)
            }
        }
        Command::History => {
            if shell.fetch_borrow_history().await {
                println!("{}", serde_json::to_string_pretty(&shell.state().history)?);
                None
            } else {
                Some(ErrorContext::General)
            }
        }
        Command::Goto { path } => {
            match shell.visit(&path) {
                Ok(visit) => {
                    println!("{:?}", visit.decision);
                    println!("{}", serde_json::to_string_pretty(&visit.props)?);
                }
                Err(e) => println!("{}", e),
            }
            None
        }
        Command::State => {
            println!("{}", serde_json::to_string_pretty(shell.state())?);
            None
        }
        Command::Quit => None,
    };

    if let Some(context) = failed {
        println!("error: {}", shell.state().errors.get(context));
    }
    Ok(())
}
