//! Bookmarks console host
//!
//! Plays the launcher's part from the command line: toasts go to the
//! terminal, navigation is logged, links open in the system handler.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use bookmarks_lib::commands::{
    HostContext, ListPresenter, ListScreen, Navigator, Notifier, Route, SubmitOutcome, SystemOpener,
    Toast, ToastStyle,
};
use bookmarks_lib::config::{resolve_data_dir, Config};
use bookmarks_lib::domain::{DomainError, DomainResult, Item};
use bookmarks_lib::repository::{init_db, ItemRepository, ItemStore};

#[derive(Parser)]
#[command(name = "bookmarks", version, about = "Manage launcher bookmarks")]
struct Cli {
    /// Data directory (defaults to $BOOKMARKS_PATH, then the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List bookmarks in display order
    List,
    /// Add a bookmark
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        /// Icon name; the configured default when omitted
        #[arg(long)]
        icon: Option<String>,
    },
    /// Edit a bookmark; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a bookmark
    Delete { id: String },
    /// Open a bookmark's url
    Open { id: String },
    /// Print the log file location
    Logs,
}

struct ConsoleHost;

impl Notifier for ConsoleHost {
    fn show_toast(&self, toast: Toast) {
        match (toast.style, toast.message) {
            (ToastStyle::Success, _) => println!("✓ {}", toast.title),
            (ToastStyle::Failure, Some(message)) => eprintln!("✗ {}: {}", toast.title, message),
            (ToastStyle::Failure, None) => eprintln!("✗ {}", toast.title),
        }
    }
}

impl Navigator for ConsoleHost {
    fn push(&self, route: Route) {
        log::debug!("navigate: push {:?}", route);
    }

    fn pop(&self) {
        log::debug!("navigate: pop");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            let _ = rolling_logger::error(&format!("Command failed: {}", e));
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Errors already shown as a failure toast come back as `ExitCode::FAILURE`;
/// everything else is returned as `Err`.
async fn run(cli: Cli) -> DomainResult<ExitCode> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let config = Config::load_from(&Config::path_in(&data_dir))?;

    if let Err(e) = rolling_logger::init_logger(config.log_dir(&data_dir), "Bookmarks") {
        eprintln!("Logging disabled: {}", e);
    }
    let _ = rolling_logger::info(&format!("Using data directory {}", data_dir.display()));

    if let Command::Logs = cli.command {
        match rolling_logger::log_file_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("Logging is not initialized"),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let kv = init_db(&Config::db_path(&data_dir)).await?;
    let store = ItemStore::with_key(Arc::new(kv), config.storage_key.clone());
    let console = Arc::new(ConsoleHost);
    let host = HostContext::new(console.clone(), console, Arc::new(SystemOpener));
    let presenter = ListPresenter::new(ItemRepository::new(store), host, config.default_icon.clone());

    if presenter.revalidate().await.is_err() {
        return Ok(ExitCode::FAILURE);
    }

    let succeeded = match cli.command {
        Command::List => {
            print_screen(&presenter.snapshot().screen());
            true
        }
        Command::Add { title, url, icon } => {
            let editor = presenter.on_add();
            let mut values = editor.initial_values();
            values.title = title;
            values.url = url;
            if let Some(icon) = icon {
                values.icon = icon;
            }
            submitted(editor.submit(values).await)
        }
        Command::Edit { id, title, url, icon } => {
            let item = find(&presenter, &id)?;
            let editor = presenter.on_edit(&item);
            let mut values = editor.initial_values();
            if let Some(title) = title {
                values.title = title;
            }
            if let Some(url) = url {
                values.url = url;
            }
            if let Some(icon) = icon {
                values.icon = icon;
            }
            submitted(editor.submit(values).await)
        }
        Command::Delete { id } => presenter.on_delete(&id).await.is_ok(),
        Command::Open { id } => {
            let item = find(&presenter, &id)?;
            presenter.on_open(&item).is_ok()
        }
        Command::Logs => true,
    };

    if !succeeded {
        let _ = rolling_logger::warn("Command finished with a reported failure");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn find(presenter: &ListPresenter, id: &str) -> DomainResult<Item> {
    presenter
        .snapshot()
        .items
        .get(id)
        .cloned()
        .ok_or_else(|| DomainError::NotFound(format!("bookmark {}", id)))
}

fn submitted(outcome: SubmitOutcome) -> bool {
    match outcome {
        SubmitOutcome::Saved(item) => {
            println!("{}", item.id);
            true
        }
        SubmitOutcome::Invalid(_) | SubmitOutcome::Failed(_) | SubmitOutcome::Ignored => false,
    }
}

fn print_screen(screen: &ListScreen) {
    match screen {
        ListScreen::Loading => println!("Loading..."),
        ListScreen::Empty(view) => {
            println!("{}", view.title);
            println!("{}: bookmarks add --title <TITLE> --url <URL>", view.description);
        }
        ListScreen::Items(items) => {
            for item in items {
                println!("{}  {:<24}  {}  [{}]", item.id, item.title, item.url, item.icon);
            }
        }
    }
}
