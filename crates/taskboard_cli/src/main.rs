//! Taskboard command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open storage.
//! - Drive `TaskListController` from subcommands or the interactive shell.
//! - Paint the resulting presentation model to the terminal.

mod paint;
mod shell;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, warn};
use paint::{paint, paint_notification, paint_quote};
use std::path::PathBuf;
use std::sync::Arc;
use taskboard_core::{
    init_logging, render_html, AppConfig, HttpQuoteProvider, MemoryStorage, PersistentStore,
    QuoteProvider, SqliteStorage, StaticQuoteProvider, TaskId, TaskListController,
};

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Local task list with a quote of the day")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the configured data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Skip the remote quote service.
    #[arg(long, global = true)]
    offline: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show tasks, counters and the quote (default).
    List,
    /// Add a task.
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Flip a task between pending and completed.
    Toggle { id: TaskId },
    /// Delete a task after confirmation.
    Delete {
        id: TaskId,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Switch between light and dark for this invocation only.
    ///
    /// The theme lives in the session scope, which ends with the process.
    /// Use `shell` to keep the choice across commands.
    Theme,
    /// Print only the quote panel.
    Quote,
    /// Print the task list as an HTML fragment.
    Html,
    /// Interactive session.
    Shell,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add { .. } => "add",
            Self::Toggle { .. } => "toggle",
            Self::Delete { .. } => "delete",
            Self::Theme => "theme",
            Self::Quote => "quote",
            Self::Html => "html",
            Self::Shell => "shell",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("creating data directory `{}`", config.data_dir.display())
    })?;
    if let Err(err) = init_logging(&config.log_level, &config.log_dir()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let durable = SqliteStorage::open(config.db_path())
        .with_context(|| format!("opening `{}`", config.db_path().display()))?;
    let store = PersistentStore::new(Box::new(durable), Box::new(MemoryStorage::default()));
    let mut controller = TaskListController::load(store);

    let provider: Arc<dyn QuoteProvider> = if config.offline {
        Arc::new(StaticQuoteProvider::offline())
    } else {
        Arc::new(HttpQuoteProvider::new(
            config.quote_endpoint.clone(),
            config.quote_timeout(),
        ))
    };
    let quote_request = tokio::spawn(controller.request_quote(provider));

    let command = cli.command.unwrap_or(Command::List);
    info!(
        "event=cli_command module=cli status=start command={}",
        command.name()
    );
    match command {
        Command::List | Command::Quote | Command::Html => {
            if let Err(err) = quote_request.await {
                warn!("event=quote_request module=cli status=error error={err}");
            }
            controller.show_task_list();
            let model = controller.render();
            match command {
                Command::Html => print!("{}", render_html(&model)),
                Command::Quote => print!("{}", paint_quote(&model.quote)),
                _ => print!("{}", paint(&model)),
            }
        }
        Command::Add { title, description } => {
            quote_request.abort();
            match controller.add_task(&title, &description) {
                Some(id) => println!("added task {id}"),
                None => anyhow::bail!("task title cannot be empty"),
            }
        }
        Command::Toggle { id } => {
            quote_request.abort();
            if !controller.toggle_task(id) {
                anyhow::bail!("no task with id {id}");
            }
            print!("{}", paint(&controller.render()));
        }
        Command::Delete { id, yes } => {
            quote_request.abort();
            let deleted = if yes {
                controller.delete_task(id, &mut |_: &str| true)
            } else {
                controller.delete_task(id, &mut shell::confirm_on_terminal)
            };
            if !deleted && controller.task(id).is_none() {
                anyhow::bail!("no task with id {id}");
            }
        }
        Command::Theme => {
            quote_request.abort();
            let theme = controller.toggle_theme();
            println!(
                "theme: {} {} (this invocation only; use `taskboard shell` to keep it)",
                theme.as_str(),
                theme.toggle_icon()
            );
        }
        Command::Shell => {
            shell::run(&mut controller).context("reading from terminal")?;
        }
    }

    for notification in controller.take_notifications() {
        println!("{}", paint_notification(&notification));
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if cli.offline {
        config.offline = true;
    }
    if config.data_dir.is_relative() {
        config.data_dir = std::env::current_dir()
            .context("resolving current directory")?
            .join(&config.data_dir);
    }
    Ok(config)
}
