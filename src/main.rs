mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::Context;

#[derive(Parser)]
#[command(name = "calsync")]
#[command(about = "Pull Google calendars and events incrementally, and push local changes")]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a refresh token for an account
    Auth {
        account: String,

        #[arg(long)]
        refresh_token: String,
    },
    /// List the account's calendars (deleted and current)
    Calendars { account: String },
    /// List one calendar's events
    Events {
        account: String,
        calendar: String,

        /// Only events changed since this instant (RFC 3339)
        #[arg(long)]
        since: Option<DateTime<Utc>>,
    },
    /// Sync every calendar of an account, resuming from stored checkpoints
    Sync {
        account: String,

        /// Ignore checkpoints and fetch everything
        #[arg(long)]
        full: bool,
    },
    /// Push a local change to Google
    Push {
        #[command(subcommand)]
        action: PushAction,
    },
}

#[derive(Subcommand)]
enum PushAction {
    /// Create the event described by a JSON file; prints the new id
    Create {
        account: String,
        calendar: String,
        event_file: PathBuf,
    },
    /// Replace an existing event with the one in a JSON file
    Update {
        account: String,
        calendar: String,
        event_file: PathBuf,
    },
    Delete {
        account: String,
        calendar: String,
        event_uid: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = Context::load()?;

    match cli.command {
        Commands::Auth {
            account,
            refresh_token,
        } => commands::auth::run(&ctx, &account, &refresh_token),
        Commands::Calendars { account } => commands::calendars::run(&ctx, &account).await,
        Commands::Events {
            account,
            calendar,
            since,
        } => commands::events::run(&ctx, &account, &calendar, since).await,
        Commands::Sync { account, full } => commands::sync::run(&ctx, &account, full).await,
        Commands::Push { action } => match action {
            PushAction::Create {
                account,
                calendar,
                event_file,
            } => commands::push::create(&ctx, &account, &calendar, &event_file).await,
            PushAction::Update {
                account,
                calendar,
                event_file,
            } => commands::push::update(&ctx, &account, &calendar, &event_file).await,
            PushAction::Delete {
                account,
                calendar,
                event_uid,
            } => commands::push::delete(&ctx, &account, &calendar, &event_uid).await,
        },
    }
}

/// Logs go to stderr; stdout carries JSON only.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
