// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! tgadmin CLI - admin console for a Telegram-bot SaaS backend.
//!
//! # Examples
//!
//! ```bash
//! # Sign in with a Telegram user id
//! tgadmin login 123456789
//!
//! # Dashboard (default command)
//! tgadmin
//!
//! # Second page of bots, JSON output
//! tgadmin bots list --page 2 --format json --pretty
//!
//! # Pending payments, then reject one
//! tgadmin payments list --status pending
//! tgadmin payments reject p1 --reason "insufficient proof"
//!
//! # Point at another backend
//! tgadmin --api-url https://admin.example.com dashboard
//!
//! # Watch mode
//! tgadmin watch --interval 30
//! ```

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tgadmin_client::ApiError;
use tgadmin_store::{LogLevel, SettingsStore, StoreError};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{auth, bots, config, dashboard, payments, plans, subscriptions, users, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// tgadmin CLI - Telegram-bot SaaS administration.
#[derive(Parser)]
#[command(name = "tgadmin")]
#[command(about = "Admin console for a Telegram-bot SaaS backend")]
#[command(long_about = r#"
tgadmin talks to the platform's admin REST API.

Resources:
  • Users
  • Bot instances
  • Subscriptions and plans
  • Payments

Examples:
  tgadmin login 123456789          # Sign in as an admin
  tgadmin                          # Dashboard
  tgadmin bots list --page 2       # Second page of bots
  tgadmin payments list -s pending # Filter by status
  tgadmin --format json users list # JSON output
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, shows the dashboard.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Backend base URL (overrides TGADMIN_API_URL and settings).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token.
    Login(auth::LoginArgs),

    /// Forget the stored session token.
    Logout,

    /// Show the signed-in admin.
    Whoami,

    /// Show platform totals, pending payments and expiring subscriptions.
    #[command(visible_alias = "d")]
    Dashboard(dashboard::DashboardArgs),

    /// Manage users.
    #[command(visible_alias = "u")]
    Users(users::UsersArgs),

    /// Manage bot instances.
    #[command(visible_alias = "b")]
    Bots(bots::BotsArgs),

    /// Manage subscriptions.
    #[command(visible_alias = "s")]
    Subscriptions(subscriptions::SubscriptionsArgs),

    /// Review payments.
    #[command(visible_alias = "p")]
    Payments(payments::PaymentsArgs),

    /// Manage subscription plans.
    Plans(plans::PlansArgs),

    /// Refresh the dashboard or a list on an interval.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Not signed in, or the session was rejected.
    Unauthorized = 2,
    /// The record does not exist.
    NotFound = 3,
}

impl ExitCode {
    /// Picks the exit code for a failed command.
    fn for_error(err: &anyhow::Error) -> Self {
        let api = err
            .downcast_ref::<ApiError>()
            .or_else(|| err.downcast_ref::<StoreError>().and_then(StoreError::as_api));
        match api {
            Some(e) if e.is_unauthorized() => Self::Unauthorized,
            Some(e) if e.is_not_found() => Self::NotFound,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("tgadmin=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("tgadmin={level}")))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match SettingsStore::load_default().await {
        Ok(store) => store.get().await.log_level,
        Err(_) => LogLevel::default(),
    };
    setup_logging(cli.verbose, cli.quiet, level);

    let result = match &cli.command {
        Some(Commands::Login(args)) => auth::login(args, &cli).await,
        Some(Commands::Logout) => auth::logout(&cli).await,
        Some(Commands::Whoami) => auth::whoami(&cli).await,
        Some(Commands::Dashboard(args)) => dashboard::run(args, &cli).await,
        Some(Commands::Users(args)) => users::run(args, &cli).await,
        Some(Commands::Bots(args)) => bots::run(args, &cli).await,
        Some(Commands::Subscriptions(args)) => subscriptions::run(args, &cli).await,
        Some(Commands::Payments(args)) => payments::run(args, &cli).await,
        Some(Commands::Plans(args)) => plans::run(args, &cli).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        None => dashboard::run(&dashboard::DashboardArgs::default(), &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}
