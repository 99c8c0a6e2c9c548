//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;
use tgadmin_store::{
    Settings, SettingsStore, default_config_dir, default_session_path, default_settings_path,
};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set a setting, e.g. `page_size 25` or `session_backend file`.
    Set {
        /// Setting name.
        key: String,
        /// New value. Empty clears `api_url`.
        value: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Set { key, value } => set_value(key, value, cli).await,
        ConfigAction::Reset => reset_config(cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    let settings = store.get().await;
    let resolved = settings.client_config(cli.api_url.as_deref());

    match cli.format {
        OutputFormat::Text => {
            println!("tgadmin Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("API URL:          {}", resolved.api_root());
            println!(
                "  (configured):   {}",
                settings.api_url.as_deref().unwrap_or("-")
            );
            println!("Page size:        {}", settings.page_size);
            println!("Request timeout:  {}s", settings.request_timeout_secs);
            println!("Session backend:  {}", settings.session_backend);
            println!("Log level:        {}", settings.log_level);
            println!("Expiring window:  {} days", settings.expiring_days);
        }
        OutputFormat::Json => {
            let output = json!({
                "settings": settings,
                "resolved_api_root": resolved.api_root(),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = default_settings_path();
    let session_path = default_session_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
            println!("Session file:  {}", session_path.display());
        }
        OutputFormat::Json => {
            let paths = json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
                "session_file": session_path.display().to_string(),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&paths)?);
        }
    }

    Ok(())
}

async fn set_value(key: &str, value: &str, cli: &Cli) -> Result<()> {
    if !Settings::FIELDS.contains(&key) {
        anyhow::bail!("Unknown setting: {key}. Use: {}", Settings::FIELDS.join(", "));
    }

    let store = SettingsStore::load_default().await?;
    store.set_field(key, value).await?;
    store.save().await?;

    info!(key, value, "Setting updated");
    if !cli.quiet {
        println!("{key} set to: {value}");
    }

    Ok(())
}

async fn reset_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    store.reset().await;
    store.save().await?;

    info!(path = %store.path().display(), "Settings reset");
    if !cli.quiet {
        println!("Configuration reset to defaults");
    }

    Ok(())
}
