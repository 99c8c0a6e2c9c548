//! Login, logout and whoami commands.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use tgadmin_core::{LoginRequest, Resource};
use tracing::info;

use super::list::print_record;
use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Telegram user id of an admin account.
    pub telegram_user_id: i64,

    /// Telegram username.
    #[arg(long)]
    pub username: Option<String>,

    /// First name.
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name.
    #[arg(long)]
    pub last_name: Option<String>,
}

impl LoginArgs {
    fn request(&self) -> LoginRequest {
        let mut request = LoginRequest::new(self.telegram_user_id);
        if let Some(username) = &self.username {
            request = request.username(username);
        }
        if let Some(name) = &self.first_name {
            request = request.first_name(name);
        }
        if let Some(name) = &self.last_name {
            request = request.last_name(name);
        }
        request
    }
}

/// Runs the login command.
pub async fn login(args: &LoginArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load(cli).await?;
    let token = ctx
        .client
        .auth()
        .login(&args.request())
        .await
        .context("Login failed")?;

    let backend = ctx.client.session().backend();
    info!(backend, "Session stored");

    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                let formatter = TextFormatter::new(!cli.no_color);
                println!("{}", formatter.format_success("Login successful!"));
                println!("Session stored in {backend}");
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "ok": true,
                "token_type": token.token_type,
                "backend": backend,
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}

/// Runs the logout command.
pub async fn logout(cli: &Cli) -> Result<()> {
    let ctx = AppContext::load(cli).await?;
    let was_signed_in = ctx.client.session().is_authenticated().await;
    ctx.client.auth().logout().await?;

    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                if was_signed_in {
                    println!("Logged out");
                } else {
                    println!("No stored session");
                }
            }
        }
        OutputFormat::Json => {
            let output = json!({ "ok": true, "was_signed_in": was_signed_in });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}

/// Runs the whoami command.
pub async fn whoami(cli: &Cli) -> Result<()> {
    let ctx = AppContext::authenticated(cli).await?;
    let admin = ctx.client.auth().me().await?;
    print_record(cli, Resource::Auth, &admin)
}
