//! Dashboard command - platform totals and review queues.

use anyhow::Result;
use clap::Args;
use tgadmin_client::ApiError;
use tracing::info;

use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the dashboard command.
#[derive(Args, Default)]
pub struct DashboardArgs {
    /// Expiring-subscriptions window in days (defaults to the setting).
    #[arg(long)]
    pub days: Option<u32>,
}

/// Runs the dashboard command.
pub async fn run(args: &DashboardArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::authenticated(cli).await?;
    info!("Running dashboard");

    let summary = ctx.dashboard(args.days).load().await;

    // Every panel fails alike when the session was rejected.
    if !ctx.client.session().is_authenticated().await {
        return Err(ApiError::Unauthorized {
            detail: Some("session expired, run `tgadmin login`".to_string()),
        }
        .into());
    }

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_dashboard(&summary));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&summary)?);
        }
    }

    if summary.all_failed() {
        anyhow::bail!("Dashboard unavailable");
    }
    Ok(())
}
