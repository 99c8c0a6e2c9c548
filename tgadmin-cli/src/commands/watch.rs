//! Watch command - periodic dashboard or list refresh.

use anyhow::Result;
use clap::Args;
use std::io::{Write, stdout};
use tgadmin_client::ApiError;
use tgadmin_core::Resource;
use tgadmin_store::DEFAULT_RETENTION;
use tokio::time::{Duration, interval};
use tracing::{debug, info};

use super::list::print_view;
use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Resource list to watch instead of the dashboard.
    pub resource: Option<String>,

    /// Refresh interval in seconds.
    #[arg(long, short, default_value = "30")]
    pub interval: u64,

    /// Minimum interval to use.
    #[arg(long, default_value = "5")]
    pub min_interval: u64,

    /// Status filter for a payments list.
    #[arg(long, short)]
    pub status: Option<String>,
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, cli: &Cli) -> Result<()> {
    let refresh_interval = args.interval.max(args.min_interval);

    let resource = match args.resource.as_deref() {
        None => None,
        Some(name) => match Resource::from_name(name) {
            Some(r) if Resource::listable().contains(&r) => Some(r),
            _ => anyhow::bail!("Unknown resource: {name}"),
        },
    };

    let ctx = AppContext::authenticated(cli).await?;
    let view = match resource {
        Some(r) => Some(ctx.default_view(r)?),
        None => None,
    };
    if let (Some(view), Some(status)) = (&view, &args.status) {
        view.set_status(Some(status.clone())).await;
    }
    let dashboard = ctx.dashboard(None);
    let formatter = TextFormatter::new(!cli.no_color);

    info!(interval = refresh_interval, resource = ?resource, "Starting watch mode");

    let mut ticker = interval(Duration::from_secs(refresh_interval));
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                debug!("Watch interrupted");
                return Ok(());
            }
        }

        let evicted = ctx.cache.evict_idle(retention(refresh_interval)).await;
        // Each tick reads fresh data.
        let invalidated = ctx.cache.invalidate_all().await;
        debug!(evicted, invalidated, "Cache swept for refresh");

        if cli.format == OutputFormat::Text {
            print!("\x1b[2J\x1b[H");
            stdout().flush()?;
            println!(
                "tgadmin watch - {} (refresh: {}s)",
                formatter.format_time(chrono::Utc::now()),
                refresh_interval
            );
            println!("{}", "─".repeat(50));
            println!();
        }

        match &view {
            Some(view) => match view.load().await {
                Ok(_) => print_view(view, cli).await?,
                Err(e) if e.is_unauthorized() => return Err(e.into()),
                Err(e) => println!("{}", formatter.format_error(&e.to_string())),
            },
            None => {
                let summary = dashboard.load().await;
                if !ctx.client.session().is_authenticated().await {
                    return Err(ApiError::Unauthorized {
                        detail: Some("session expired, run `tgadmin login`".to_string()),
                    }
                    .into());
                }
                match cli.format {
                    OutputFormat::Text => println!("{}", formatter.format_dashboard(&summary)),
                    OutputFormat::Json => {
                        println!("{}", JsonFormatter::new(cli.pretty).format(&summary)?);
                    }
                }
            }
        }

        if cli.format == OutputFormat::Text {
            println!();
            println!("Press Ctrl+C to exit");
        }
    }
}

/// Idle time after which watched entries are dropped. Never shorter than
/// two refreshes, so entries read on every tick survive.
fn retention(refresh_interval: u64) -> Duration {
    DEFAULT_RETENTION.max(Duration::from_secs(refresh_interval.saturating_mul(2)))
}
