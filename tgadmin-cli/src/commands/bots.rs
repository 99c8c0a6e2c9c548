//! Bot instance commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use tgadmin_core::Resource;

use super::list::{ListArgs, print_record, run_action, show_list};
use crate::Cli;
use crate::context::AppContext;

/// Arguments for the bots command.
#[derive(Args)]
pub struct BotsArgs {
    #[command(subcommand)]
    pub action: BotsAction,
}

/// Bots subcommands.
#[derive(Subcommand)]
pub enum BotsAction {
    /// List bot instances.
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show one bot instance.
    Get {
        /// Bot id.
        id: String,
    },

    /// Start a bot container.
    Start {
        /// Bot id.
        id: String,
    },

    /// Stop a bot container.
    Stop {
        /// Bot id.
        id: String,
    },

    /// Restart a bot container.
    Restart {
        /// Bot id.
        id: String,
    },
}

/// Runs the bots command.
pub async fn run(args: &BotsArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::authenticated(cli).await?;
    let bots = ctx.client.bots();

    match &args.action {
        BotsAction::List(list) => show_list(&ctx, cli, list.query(Resource::Bots, &ctx)).await,
        BotsAction::Get { id } => print_record(cli, Resource::Bots, &bots.get(id).await?),
        BotsAction::Start { id } => {
            run_action(
                &ctx,
                cli,
                Resource::Bots,
                "Bot started successfully",
                "Failed to start bot",
                || bots.start(id),
            )
            .await
        }
        BotsAction::Stop { id } => {
            run_action(
                &ctx,
                cli,
                Resource::Bots,
                "Bot stopped successfully",
                "Failed to stop bot",
                || bots.stop(id),
            )
            .await
        }
        BotsAction::Restart { id } => {
            run_action(
                &ctx,
                cli,
                Resource::Bots,
                "Bot restarted successfully",
                "Failed to restart bot",
                || bots.restart(id),
            )
            .await
        }
    }
}
