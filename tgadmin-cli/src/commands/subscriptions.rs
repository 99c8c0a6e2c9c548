//! Subscription commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use tgadmin_core::{Resource, SubscriptionPatch, SubscriptionStatus};

use super::list::{ListArgs, print_record, print_records, run_action, show_list};
use crate::Cli;
use crate::context::AppContext;

/// Arguments for the subscriptions command.
#[derive(Args)]
pub struct SubscriptionsArgs {
    #[command(subcommand)]
    pub action: SubscriptionsAction,
}

/// Subscriptions subcommands.
#[derive(Subcommand)]
pub enum SubscriptionsAction {
    /// List subscriptions.
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show one subscription.
    Get {
        /// Subscription id.
        id: String,
    },

    /// Update status or auto-renew.
    Update {
        /// Subscription id.
        id: String,

        /// New status (active, expired, cancelled, suspended).
        #[arg(long)]
        status: Option<String>,

        /// Turn auto-renew on or off.
        #[arg(long)]
        auto_renew: Option<bool>,
    },

    /// Extend a subscription.
    Extend {
        /// Subscription id.
        id: String,

        /// Days to add.
        #[arg(long, default_value = "30")]
        days: u32,
    },

    /// Subscriptions expiring soon.
    Expiring {
        /// Look-ahead window in days (defaults to the setting).
        #[arg(long)]
        days: Option<u32>,
    },

    /// Subscriptions already expired.
    Expired,
}

/// Runs the subscriptions command.
pub async fn run(args: &SubscriptionsArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::authenticated(cli).await?;
    let subscriptions = ctx.client.subscriptions();

    match &args.action {
        SubscriptionsAction::List(list) => {
            show_list(&ctx, cli, list.query(Resource::Subscriptions, &ctx)).await
        }
        SubscriptionsAction::Get { id } => {
            print_record(cli, Resource::Subscriptions, &subscriptions.get(id).await?)
        }
        SubscriptionsAction::Update {
            id,
            status,
            auto_renew,
        } => {
            if let Some(raw) = status {
                if SubscriptionStatus::parse(raw) == SubscriptionStatus::Unknown {
                    anyhow::bail!("Unknown subscription status: {raw}");
                }
            }
            let patch = SubscriptionPatch {
                status: status.clone(),
                auto_renew: *auto_renew,
            };
            if patch == SubscriptionPatch::default() {
                anyhow::bail!("Nothing to update");
            }
            run_action(
                &ctx,
                cli,
                Resource::Subscriptions,
                "Subscription updated",
                "Failed to update subscription",
                || subscriptions.update(id, &patch),
            )
            .await
        }
        SubscriptionsAction::Extend { id, days } => {
            if *days == 0 {
                anyhow::bail!("--days must be at least 1");
            }
            run_action(
                &ctx,
                cli,
                Resource::Subscriptions,
                &format!("Subscription extended by {days} days"),
                "Failed to extend subscription",
                || subscriptions.extend(id, *days),
            )
            .await
        }
        SubscriptionsAction::Expiring { days } => {
            let days = days.unwrap_or(ctx.settings.expiring_days).max(1);
            let rows = subscriptions.expiring(days).await?;
            print_records(cli, Resource::Subscriptions, &rows)
        }
        SubscriptionsAction::Expired => {
            let rows = subscriptions.expired().await?;
            print_records(cli, Resource::Subscriptions, &rows)
        }
    }
}
