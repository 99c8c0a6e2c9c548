//! Subscription plan commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use tgadmin_core::{NewPlan, PlanPatch, Resource};

use super::list::{ListArgs, run_action, show_list};
use crate::Cli;
use crate::context::AppContext;

/// Arguments for the plans command.
#[derive(Args)]
pub struct PlansArgs {
    #[command(subcommand)]
    pub action: PlansAction,
}

/// Plans subcommands.
#[derive(Subcommand)]
pub enum PlansAction {
    /// List plans.
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a plan.
    Create {
        /// Plan name.
        #[arg(long)]
        name: String,

        /// Description.
        #[arg(long)]
        description: Option<String>,

        /// Length of the plan in days.
        #[arg(long)]
        duration_days: u32,

        /// Price as a decimal string, e.g. 9.99.
        #[arg(long)]
        price: String,

        /// ISO currency code.
        #[arg(long, default_value = "USD")]
        currency: String,
    },

    /// Update a plan. Only the given fields change.
    Update {
        /// Plan id.
        id: String,

        #[command(flatten)]
        patch: PlanPatchArgs,
    },

    /// Delete a plan.
    Delete {
        /// Plan id.
        id: String,
    },
}

/// Editable plan fields.
#[derive(Args)]
pub struct PlanPatchArgs {
    /// New name.
    #[arg(long)]
    pub name: Option<String>,

    /// New description.
    #[arg(long)]
    pub description: Option<String>,

    /// New length in days.
    #[arg(long)]
    pub duration_days: Option<u32>,

    /// New price.
    #[arg(long)]
    pub price: Option<String>,

    /// New currency.
    #[arg(long)]
    pub currency: Option<String>,

    /// Offer or withdraw the plan.
    #[arg(long)]
    pub active: Option<bool>,
}

impl PlanPatchArgs {
    fn patch(&self) -> Result<PlanPatch> {
        if let Some(price) = &self.price {
            check_price(price)?;
        }
        let patch = PlanPatch {
            name: self.name.clone(),
            description: self.description.clone(),
            duration_days: self.duration_days,
            price: self.price.clone(),
            currency: self.currency.clone(),
            is_active: self.active,
        };
        if patch == PlanPatch::default() {
            anyhow::bail!("Nothing to update");
        }
        Ok(patch)
    }
}

fn check_price(price: &str) -> Result<()> {
    match price.parse::<f64>() {
        Ok(value) if value > 0.0 => Ok(()),
        _ => anyhow::bail!("Price must be a positive number, got {price:?}"),
    }
}

/// Runs the plans command.
pub async fn run(args: &PlansArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::authenticated(cli).await?;
    let plans = ctx.client.plans();

    match &args.action {
        PlansAction::List(list) => show_list(&ctx, cli, list.query(Resource::Plans, &ctx)).await,
        PlansAction::Create {
            name,
            description,
            duration_days,
            price,
            currency,
        } => {
            if *duration_days == 0 {
                anyhow::bail!("--duration-days must be at least 1");
            }
            check_price(price)?;
            let plan = NewPlan {
                name: name.clone(),
                description: description.clone(),
                duration_days: *duration_days,
                price: price.clone(),
                currency: currency.to_uppercase(),
            };
            run_action(
                &ctx,
                cli,
                Resource::Plans,
                "Plan created",
                "Failed to create plan",
                || plans.create(&plan),
            )
            .await
        }
        PlansAction::Update { id, patch } => {
            let patch = patch.patch()?;
            run_action(
                &ctx,
                cli,
                Resource::Plans,
                "Plan updated",
                "Failed to update plan",
                || plans.update(id, &patch),
            )
            .await
        }
        PlansAction::Delete { id } => {
            run_action(
                &ctx,
                cli,
                Resource::Plans,
                "Plan deleted",
                "Failed to delete plan",
                || plans.delete(id),
            )
            .await
        }
    }
}
