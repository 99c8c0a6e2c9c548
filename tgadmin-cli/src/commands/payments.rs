//! Payment review commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use tgadmin_core::{PaymentPatch, PaymentStatus, Resource};

use super::list::{ListArgs, print_record, print_records, run_action, show_list};
use crate::Cli;
use crate::context::AppContext;

/// Arguments for the payments command.
#[derive(Args)]
pub struct PaymentsArgs {
    #[command(subcommand)]
    pub action: PaymentsAction,
}

/// Payments subcommands.
#[derive(Subcommand)]
pub enum PaymentsAction {
    /// List payments.
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Status filter: pending, confirmed, rejected or cancelled.
        #[arg(long, short)]
        status: Option<String>,
    },

    /// Show one payment.
    Get {
        /// Payment id.
        id: String,
    },

    /// Payments awaiting review.
    Pending,

    /// Confirm a payment.
    Confirm {
        /// Payment id.
        id: String,
    },

    /// Reject a payment.
    Reject {
        /// Payment id.
        id: String,

        /// Reason shown to the user.
        #[arg(long, short)]
        reason: String,
    },

    /// Update payment details.
    Update {
        /// Payment id.
        id: String,

        #[command(flatten)]
        patch: PaymentPatchArgs,
    },
}

/// Editable payment fields.
#[derive(Args)]
pub struct PaymentPatchArgs {
    /// Receipt URL.
    #[arg(long)]
    pub receipt_url: Option<String>,

    /// Crypto transaction hash.
    #[arg(long)]
    pub transaction_hash: Option<String>,

    /// Bank transfer reference.
    #[arg(long)]
    pub bank_reference: Option<String>,

    /// Internal admin notes.
    #[arg(long)]
    pub admin_notes: Option<String>,
}

impl PaymentPatchArgs {
    fn patch(&self) -> Result<PaymentPatch> {
        let patch = PaymentPatch {
            status: None,
            receipt_url: self.receipt_url.clone(),
            transaction_hash: self.transaction_hash.clone(),
            bank_reference: self.bank_reference.clone(),
            admin_notes: self.admin_notes.clone(),
        };
        if patch == PaymentPatch::default() {
            anyhow::bail!("Nothing to update");
        }
        Ok(patch)
    }
}

/// Checks a status filter against the known payment statuses.
fn parse_status(raw: Option<&str>) -> Result<Option<&str>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) if PaymentStatus::all().contains(&PaymentStatus::parse(raw)) => Ok(Some(raw)),
        Some(raw) => {
            let known: Vec<&str> = PaymentStatus::all().iter().map(PaymentStatus::as_str).collect();
            anyhow::bail!("Unknown payment status: {raw}. Use: {}", known.join(", "))
        }
    }
}

/// Runs the payments command.
pub async fn run(args: &PaymentsArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::authenticated(cli).await?;
    let payments = ctx.client.payments();

    match &args.action {
        PaymentsAction::List { list, status } => {
            let status = parse_status(status.as_deref())?;
            let query = list.query(Resource::Payments, &ctx).status(status);
            show_list(&ctx, cli, query).await
        }
        PaymentsAction::Get { id } => {
            print_record(cli, Resource::Payments, &payments.get(id).await?)
        }
        PaymentsAction::Pending => {
            let rows = payments.pending().await?;
            print_records(cli, Resource::Payments, &rows)
        }
        PaymentsAction::Confirm { id } => {
            run_action(
                &ctx,
                cli,
                Resource::Payments,
                "Payment confirmed successfully",
                "Failed to confirm payment",
                || payments.confirm(id),
            )
            .await
        }
        PaymentsAction::Reject { id, reason } => {
            if reason.trim().is_empty() {
                anyhow::bail!("--reason must not be empty");
            }
            run_action(
                &ctx,
                cli,
                Resource::Payments,
                "Payment rejected",
                "Failed to reject payment",
                || payments.reject(id, reason),
            )
            .await
        }
        PaymentsAction::Update { id, patch } => {
            let patch = patch.patch()?;
            run_action(
                &ctx,
                cli,
                Resource::Payments,
                "Payment updated",
                "Failed to update payment",
                || payments.update(id, &patch),
            )
            .await
        }
    }
}
