//! User commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use tgadmin_core::{Resource, UserPatch};

use super::list::{ListArgs, print_record, run_action, show_list};
use crate::Cli;
use crate::context::AppContext;

/// Arguments for the users command.
#[derive(Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// Users subcommands.
#[derive(Subcommand)]
pub enum UsersAction {
    /// List users.
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show one user.
    Get {
        /// User id.
        id: String,
    },

    /// Update a user. Only the given fields change.
    Update {
        /// User id.
        id: String,

        #[command(flatten)]
        patch: UserPatchArgs,
    },

    /// Delete a user.
    Delete {
        /// User id.
        id: String,
    },
}

/// Editable user fields.
#[derive(Args)]
pub struct UserPatchArgs {
    /// New username.
    #[arg(long)]
    pub username: Option<String>,

    /// New first name.
    #[arg(long)]
    pub first_name: Option<String>,

    /// New last name.
    #[arg(long)]
    pub last_name: Option<String>,

    /// New language code.
    #[arg(long)]
    pub language_code: Option<String>,

    /// Activate or deactivate the account.
    #[arg(long)]
    pub active: Option<bool>,
}

impl UserPatchArgs {
    fn patch(&self) -> Result<UserPatch> {
        let patch = UserPatch {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            language_code: self.language_code.clone(),
            is_active: self.active,
        };
        if patch == UserPatch::default() {
            anyhow::bail!("Nothing to update");
        }
        Ok(patch)
    }
}

/// Runs the users command.
pub async fn run(args: &UsersArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::authenticated(cli).await?;
    let users = ctx.client.users();

    match &args.action {
        UsersAction::List(list) => show_list(&ctx, cli, list.query(Resource::Users, &ctx)).await,
        UsersAction::Get { id } => print_record(cli, Resource::Users, &users.get(id).await?),
        UsersAction::Update { id, patch } => {
            let patch = patch.patch()?;
            run_action(
                &ctx,
                cli,
                Resource::Users,
                "User updated",
                "Failed to update user",
                || users.update(id, &patch),
            )
            .await
        }
        UsersAction::Delete { id } => {
            run_action(
                &ctx,
                cli,
                Resource::Users,
                "User deleted",
                "Failed to delete user",
                || users.delete(id),
            )
            .await
        }
    }
}
