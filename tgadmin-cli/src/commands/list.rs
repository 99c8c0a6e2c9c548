//! List and mutation plumbing shared by the resource commands.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::future::Future;
use tgadmin_client::{ApiClient, ApiError};
use tgadmin_core::{ListQuery, Record, Resource};
use tgadmin_store::ListView;

use crate::context::AppContext;
use crate::output::{ActionOutput, JsonFormatter, ListOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Pagination and search flags for `list` subcommands.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page number.
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Rows per page (defaults to the page_size setting).
    #[arg(long)]
    pub size: Option<u32>,

    /// Case-insensitive filter over the rows of the loaded page.
    #[arg(long)]
    pub search: Option<String>,
}

impl ListArgs {
    /// Builds the list query for a resource.
    pub fn query(&self, resource: Resource, ctx: &AppContext) -> ListQuery {
        ListQuery::new(resource)
            .page(self.page.max(1))
            .size(self.size.unwrap_or(ctx.settings.page_size).max(1))
            .search(self.search.clone())
    }
}

/// Loads one page through the cache and prints it.
pub async fn show_list(ctx: &AppContext, cli: &Cli, query: ListQuery) -> Result<()> {
    let view = ctx.list_view(query)?;
    view.load().await?;
    print_view(&view, cli).await
}

/// Prints the page a view is showing.
pub async fn print_view(view: &ListView<ApiClient>, cli: &Cli) -> Result<()> {
    let query = view.query().await;
    let rows = view.visible_rows().await;
    let pages = view.page_count().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_table(query.resource, &rows));
            println!();
            println!(
                "{}",
                formatter.format_footer(view.showing_range().await, query.page, pages)
            );
        }
        OutputFormat::Json => {
            let output = ListOutput {
                resource: query.resource,
                page: query.page,
                size: query.size,
                total: view.total().await,
                pages,
                status: query.status,
                search: query.search,
                items: rows,
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}

/// Prints records without pagination.
pub fn print_records(cli: &Cli, resource: Resource, rows: &[Record]) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_table(resource, rows));
        }
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(&rows)?),
    }
    Ok(())
}

/// Prints one record.
pub fn print_record(cli: &Cli, resource: Resource, record: &Record) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_record(resource, record));
        }
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(record)?),
    }
    Ok(())
}

/// Runs a mutation through a list view of `resource`, so every cached entry
/// of the resource is invalidated on success, then prints the notice.
///
/// A failure is returned with `failure` as context.
pub async fn run_action<F, Fut, T>(
    ctx: &AppContext,
    cli: &Cli,
    resource: Resource,
    success: &str,
    failure: &str,
    action: F,
) -> Result<()>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = Result<T, ApiError>> + Send,
    T: Serialize + Send,
{
    let view = ctx.list_view(ListQuery::new(resource))?;
    let value = view
        .mutate(success, failure, action)
        .await
        .map_err(|e| anyhow::Error::new(e).context(failure.to_string()))?;

    let Some(notice) = view.notice().await else {
        return Ok(());
    };
    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", TextFormatter::new(!cli.no_color).format_notice(&notice));
            }
        }
        OutputFormat::Json => {
            let output = ActionOutput::from_notice(&notice, serde_json::to_value(&value).ok());
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}
