//! Generic list command handler
//!
//! Provides a reusable pattern for list commands that follow the standard flow:
//! 1. Create command context
//! 2. Resolve pagination against the configured page size
//! 3. Fetch the page
//! 4. Convert to display type
//! 5. Print output

use std::future::Future;
use std::sync::Arc;

use log::debug;
use serde::Serialize;
use tabled::Tabled;

use crate::cache::CachedForgeClient;
use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, PaginationArgs};
use crate::client::ForgeClient;
use crate::error::Result;
use crate::output::Formattable;

/// Run a standard list command with the common fetch → display → print pattern.
///
/// # Type Parameters
///
/// * `T` - The API model type returned by the fetcher (e.g., `ProjectListItem`)
/// * `D` - The display type that implements `From<T>`, `Tabled`, and `Serialize`
///
/// # Example
///
/// ```ignore
/// run_list_command::<ProjectListItem, ProjectDisplay, _, _>(
///     opts,
///     pagination,
///     "projects",
///     |client, limit, offset| async move { client.list_projects(limit, offset).await },
/// ).await
/// ```
pub async fn run_list_command<T, D, Fut, F>(
    opts: &GlobalOptions,
    pagination: &PaginationArgs,
    resource_name: &str,
    fetcher: F,
) -> Result<()>
where
    D: From<T> + Tabled + Serialize,
    Fut: Future<Output = Result<Vec<T>>>,
    F: FnOnce(Arc<CachedForgeClient<ForgeClient>>, usize, usize) -> Fut,
{
    let ctx = CommandContext::new(opts)?;
    let (limit, offset) = pagination.to_limit_offset(ctx.config.preferences.page_size);

    debug!("Fetching {} (limit {}, offset {})", resource_name, limit, offset);
    let items = fetcher(ctx.client.clone(), limit, offset).await?;
    debug!("Fetched {} {}", items.len(), resource_name);

    let display_items: Vec<D> = items.into_iter().map(D::from).collect();
    display_items.print(ctx.format)?;

    ctx.log_cache_stats();
    Ok(())
}
