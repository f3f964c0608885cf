//! Pagination argument types for CLI commands

use clap::Args;

/// Shared pagination arguments for list commands.
///
/// Flatten this into any command that supports pagination:
/// ```ignore
/// List {
///     #[command(flatten)]
///     pagination: PaginationArgs,
/// }
/// ```
#[derive(Args, Debug, Default, Clone)]
pub struct PaginationArgs {
    /// Maximum results to return (defaults to preferences.page_size)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Page number (0-indexed)
    #[arg(long, short = 'p')]
    pub page: Option<usize>,
}

impl PaginationArgs {
    /// Convert to the API's `(limit, offset)` pair.
    ///
    /// A zero limit is treated as "use the default".
    pub fn to_limit_offset(&self, default_page_size: usize) -> (usize, usize) {
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(default_page_size.max(1));
        let offset = self.page.unwrap_or(0).saturating_mul(limit);
        (limit, offset)
    }
}
