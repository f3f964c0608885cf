//! Rounded tables for `--format table` and list output

use tabled::settings::{Alignment, Style, object::Rows};
use tabled::{Table, Tabled};

/// Printed instead of a table with no rows
pub const EMPTY_TABLE: &str = "No results found.";

/// Render rows as a rounded table with centered headers
pub fn format_table<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return EMPTY_TABLE.to_string();
    }

    Table::new(rows)
        .with(Style::rounded())
        .modify(Rows::first(), Alignment::center())
        .to_string()
}
