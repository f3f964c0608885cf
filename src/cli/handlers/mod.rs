//! Reusable command handler patterns

pub mod download;
pub mod list;
pub mod watch;

pub use download::save_download;
pub use list::run_list_command;
pub use watch::{spinner, wait_for_poll};
