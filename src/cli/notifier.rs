//! Terminal presentation of poll notices

use colored::Colorize;

use crate::notify::{Notice, Notifier, Severity};

/// Prints notices as colored status lines on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

/// Render a notice as a single status line
pub fn render_notice(notice: &Notice) -> String {
    match notice.severity {
        Severity::Success => format!("{} {}", "✓".green(), notice.message),
        Severity::Info => format!("{} {}", "○".cyan(), notice.message),
        Severity::Warning => format!("{} {}", "⚠".yellow(), notice.message),
        Severity::Error => format!("{} {}", "✗".red(), notice.message.red()),
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        println!("{}", render_notice(&notice));
    }
}
