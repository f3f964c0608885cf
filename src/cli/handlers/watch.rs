//! Waiting on polls from the terminal

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::poll::{PollExit, PollHandle};

/// Spinner on stderr; hidden in JSON mode
pub fn spinner(format: OutputFormat, message: &str) -> ProgressBar {
    if format == OutputFormat::Json {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Wait for a poll to end, stopping it on Ctrl-C.
///
/// Returns the terminal status, `None` when the poll was stopped, or the
/// error the poll gave up on.
pub async fn wait_for_poll<T>(handle: PollHandle<T>) -> Result<Option<T>> {
    let key = handle.key().to_string();

    tokio::select! {
        exit = handle.wait() => match exit {
            PollExit::Finished(status) => Ok(Some(status)),
            PollExit::Cancelled => Ok(None),
            PollExit::GaveUp(err) => Err(err.into()),
        },
        // Dropping the pending wait drops the handle, which stops the poll
        _ = tokio::signal::ctrl_c() => {
            log::debug!("Interrupted, stopped polling {}", key);
            eprintln!("Stopped watching {}", key);
            Ok(None)
        }
    }
}
