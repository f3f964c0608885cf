//! Reusable formatting utilities for CLI output
//!
//! Timestamps, durations, sizes and status values used across commands.

use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};

/// Format an ISO-8601 timestamp as local date/time.
///
/// Unparseable input is returned unchanged; empty input becomes "--".
///
/// # Example output
/// `2026-01-15 14:30`
pub fn format_timestamp_local(timestamp: &str) -> String {
    if timestamp.trim().is_empty() {
        return "--".to_string();
    }

    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Format a duration in seconds to a human-readable string.
///
/// Returns "N/A" for zero, negative or non-finite input.
///
/// # Example output
/// - `2h 15m 30s` (hours, minutes, seconds)
/// - `5m 10s` (minutes, seconds)
/// - `45s` (seconds only)
pub fn format_duration_secs(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 1.0 {
        return "N/A".to_string();
    }

    let secs = seconds.round() as u64;
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Format bytes as human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Fixed-width text progress bar, e.g. `[#####-----]  50%`
pub fn format_progress(percent: f64) -> String {
    const WIDTH: usize = 20;
    let percent = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((percent / 100.0) * WIDTH as f64).round() as usize;

    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        percent
    )
}

/// Color a status value by how it reads to a user
pub fn color_status(status: &str) -> ColoredString {
    match status {
        "ready" | "completed" => status.green(),
        "error" | "failed" => status.red(),
        "cancelled" => status.yellow(),
        "generating" | "running" | "analyzing" => status.cyan(),
        _ => status.normal(),
    }
}
