//! Saving downloaded archives and weights

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::formatters::format_bytes;
use crate::output::json::format_json;

/// Write `bytes` to `output` (or `default_name` in the current directory)
/// and report where they went.
pub fn save_download(
    bytes: &[u8],
    output: Option<&Path>,
    default_name: &str,
    format: OutputFormat,
) -> Result<PathBuf> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_name));

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, bytes)?;
    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "path": path.display().to_string(),
                "bytes": bytes.len(),
            });
            println!("{}", format_json(&json)?);
        }
        _ => println!(
            "{} Saved {} to {}",
            "✓".green(),
            format_bytes(bytes.len() as u64),
            path.display().to_string().cyan()
        ),
    }

    Ok(path)
}
