//! Dataset commands

use std::path::Path;

use colored::Colorize;
use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::handlers::{spinner, wait_for_poll};
use crate::cli::{CommandContext, OutputFormat};
use crate::client::DatasetApi;
use crate::client::models::{AnalysisStatus, DatasetAnalysis, DatasetUpload};
use crate::error::{ApiError, Result};
use crate::models::FieldDisplay;
use crate::output::Formattable;
use crate::output::formatters::{color_status, format_bytes, format_timestamp_local};
use crate::output::json::format_json;
use crate::poll::{PolledStatus, watch_dataset_analysis};
use crate::retry::retry_once;

/// Reject a missing upload before any request is made
fn check_dataset_file(file: &Path) -> Result<()> {
    if file.is_file() {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("dataset file not found: {}", file.display())).into())
    }
}

/// Run the dataset upload command
pub async fn upload(
    opts: &GlobalOptions,
    project_id: &str,
    file: &Path,
    dataset_type: &str,
    visualization_prompt: Option<String>,
    wait: bool,
) -> Result<()> {
    check_dataset_file(file)?;

    let ctx = CommandContext::new(opts)?;
    let upload = DatasetUpload::from_path(file, dataset_type, visualization_prompt)?;
    let size = upload.content.len() as u64;
    debug!(
        "Uploading {} ({}) to project {}",
        upload.file_name,
        format_bytes(size),
        project_id
    );

    let pb = spinner(ctx.format, &format!("Uploading {}...", upload.file_name));
    let response = ctx.client.upload_dataset(project_id, upload).await;
    pb.finish_and_clear();
    let response = response?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&response)?),
        _ => {
            println!(
                "{} Uploaded {} to project {} ({})",
                "✓".green(),
                format_bytes(size),
                project_id.bold(),
                response.status
            );
            if let Some(ref message) = response.message {
                println!("{}", message);
            }
        }
    }

    if wait {
        if let Some(analysis) = watch_analysis(&ctx, project_id).await? {
            print_analysis(&analysis, ctx.format)?;
        }
    } else if ctx.format != OutputFormat::Json {
        println!(
            "\nAnalysis runs in the background. Check it with: {}",
            format!("forgeml dataset analysis {} --watch", project_id).cyan()
        );
    }

    ctx.log_cache_stats();
    Ok(())
}

/// Run the dataset analysis command
pub async fn analysis(opts: &GlobalOptions, project_id: &str, watch: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let current = retry_once("get_dataset_analysis", || {
        ctx.client.get_dataset_analysis(project_id)
    })
    .await?;

    let shown = if watch && !current.is_terminal() {
        watch_analysis(&ctx, project_id).await?.unwrap_or(current)
    } else {
        current
    };
    print_analysis(&shown, ctx.format)?;

    ctx.log_cache_stats();
    Ok(())
}

async fn watch_analysis(ctx: &CommandContext, project_id: &str) -> Result<Option<DatasetAnalysis>> {
    let pb = spinner(ctx.format, "Analyzing dataset...");
    let progress = pb.clone();

    let Some(handle) = watch_dataset_analysis(
        &ctx.polls,
        ctx.client.clone(),
        project_id,
        ctx.notifier.clone(),
        move |analysis: &DatasetAnalysis| {
            progress.set_message(format!("Dataset analysis: {}", analysis.status.as_str()));
        },
    ) else {
        pb.finish_and_clear();
        return Ok(None);
    };

    let result = wait_for_poll(handle).await;
    pb.finish_and_clear();
    result
}

/// Key facts of an analysis as field/value rows
fn analysis_fields(analysis: &DatasetAnalysis) -> Vec<FieldDisplay> {
    let mut rows = vec![
        FieldDisplay::new("Project", analysis.project_id.as_str()),
        FieldDisplay::new("Status", analysis.status.as_str()),
    ];
    if let Some(ref kind) = analysis.dataset_type {
        rows.push(FieldDisplay::new("Type", kind.as_str()));
    }
    if let Some(rows_count) = analysis.num_rows {
        rows.push(FieldDisplay::new("Rows", rows_count.to_string()));
    }
    if !analysis.columns.is_empty() {
        rows.push(FieldDisplay::new("Columns", analysis.columns.join(", ")));
    }
    if let Some(ref updated) = analysis.updated_at {
        rows.push(FieldDisplay::new("Updated", format_timestamp_local(updated)));
    }
    rows
}

fn print_analysis(analysis: &DatasetAnalysis, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", format_json(analysis)?),
        OutputFormat::Table => analysis_fields(analysis).print(format)?,
        OutputFormat::Pretty => {
            println!(
                "Dataset analysis for {} | Status: {}",
                analysis.project_id.bold(),
                color_status(analysis.status.as_str())
            );
            for row in analysis_fields(analysis).iter().skip(2) {
                println!("  {:<8} {}", format!("{}:", row.field), row.value);
            }

            if let Some(ref summary) = analysis.summary {
                println!("\n{}", summary);
            }
            if !analysis.recommendations.is_empty() {
                println!("\n{}", "Recommendations:".bold());
                for rec in &analysis.recommendations {
                    println!("  - {}", rec);
                }
            }
            if !analysis.visualizations.is_empty() {
                println!("\n{}", "Visualizations:".bold());
                for url in &analysis.visualizations {
                    println!("  {}", url.cyan());
                }
            }

            match analysis.status {
                AnalysisStatus::Failed => {
                    if let Some(ref message) = analysis.message {
                        println!("\n{}", message.red());
                    }
                }
                AnalysisStatus::Completed => println!(
                    "\nNext: {}",
                    format!("forgeml train start {}", analysis.project_id).cyan()
                ),
                _ => {}
            }
        }
    }
    Ok(())
}
