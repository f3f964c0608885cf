//! Training commands

use std::path::Path;

use colored::Colorize;
use futures::future;
use indicatif::ProgressBar;
use log::{debug, info};

use crate::cli::args::GlobalOptions;
use crate::cli::handlers::{save_download, spinner, wait_for_poll};
use crate::cli::{CommandContext, OutputFormat};
use crate::client::models::{
    LogEntry, SummaryStatus, TrainingConfigOptions, TrainingLogs, TrainingRequest,
    TrainingResponse, TrainingSummary,
};
use crate::client::{DatasetApi, TrainingApi};
use crate::error::{ApiError, Error, Result};
use crate::models::{LogDisplay, MetricDisplay, OptionDisplay, TrainingDisplay};
use crate::output::Formattable;
use crate::output::formatters::{
    color_status, format_bytes, format_duration_secs, format_progress, format_timestamp_local,
};
use crate::output::json::format_json;
use crate::poll::{LogCursor, PollHandle, PolledStatus, watch_training, watch_training_logs};
use crate::retry::retry_once;

/// Arguments of `train start`
#[derive(Debug, Clone, Default)]
pub struct StartArgs {
    pub project_id: String,
    pub model_type: Option<String>,
    pub gpu_type: Option<String>,
    pub epochs: Option<u32>,
    pub batch_size: Option<u32>,
    pub learning_rate: Option<f64>,
    pub wait: bool,
    pub follow: bool,
}

impl StartArgs {
    fn to_request(&self) -> TrainingRequest {
        let mut request = TrainingRequest::new(self.project_id.as_str());
        request.model_type = self.model_type.clone();
        request.gpu_type = self.gpu_type.clone();
        request.epochs = self.epochs;
        request.batch_size = self.batch_size;
        request.learning_rate = self.learning_rate;
        request
    }
}

/// Run the train options command
pub async fn options(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let options = retry_once("get_training_config_options", || {
        ctx.client.get_training_config_options()
    })
    .await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&options)?),
        _ => option_rows(&options).print(ctx.format)?,
    }

    ctx.log_cache_stats();
    Ok(())
}

fn option_rows(options: &TrainingConfigOptions) -> Vec<OptionDisplay> {
    let mut rows = vec![
        OptionDisplay::new("model types", &options.model_types),
        OptionDisplay::new("gpu types", &options.gpu_types),
        OptionDisplay::new("dataset types", &options.dataset_types),
    ];
    if let Some(epochs) = options.default_epochs {
        rows.push(OptionDisplay::new("default epochs", &[epochs.to_string()]));
    }
    if let Some(batch_size) = options.default_batch_size {
        rows.push(OptionDisplay::new(
            "default batch size",
            &[batch_size.to_string()],
        ));
    }
    if let Some(lr) = options.default_learning_rate {
        rows.push(OptionDisplay::new("default learning rate", &[lr.to_string()]));
    }
    rows
}

/// Refuse to train a project that has no dataset yet
pub async fn ensure_dataset_ready<C: DatasetApi + ?Sized>(
    client: &C,
    project_id: &str,
) -> Result<()> {
    match client.get_dataset_analysis(project_id).await {
        Ok(analysis) => {
            debug!(
                "Dataset for {} is {}",
                project_id,
                analysis.status.as_str()
            );
            Ok(())
        }
        Err(Error::Api(ApiError::NotFound(_))) => Err(ApiError::Validation(format!(
            "project {} has no dataset. Upload one with `forgeml dataset upload {} <file>`",
            project_id, project_id
        ))
        .into()),
        Err(e) => Err(e),
    }
}

/// Run the train start command
pub async fn start(opts: &GlobalOptions, args: StartArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let request = args.to_request().with_defaults(&ctx.config.training);
    request.validate()?;
    ensure_dataset_ready(ctx.client.as_ref(), &request.project_id).await?;

    debug!("Starting training: {:?}", request);
    let started = ctx.client.start_training(request).await?;
    info!(
        "Started training {} for project {}",
        started.training_id, started.project_id
    );

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&started)?),
        _ => {
            println!(
                "{} Started training {} ({})",
                "✓".green(),
                started.training_id.bold(),
                color_status(started.status.as_str())
            );
            if let Some(ref message) = started.message {
                println!("{}", message);
            }
        }
    }

    if !(args.wait || args.follow) {
        if ctx.format != OutputFormat::Json {
            println!(
                "\nFollow it with: {}",
                format!(
                    "forgeml train logs {} {} --follow",
                    started.project_id, started.training_id
                )
                .cyan()
            );
        }
        ctx.log_cache_stats();
        return Ok(());
    }

    let last_n = ctx.config.preferences.log_lines;
    let done = follow_training(
        &ctx,
        &started.project_id,
        &started.training_id,
        args.follow.then_some(last_n),
        LogCursor::new(),
    )
    .await?;

    if let Some(done) = done {
        print_status(&done, ctx.format)?;
    }

    ctx.log_cache_stats();
    Ok(())
}

/// Run the train status command
pub async fn status(
    opts: &GlobalOptions,
    project_id: &str,
    training_id: &str,
    watch: bool,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let current = retry_once("get_training_status", || {
        ctx.client.get_training_status(project_id, training_id)
    })
    .await?;

    let shown = if watch && !current.is_terminal() {
        follow_training(&ctx, project_id, training_id, None, LogCursor::new())
            .await?
            .unwrap_or(current)
    } else {
        current
    };
    print_status(&shown, ctx.format)?;

    ctx.log_cache_stats();
    Ok(())
}

/// Run the train logs command
pub async fn logs(
    opts: &GlobalOptions,
    project_id: &str,
    training_id: &str,
    last_n: Option<usize>,
    follow: bool,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let last_n = last_n.unwrap_or(ctx.config.preferences.log_lines);

    let logs = retry_once("get_training_logs", || {
        ctx.client.get_training_logs(project_id, training_id, last_n)
    })
    .await?;

    match ctx.format {
        OutputFormat::Json if !follow => println!("{}", format_json(&logs)?),
        OutputFormat::Table if !follow => logs
            .logs
            .iter()
            .map(LogDisplay::from)
            .collect::<Vec<_>>()
            .print(ctx.format)?,
        _ => print_log_lines(&ProgressBar::hidden(), &logs.logs, ctx.format),
    }

    if follow && !logs.is_terminal() {
        let mut cursor = LogCursor::new();
        cursor.advance(&logs);

        let pb = ProgressBar::hidden();
        let format = ctx.format;
        if let Some(handle) = watch_training_logs(
            &ctx.polls,
            ctx.client.clone(),
            project_id,
            training_id,
            last_n,
            ctx.notifier.clone(),
            move |update: &TrainingLogs| print_log_lines(&pb, cursor.advance(update), format),
        ) {
            wait_for_poll(handle).await?;
        }
    } else if follow {
        debug!("Training {} already {}", training_id, logs.status.as_str());
    }

    ctx.log_cache_stats();
    Ok(())
}

/// Run the train summary command
pub async fn summary(opts: &GlobalOptions, project_id: &str, training_id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let summary = retry_once("get_training_summary", || {
        ctx.client.get_training_summary(project_id, training_id)
    })
    .await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&summary)?),
        OutputFormat::Table => summary
            .final_metrics
            .iter()
            .map(MetricDisplay::from)
            .collect::<Vec<_>>()
            .print(ctx.format)?,
        OutputFormat::Pretty => print_summary(&summary),
    }

    ctx.log_cache_stats();
    Ok(())
}

/// Run the train download command
pub async fn download(
    opts: &GlobalOptions,
    project_id: &str,
    training_id: &str,
    output: Option<&Path>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let pb = spinner(ctx.format, "Downloading model weights...");
    let bytes = ctx
        .client
        .download_model_weights(project_id, training_id)
        .await;
    pb.finish_and_clear();

    save_download(
        &bytes?,
        output,
        &format!("{}-model.bin", training_id),
        ctx.format,
    )?;
    Ok(())
}

/// Poll a training run, optionally tailing its log alongside.
///
/// Returns the terminal status, or `None` when interrupted.
async fn follow_training(
    ctx: &CommandContext,
    project_id: &str,
    training_id: &str,
    tail: Option<usize>,
    mut cursor: LogCursor,
) -> Result<Option<TrainingResponse>> {
    let pb = spinner(ctx.format, "Training...");
    let progress = pb.clone();

    let status_handle = watch_training(
        &ctx.polls,
        ctx.client.clone(),
        project_id,
        training_id,
        ctx.notifier.clone(),
        move |update: &TrainingResponse| progress.set_message(progress_message(update)),
    );

    let log_handle = match tail {
        Some(last_n) => {
            let lines = pb.clone();
            let format = ctx.format;
            watch_training_logs(
                &ctx.polls,
                ctx.client.clone(),
                project_id,
                training_id,
                last_n,
                ctx.notifier.clone(),
                move |update: &TrainingLogs| print_log_lines(&lines, cursor.advance(update), format),
            )
        }
        None => None,
    };

    let (status, logs) = future::join(wait_optional(status_handle), wait_optional(log_handle)).await;
    pb.finish_and_clear();

    if let Err(e) = logs {
        log::warn!("Stopped tailing logs for {}: {}", training_id, e);
    }
    status
}

async fn wait_optional<T>(handle: Option<PollHandle<T>>) -> Result<Option<T>> {
    match handle {
        Some(handle) => wait_for_poll(handle).await,
        None => Ok(None),
    }
}

fn progress_message(status: &TrainingResponse) -> String {
    let mut message = format!("Training {}", status.status.as_str());
    if let Some(progress) = status.progress {
        message.push_str(&format!(" {}", format_progress(progress)));
    }
    if let (Some(current), Some(total)) = (status.current_epoch, status.total_epochs) {
        message.push_str(&format!(" epoch {}/{}", current, total));
    }
    message
}

/// Print log lines above the spinner; JSON mode emits one object per line
fn print_log_lines(pb: &ProgressBar, entries: &[LogEntry], format: OutputFormat) {
    if entries.is_empty() {
        return;
    }
    pb.suspend(|| {
        for entry in entries {
            match format {
                OutputFormat::Json => {
                    if let Ok(line) = serde_json::to_string(entry) {
                        println!("{}", line);
                    }
                }
                _ => println!("{}", LogDisplay::from(entry).line()),
            }
        }
    });
}

fn print_status(status: &TrainingResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", format_json(status)?),
        OutputFormat::Table => vec![TrainingDisplay::from(status)].print(format)?,
        OutputFormat::Pretty => {
            println!(
                "Training: {} | Status: {}",
                status.training_id.bold(),
                color_status(status.status.as_str())
            );
            if let Some(progress) = status.progress {
                println!("  Progress: {}", format_progress(progress));
            }
            if let (Some(current), Some(total)) = (status.current_epoch, status.total_epochs) {
                println!("  Epoch:    {}/{}", current, total);
            }
            if let Some(ref started) = status.started_at {
                println!("  Started:  {}", format_timestamp_local(started));
            }
            if let Some(ref completed) = status.completed_at {
                println!("  Finished: {}", format_timestamp_local(completed));
            }
            for (name, value) in &status.metrics {
                println!("  {}: {:.4}", name, value);
            }
            if let Some(ref message) = status.message {
                println!("{}", message);
            }
        }
    }
    Ok(())
}

fn print_summary(summary: &TrainingSummary) {
    println!(
        "Training: {} | Status: {}",
        summary.training_id.bold(),
        color_status(summary.status.as_str())
    );
    if let Some(duration) = summary.duration_seconds {
        println!("  Duration:   {}", format_duration_secs(duration));
    }
    if let Some(size) = summary.model_size_bytes {
        println!("  Model size: {}", format_bytes(size));
    }
    if let Some(ref completed) = summary.completed_at {
        println!("  Finished:   {}", format_timestamp_local(completed));
    }

    if !summary.final_metrics.is_empty() {
        println!("\n{}", "Final metrics:".bold());
        for (name, value) in &summary.final_metrics {
            println!("  {:<16} {:.4}", name, value);
        }
    }

    println!();
    match (summary.ai_summary_status, summary.ai_summary.as_deref()) {
        (SummaryStatus::Completed, Some(text)) => {
            println!("{}", "Analysis:".bold());
            println!("{}", text);
        }
        (SummaryStatus::Pending | SummaryStatus::Generating, _) => println!(
            "{}",
            "The AI summary is still being generated. Check again shortly.".yellow()
        ),
        (SummaryStatus::Failed, _) => println!("{}", "The AI summary could not be generated.".red()),
        _ => println!("No AI summary available."),
    }
}
