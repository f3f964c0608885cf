//! Project commands

use std::path::Path;

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::handlers::{run_list_command, save_download, spinner, wait_for_poll};
use crate::cli::{CommandContext, OutputFormat, PaginationArgs};
use crate::client::ProjectApi;
use crate::client::models::{ProjectListItem, ProjectResponse, ProjectStatus};
use crate::error::Result;
use crate::models::{ProjectDisplay, ProjectStatusDisplay};
use crate::output::Formattable;
use crate::output::formatters::color_status;
use crate::output::json::format_json;
use crate::poll::{PolledStatus, watch_project};
use crate::retry::retry_once;

/// Run the project create command
pub async fn create(opts: &GlobalOptions, name: &str, prompt: &str, wait: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    debug!("Creating project '{}'", name);
    let project = ctx.client.create_project(name, prompt).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&project)?),
        _ => {
            println!(
                "{} Created project {} ({})",
                "✓".green(),
                project.id.bold(),
                color_status(project.status.as_str())
            );
        }
    }

    if wait && !project.is_terminal() {
        let done = watch_generation(&ctx, &project.id).await?;
        if let Some(done) = done {
            print_status(&done, ctx.format)?;
        }
    } else if ctx.format != OutputFormat::Json {
        println!(
            "\nCheck progress with: {}",
            format!("forgeml project status {} --watch", project.id).cyan()
        );
    }

    ctx.log_cache_stats();
    Ok(())
}

/// Run the project list command
pub async fn list(opts: &GlobalOptions, pagination: &PaginationArgs) -> Result<()> {
    run_list_command::<ProjectListItem, ProjectDisplay, _, _>(
        opts,
        pagination,
        "projects",
        |client, limit, offset| async move { client.list_projects(limit, offset).await },
    )
    .await
}

/// Run the project status command
pub async fn status(opts: &GlobalOptions, project_id: &str, watch: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let project = retry_once("get_project_status", || {
        ctx.client.get_project_status(project_id)
    })
    .await?;

    if watch && !project.is_terminal() {
        match watch_generation(&ctx, project_id).await? {
            Some(done) => print_status(&done, ctx.format)?,
            None => print_status(&project, ctx.format)?,
        }
    } else {
        print_status(&project, ctx.format)?;
    }

    ctx.log_cache_stats();
    Ok(())
}

/// Run the project delete command
pub async fn delete(opts: &GlobalOptions, project_id: &str, yes: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Delete project {}? This also removes its datasets and trainings",
                project_id
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let result = ctx.client.delete_project(project_id).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&result)?),
        _ => println!("{} Deleted project {}", "✓".green(), project_id.bold()),
    }

    ctx.log_cache_stats();
    Ok(())
}

/// Run the project download-code command
pub async fn download_code(
    opts: &GlobalOptions,
    project_id: &str,
    output: Option<&Path>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let pb = spinner(ctx.format, "Downloading project code...");
    let bytes = ctx.client.download_project_code(project_id).await;
    pb.finish_and_clear();

    save_download(
        &bytes?,
        output,
        &format!("{}-code.zip", project_id),
        ctx.format,
    )?;
    Ok(())
}

/// Poll project generation with a spinner until it finishes or is interrupted
async fn watch_generation(
    ctx: &CommandContext,
    project_id: &str,
) -> Result<Option<ProjectResponse>> {
    let pb = spinner(ctx.format, "Generating project...");
    let progress = pb.clone();

    let Some(handle) = watch_project(
        &ctx.polls,
        ctx.client.clone(),
        project_id,
        ctx.notifier.clone(),
        move |project: &ProjectResponse| {
            progress.set_message(format!("Project status: {}", project.status.as_str()));
        },
    ) else {
        pb.finish_and_clear();
        return Ok(None);
    };

    let result = wait_for_poll(handle).await;
    pb.finish_and_clear();
    result
}

fn print_status(project: &ProjectResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", format_json(project)?),
        OutputFormat::Table => vec![ProjectStatusDisplay::from(project)].print(format)?,
        OutputFormat::Pretty => {
            println!(
                "Project: {} | Status: {}",
                project.id.bold(),
                color_status(project.status.as_str())
            );
            if let Some(ref message) = project.message {
                println!("{}", message);
            }
            match project.status {
                ProjectStatus::Ready => println!(
                    "\nNext: {}",
                    format!("forgeml dataset upload {} <file>", project.id).cyan()
                ),
                ProjectStatus::Created | ProjectStatus::Generating => println!(
                    "\nWatch with: {}",
                    format!("forgeml project status {} --watch", project.id).cyan()
                ),
                _ => {}
            }
        }
    }
    Ok(())
}
