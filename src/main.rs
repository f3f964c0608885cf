//! ForgeML CLI - create, train and monitor ML projects on the ForgeML platform

use clap::Parser;
use colored::Colorize;

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod models;
mod notify;
mod output;
mod poll;
mod retry;

use cli::args::GlobalOptions;
use cli::train::StartArgs;
use cli::{Cli, Commands, DatasetCommands, ProjectCommands, TrainCommands};
use error::{Error, Result};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), err);
        // Config errors already say how to fix them
        if !matches!(err, Error::Config(_)) {
            eprintln!("  {}", retry::classify_error(&err).hint().dimmed());
        }
        std::process::exit(1);
    }
}

/// `--debug` forces debug output; otherwise `RUST_LOG` applies, defaulting to warnings
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);
    log::debug!("Global options: {:?}", opts);

    match cli.command {
        Commands::Init { token } => cli::init::run(&opts, token).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("forgeml version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Project(project_cmd) => match project_cmd {
            ProjectCommands::Create { name, prompt, wait } => {
                cli::project::create(&opts, &name, &prompt, wait).await
            }
            ProjectCommands::List { pagination } => cli::project::list(&opts, &pagination).await,
            ProjectCommands::Status { project_id, watch } => {
                cli::project::status(&opts, &project_id, watch).await
            }
            ProjectCommands::Delete { project_id, yes } => {
                cli::project::delete(&opts, &project_id, yes).await
            }
            ProjectCommands::DownloadCode { project_id, output } => {
                cli::project::download_code(&opts, &project_id, output.as_deref()).await
            }
        },
        Commands::Dataset(dataset_cmd) => match dataset_cmd {
            DatasetCommands::Upload {
                project_id,
                file,
                dataset_type,
                visualization_prompt,
                wait,
            } => {
                cli::dataset::upload(
                    &opts,
                    &project_id,
                    &file,
                    &dataset_type,
                    visualization_prompt,
                    wait,
                )
                .await
            }
            DatasetCommands::Analysis { project_id, watch } => {
                cli::dataset::analysis(&opts, &project_id, watch).await
            }
        },
        Commands::Train(train_cmd) => match train_cmd {
            TrainCommands::Options => cli::train::options(&opts).await,
            TrainCommands::Start {
                project_id,
                model_type,
                gpu_type,
                epochs,
                batch_size,
                learning_rate,
                wait,
                follow,
            } => {
                let args = StartArgs {
                    project_id,
                    model_type,
                    gpu_type,
                    epochs,
                    batch_size,
                    learning_rate,
                    wait,
                    follow,
                };
                cli::train::start(&opts, args).await
            }
            TrainCommands::Status {
                project_id,
                training_id,
                watch,
            } => cli::train::status(&opts, &project_id, &training_id, watch).await,
            TrainCommands::Logs {
                project_id,
                training_id,
                last_n,
                follow,
            } => cli::train::logs(&opts, &project_id, &training_id, last_n, follow).await,
            TrainCommands::Summary {
                project_id,
                training_id,
            } => cli::train::summary(&opts, &project_id, &training_id).await,
            TrainCommands::Download {
                project_id,
                training_id,
                output,
            } => {
                cli::train::download(&opts, &project_id, &training_id, output.as_deref()).await
            }
        },
    }
}
