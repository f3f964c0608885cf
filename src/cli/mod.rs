//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod context;
pub mod dataset;
pub mod handlers;
pub mod init;
pub mod notifier;
pub mod project;
pub mod status;
pub mod train;

pub use args::{OutputFormat, PaginationArgs};
pub use context::CommandContext;

/// ForgeML CLI - create, train and monitor ML projects from the terminal
#[derive(Parser, Debug)]
#[command(name = "forgeml")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "FORGEML_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "FORGEML_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true, env = "FORGEML_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "FORGEML_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass cache, fetch fresh data from API
    #[arg(long, global = true, env = "FORGEML_NO_CACHE", hide_env = true)]
    pub no_cache: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize ForgeML configuration
    Init {
        /// API token (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,
    },

    /// Show authentication and configuration status
    Status,

    /// Display version information
    Version,

    /// Create and manage projects
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Upload datasets and inspect their analysis
    #[command(subcommand)]
    Dataset(DatasetCommands),

    /// Start and monitor training runs
    #[command(subcommand)]
    Train(TrainCommands),
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project from a natural-language description
    Create {
        /// Project name
        name: String,

        /// What the model should do
        #[arg(long)]
        prompt: String,

        /// Wait until project generation finishes
        #[arg(long)]
        wait: bool,
    },

    /// List projects
    List {
        #[command(flatten)]
        pagination: PaginationArgs,
    },

    /// Show a project's generation status
    Status {
        /// Project ID
        project_id: String,

        /// Keep polling until generation finishes
        #[arg(long)]
        watch: bool,
    },

    /// Delete a project
    Delete {
        /// Project ID
        project_id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Download the generated project code archive
    DownloadCode {
        /// Project ID
        project_id: String,

        /// Output file (defaults to <project-id>-code.zip)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Dataset subcommands
#[derive(Subcommand, Debug)]
pub enum DatasetCommands {
    /// Upload a dataset file to a project
    Upload {
        /// Project ID
        project_id: String,

        /// Dataset file
        file: PathBuf,

        /// Dataset type (text, image, tabular, ...)
        #[arg(long = "type", short = 't', default_value = "text")]
        dataset_type: String,

        /// Instruction for the generated visualizations
        #[arg(long)]
        visualization_prompt: Option<String>,

        /// Wait until the dataset analysis finishes
        #[arg(long)]
        wait: bool,
    },

    /// Show the analysis of a project's dataset
    Analysis {
        /// Project ID
        project_id: String,

        /// Keep polling until the analysis finishes
        #[arg(long)]
        watch: bool,
    },
}

/// Training subcommands
#[derive(Subcommand, Debug)]
pub enum TrainCommands {
    /// List available model types, GPU types and defaults
    Options,

    /// Start a training run
    Start {
        /// Project ID
        project_id: String,

        /// Model architecture
        #[arg(long)]
        model_type: Option<String>,

        /// GPU class to train on
        #[arg(long)]
        gpu_type: Option<String>,

        #[arg(long)]
        epochs: Option<u32>,

        #[arg(long)]
        batch_size: Option<u32>,

        #[arg(long)]
        learning_rate: Option<f64>,

        /// Wait until training finishes
        #[arg(long)]
        wait: bool,

        /// Stream training logs while waiting
        #[arg(long)]
        follow: bool,
    },

    /// Show the live state of a training run
    Status {
        /// Project ID
        project_id: String,

        /// Training ID
        training_id: String,

        /// Keep polling until the run ends
        #[arg(long)]
        watch: bool,
    },

    /// Show the log of a training run
    Logs {
        /// Project ID
        project_id: String,

        /// Training ID
        training_id: String,

        /// Number of trailing lines (defaults to preferences.log_lines)
        #[arg(long, short = 'n')]
        last_n: Option<usize>,

        /// Keep streaming new lines until the run ends
        #[arg(long, short = 'f')]
        follow: bool,
    },

    /// Show the post-training summary
    Summary {
        /// Project ID
        project_id: String,

        /// Training ID
        training_id: String,
    },

    /// Download trained model weights
    Download {
        /// Project ID
        project_id: String,

        /// Training ID
        training_id: String,

        /// Output file (defaults to <training-id>-model.bin)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}
