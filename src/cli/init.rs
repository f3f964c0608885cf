//! Init command implementation

use colored::Colorize;
use dialoguer::{Password, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::client::{ForgeClient, TrainingApi};
use crate::config::Config;
use crate::error::{ApiError, ConfigError, Error, Result};

/// Run the init command
///
/// Stores the API token (and `--api-url`, when given) in the config file.
/// Settings already in the file are kept.
pub async fn run(opts: &GlobalOptions, token: Option<String>) -> Result<()> {
    println!("{}", "Welcome to ForgeML!".bold().green());
    println!("Let's set up your configuration.\n");

    let token = match token {
        Some(token) => token,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter your ForgeML API token")
            .interact()?,
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(ConfigError::MissingApiToken.into());
    }

    let mut config = match Config::load_at(opts.config_ref()) {
        Ok(existing) => existing,
        Err(Error::Config(ConfigError::NotFound)) => Config::default(),
        Err(e) => return Err(e),
    };
    if let Some(url) = opts.api_url_ref() {
        config.api_url = Some(url.trim_end_matches('/').to_string());
    }
    config.api_token = Some(token.clone());

    let client = ForgeClient::new(&config.api_url_or_default(None), Some(token))?;
    println!(
        "{} {}",
        "Verifying token against".cyan(),
        client.base_url().cyan()
    );

    match client.get_training_config_options().await {
        Ok(_) => println!("{}", "✓ Token accepted".green()),
        Err(Error::Api(err @ (ApiError::Unauthorized | ApiError::Forbidden))) => {
            return Err(err.into());
        }
        Err(e) => {
            log::debug!("Token verification failed: {}", e);
            println!(
                "{} Could not verify the token ({}). Saving it anyway.",
                "⚠".yellow(),
                e
            );
        }
    }

    config.save_at(opts.config_ref())?;
    let config_path = Config::resolve_path(opts.config_ref())?;

    println!(
        "\n{} Configuration saved to {}",
        "✓".green(),
        config_path.display().to_string().cyan()
    );

    println!("\n{}", "Next steps:".bold());
    println!(
        "  {} Create a project",
        "forgeml project create <name> --prompt \"...\"".cyan()
    );
    println!("  {} List your projects", "forgeml project list".cyan());
    println!("  {} Check configuration", "forgeml status".cyan());

    Ok(())
}
