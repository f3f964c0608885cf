//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::context::TOKEN_ENV;
use crate::config::Config;
use crate::error::{ConfigError, Error, Result};

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "ForgeML Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    let env_token = std::env::var(TOKEN_ENV)
        .ok()
        .filter(|t| !t.trim().is_empty());

    let config = match Config::load_at(opts.config_ref()) {
        Ok(config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            config
        }
        Err(Error::Config(ConfigError::NotFound)) => {
            println!("{} Configuration not found", "✗".red());
            println!("  Expected at: {}", config_path.display());
            println!("  → Run 'forgeml init' to get started");
            if env_token.is_none() {
                return Ok(());
            }
            Config::default()
        }
        Err(e) => return Err(e),
    };

    println!();

    if env_token.is_some() {
        println!("{} API token set via {}", "✓".green(), TOKEN_ENV);
    } else if let Some(ref token) = config.api_token {
        println!("{} API token configured ({})", "✓".green(), mask_token(token));
    } else {
        println!("{} API token not configured", "✗".red());
        println!("  → Run 'forgeml init' to configure");
    }

    println!("API URL: {}", config.api_url_or_default(opts.api_url_ref()));

    println!("\n{}", "Training defaults".bold());
    println!(
        "  GPU type:   {}",
        config.training.gpu_type.as_deref().unwrap_or("(server default)")
    );
    if config.training.send_model_type {
        println!(
            "  Model type: {}",
            config
                .training
                .model_type
                .as_deref()
                .unwrap_or("(server default)")
        );
    } else {
        println!("  Model type: {}", "not sent".dimmed());
    }

    println!("\n{}", "Preferences".bold());
    println!("  Page size: {}", config.preferences.page_size);
    println!("  Log lines: {}", config.preferences.log_lines);

    Ok(())
}

/// Show only the last four characters of a token
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "****");
        assert_eq!(mask_token("abcdefghijkl1234"), "****1234");
    }
}
