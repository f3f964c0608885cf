//! Command execution context
//!
//! Provides a unified context for command execution, eliminating boilerplate
//! for config loading, authentication validation, and client initialization.

use std::sync::Arc;

use crate::cache::CachedForgeClient;
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::notifier::TerminalNotifier;
use crate::client::ForgeClient;
use crate::config::Config;
use crate::error::{ConfigError, Error, Result};
use crate::notify::{LogNotifier, Notifier};
use crate::poll::PollRegistry;

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "FORGEML_API_TOKEN";

/// Context for command execution containing config, client, and runtime options.
///
/// This struct encapsulates all shared state needed by commands, providing:
/// - Loaded and validated configuration
/// - API client with caching (wrapped in Arc so pollers can share it)
/// - Output format preference
/// - The poll registry and notice sink used by `--wait`/`--watch`/`--follow`
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: Config,
    /// API client with caching
    pub client: Arc<CachedForgeClient<ForgeClient>>,
    /// Output format preference
    pub format: OutputFormat,
    /// Active polls for this invocation
    pub polls: PollRegistry,
    /// Sink for terminal-state notices (the log in JSON mode)
    pub notifier: Arc<dyn Notifier>,
}

impl CommandContext {
    /// Create a new command context with full initialization.
    ///
    /// This handles:
    /// - Loading config from path (or default location)
    /// - Applying the `FORGEML_API_TOKEN` override
    /// - Validating authentication (token present)
    /// - Creating the API client with caching wrapper
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or authentication is invalid.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let token_override = std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty());
        let config = load_config(opts.config_ref(), token_override)?;
        config.validate_auth()?;

        let base_url = config.api_url_or_default(opts.api_url_ref());
        log::debug!("Using API at {}", base_url);

        let raw_client = ForgeClient::new(&base_url, config.api_token.clone())?;

        // Wrap with caching layer (disabled if --no-cache)
        let client = Arc::new(CachedForgeClient::new(raw_client, !opts.no_cache));

        // Keep stdout parseable in JSON mode
        let notifier: Arc<dyn Notifier> = match opts.format {
            OutputFormat::Json => Arc::new(LogNotifier),
            _ => Arc::new(TerminalNotifier),
        };

        Ok(Self {
            config,
            client,
            format: opts.format,
            polls: PollRegistry::new(),
            notifier,
        })
    }

    /// Log cache statistics at debug level
    pub fn log_cache_stats(&self) {
        if let Some(stats) = self.client.cache_stats() {
            log::debug!(
                "Cache: {} entries ({} valid), {} hits, {} misses, hit rate {:.0}%",
                stats.total_entries,
                stats.valid_entries,
                stats.hits,
                stats.misses,
                stats.hit_rate * 100.0
            );
        }
    }
}

/// Load the config file, falling back to defaults when only the
/// environment token is available.
fn load_config(path: Option<&str>, token_override: Option<String>) -> Result<Config> {
    let mut config = match Config::load_at(path) {
        Ok(config) => config,
        Err(Error::Config(ConfigError::NotFound)) if token_override.is_some() => {
            Config::default()
        }
        Err(e) => return Err(e),
    };

    if let Some(token) = token_override {
        config.api_token = Some(token);
    }
    Ok(config)
}
