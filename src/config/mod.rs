//! Service configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in service defaults
//! 2. **Configuration file** – `.contributed.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `CONTRIBUTED_PORT`, `CONTRIBUTED_TOKEN`, and
//!    friends; the token also falls back to `GH_TOKEN_CONTRIBUTED_TO` and
//!    `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--port`/`-p`, `--token`/`-t`, and so on
//!
//! # Configuration File
//!
//! ```toml
//! address = "0.0.0.0"
//! port = 6000
//! cache_size = 1000
//! api_base = "https://api.github.com"
//! log_filter = "contributed=debug"
//! telemetry = true
//! ```

use std::env;
use std::num::NonZeroUsize;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::github::error::ContributionError;
use crate::github::identity::PersonalAccessToken;

/// Environment variable read when no token is configured.
pub const SERVICE_TOKEN_ENV: &str = "GH_TOKEN_CONTRIBUTED_TO";

/// Generic GitHub token variable consulted last.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

const DEFAULT_ADDRESS: &str = "localhost";
const DEFAULT_PORT: u16 = 6000;
const DEFAULT_CACHE_SIZE: usize = 1000;
const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_LOG_FILTER: &str = "info";

/// Service configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use contributed::ContributedConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = ContributedConfig::load().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// let capacity = config.require_cache_capacity().expect("positive cache size");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "CONTRIBUTED",
    discovery(
        dotfile_name = ".contributed.toml",
        config_file_name = "contributed.toml",
        app_name = "contributed"
    )
)]
pub struct ContributedConfig {
    /// Personal access token for the GitHub GraphQL API.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `CONTRIBUTED_TOKEN`, `GH_TOKEN_CONTRIBUTED_TO`, or
    ///   `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Host name or IP address the HTTP listener binds to.
    #[ortho_config(cli_short = 'a')]
    pub address: String,

    /// TCP port the HTTP listener binds to.
    #[ortho_config(cli_short = 'p')]
    pub port: u16,

    /// Maximum number of users whose index is kept in memory.
    #[ortho_config(cli_short = 'c')]
    pub cache_size: usize,

    /// Base URL of the GitHub API; GraphQL requests go to `<api_base>/graphql`.
    #[ortho_config()]
    pub api_base: String,

    /// Default `tracing` filter directive, used when `RUST_LOG` is unset.
    #[ortho_config()]
    pub log_filter: String,

    /// Writes cache telemetry to stderr as JSON lines.
    ///
    /// Note: `CONTRIBUTED_TELEMETRY` is not read because `ortho_config` does
    /// not load boolean values from the environment.
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for ContributedConfig {
    fn default() -> Self {
        Self {
            token: None,
            address: DEFAULT_ADDRESS.to_owned(),
            port: DEFAULT_PORT,
            cache_size: DEFAULT_CACHE_SIZE,
            api_base: DEFAULT_API_BASE.to_owned(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            telemetry: false,
        }
    }
}

impl ContributedConfig {
    /// Resolves the token from configuration or the fallback environment
    /// variables.
    ///
    /// When no token is configured via `CONTRIBUTED_TOKEN`, the CLI, or a
    /// configuration file, `GH_TOKEN_CONTRIBUTED_TO` is read, then
    /// `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, ContributionError> {
        let value = self
            .token
            .clone()
            .or_else(|| env::var(SERVICE_TOKEN_ENV).ok())
            .or_else(|| env::var(GITHUB_TOKEN_ENV).ok())
            .ok_or(ContributionError::MissingToken)?;
        PersonalAccessToken::new(value)
    }

    /// Returns the cache capacity as a non-zero count.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::InvalidCapacity`] when `cache_size` is 0.
    pub fn require_cache_capacity(&self) -> Result<NonZeroUsize, ContributionError> {
        NonZeroUsize::new(self.cache_size).ok_or(ContributionError::InvalidCapacity {
            capacity: self.cache_size,
        })
    }

    /// Parses the configured API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::InvalidUrl`] when `api_base` is not an
    /// absolute HTTP(S) URL.
    pub fn api_base_url(&self) -> Result<Url, ContributionError> {
        let parsed = Url::parse(&self.api_base)
            .map_err(|error| ContributionError::InvalidUrl(format!("{}: {error}", self.api_base)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(ContributionError::InvalidUrl(format!(
                "{}: unsupported scheme {other}",
                self.api_base
            ))),
        }
    }

    /// Returns the `host:port` pair the listener binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// Validates configuration consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::InvalidCapacity`] or
    /// [`ContributionError::InvalidUrl`] for values the service cannot run
    /// with.
    pub fn validate(&self) -> Result<(), ContributionError> {
        self.require_cache_capacity()?;
        self.api_base_url()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
