//! Contributed HTTP service entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use contributed::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use contributed::{
    AppState, ContributedConfig, ContributionCache, ContributionError, OctocrabContributionGateway,
};
use ortho_config::OrthoConfig;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ContributionError> {
    let config = load_config()?;
    init_tracing(&config);
    config.validate()?;

    let token = config.resolve_token()?;
    let api_base = config.api_base_url()?;
    let gateway = OctocrabContributionGateway::for_token(&token, api_base.as_str())?;

    let capacity = config.require_cache_capacity()?;
    let cache = ContributionCache::new(Arc::new(gateway), capacity)
        .with_telemetry(telemetry_sink(&config));
    info!(max_entries = capacity.get(), "cache created");

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|error| ContributionError::Io {
            message: format!("failed to bind {bind_address}: {error}"),
        })?;

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

    contributed::server::serve(listener, AppState::new(Arc::new(cache), shutdown)).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ContributionError::Configuration`] when ortho-config fails to
/// parse arguments or load configuration files.
fn load_config() -> Result<ContributedConfig, ContributionError> {
    ContributedConfig::load().map_err(|error| ContributionError::Configuration {
        message: error.to_string(),
    })
}

// `RUST_LOG` takes precedence over the configured filter.
fn init_tracing(config: &ContributedConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _already_installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn telemetry_sink(config: &ContributedConfig) -> Arc<dyn TelemetrySink> {
    if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    }
}

async fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c; shutdown must come from elsewhere");
        return;
    }
    info!("shutdown requested");
    shutdown.cancel();
}
