//! Runs the service router on an ephemeral local port.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{AppState, serve};
use crate::cache::ContributionCache;
use crate::github::error::ContributionError;

/// A served router bound to `127.0.0.1` on a free port.
pub struct RunningServer {
    base_url: String,
    shutdown: CancellationToken,
    handle: JoinHandle<Result<(), ContributionError>>,
}

impl RunningServer {
    /// Binds a listener and serves `cache` on a background task.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::Io`] when no local port can be bound.
    pub async fn start(cache: Arc<ContributionCache>) -> Result<Self, ContributionError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|error| ContributionError::Io {
                message: error.to_string(),
            })?;
        let address = listener
            .local_addr()
            .map_err(|error| ContributionError::Io {
                message: error.to_string(),
            })?;
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(serve(listener, AppState::new(cache, shutdown.clone())));

        Ok(Self {
            base_url: format!("http://{address}"),
            shutdown,
            handle,
        })
    }

    /// Absolute URL of `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fires the shutdown token and waits for the server task to finish.
    ///
    /// # Errors
    ///
    /// Returns the server's own error, or [`ContributionError::Io`] when the
    /// server task panicked.
    pub async fn stop(self) -> Result<(), ContributionError> {
        self.shutdown.cancel();
        self.handle
            .await
            .map_err(|error| ContributionError::Io {
                message: format!("server task failed: {error}"),
            })?
    }
}
