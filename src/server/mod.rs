//! HTTP front end answering contribution lookups.
//!
//! Routes:
//!
//! - `GET /user/{name}` returns the contribution index of `name` as JSON.
//!   Sending the `X-Contributed-Cache-Refresh` header (any value) rebuilds the
//!   index instead of serving the cached copy.
//! - `GET /health` answers `OK` without touching the cache.
//!
//! Failures are reported as `{"message": "unable to fetch data for {name}"}`;
//! the underlying error is only logged.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cache::ContributionCache;
use crate::github::error::ContributionError;
use crate::github::identity::UserLogin;

/// Request header whose presence forces a cache refresh for the lookup.
pub const CACHE_REFRESH_HEADER: &str = "X-Contributed-Cache-Refresh";

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    cache: Arc<ContributionCache>,
    shutdown: CancellationToken,
}

impl AppState {
    /// Bundles the cache with the token that signals server shutdown.
    ///
    /// Requests still waiting on a build when `shutdown` fires are answered
    /// with `503 Service Unavailable`.
    #[must_use]
    pub const fn new(cache: Arc<ContributionCache>, shutdown: CancellationToken) -> Self {
        Self { cache, shutdown }
    }

    /// The cache backing lookups.
    #[must_use]
    pub const fn cache(&self) -> &Arc<ContributionCache> {
        &self.cache
    }

    /// The shutdown token.
    #[must_use]
    pub const fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }
}

/// JSON body returned for failed lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure, never carrying upstream detail.
    pub message: String,
}

impl ErrorBody {
    fn unable_to_fetch(name: &str) -> Self {
        Self {
            message: format!("unable to fetch data for {name}"),
        }
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/user/:name", get(contributions))
        .with_state(state)
}

/// Serves the router on `listener` until the shutdown token fires.
///
/// # Errors
///
/// Returns [`ContributionError::Io`] when the listener fails.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), ContributionError> {
    let shutdown = state.shutdown.clone();
    if let Ok(local_addr) = listener.local_addr() {
        info!(%local_addr, "serving contribution lookups");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|error| ContributionError::Io {
            message: error.to_string(),
        })
}

#[expect(clippy::unused_async, reason = "axum handlers are async functions")]
async fn health() -> &'static str {
    "OK"
}

async fn contributions(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    let force_refresh = headers.contains_key(CACHE_REFRESH_HEADER);

    let outcome = match UserLogin::new(&name) {
        Ok(user) => {
            state
                .cache
                .get_or_build_cancellable(&user, force_refresh, &state.shutdown)
                .await
        }
        Err(error) => Err(error),
    };

    match outcome {
        Ok(index) => Json(index.as_ref()).into_response(),
        Err(failure) => failure_response(&name, &failure),
    }
}

fn failure_response(name: &str, failure: &ContributionError) -> Response {
    let status = match failure {
        ContributionError::InvalidUserLogin => {
            warn!(user = %name, error = %failure, "rejected contribution lookup");
            StatusCode::BAD_REQUEST
        }
        ContributionError::Cancelled { .. } => {
            warn!(user = %name, "contribution lookup interrupted by shutdown");
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => {
            error!(user = %name, error = %failure, "unable to fetch contributions");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(ErrorBody::unable_to_fetch(name))).into_response()
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
