//! Error types exposed by the contribution lookup layers.

use thiserror::Error;

/// Errors surfaced while querying GitHub or serving a contribution index.
///
/// The type is `Clone` so that a single build outcome can be handed to every
/// caller waiting on the same user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContributionError {
    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The requested user login was empty.
    #[error("user login must not be empty")]
    InvalidUserLogin,

    /// The cache capacity was not a positive number.
    #[error("cache capacity must be at least 1, got {capacity}")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },

    /// A URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub refused the request because the rate limit was exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimited {
        /// Error message from GitHub.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body or GraphQL error text describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// GitHub has no user with the requested login.
    #[error("GitHub user {login} was not found")]
    UserNotFound {
        /// The login that could not be resolved.
        login: String,
    },

    /// A page claimed more results but did not carry a cursor.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the inconsistency.
        message: String,
    },

    /// The shared build task ended without publishing an outcome.
    #[error("contribution build for {login} ended without a result")]
    BuildAborted {
        /// The login whose build was lost.
        login: String,
    },

    /// The caller stopped waiting for a contribution build.
    #[error("lookup for {login} was cancelled")]
    Cancelled {
        /// The login the caller was waiting on.
        login: String,
    },

    /// The contribution service answered a lookup with an error status.
    #[error("unable to load contributions for {login} (status {status})")]
    LookupFailed {
        /// The login that was looked up.
        login: String,
        /// HTTP status returned by the service.
        status: u16,
    },

    /// The contribution service could not be reached or sent an unreadable
    /// response.
    #[error("contribution service request failed: {message}")]
    ServiceRequest {
        /// Transport or decoding error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl ContributionError {
    /// Returns true when the failure originated from the upstream query
    /// source rather than from local configuration or cancellation.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. }
                | Self::RateLimited { .. }
                | Self::Api { .. }
                | Self::Network { .. }
                | Self::UserNotFound { .. }
                | Self::InvalidPagination { .. }
                | Self::BuildAborted { .. }
        )
    }
}
