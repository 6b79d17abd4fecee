//! Error mapping helpers for the Octocrab contribution gateway.

use http::StatusCode;

use crate::github::error::ContributionError;
use crate::github::models::ApiGraphQlError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the GitHub error represents a rate limit error based on the
/// HTTP status and message / documentation URL content.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> ContributionError {
    if let octocrab::Error::GitHub { source, .. } = error {
        let status = source.status_code;
        let message = &source.message;
        return if is_rate_limit_error(source) {
            ContributionError::RateLimited {
                message: format!("{operation} failed: {message}"),
            }
        } else if is_auth_failure(status) {
            ContributionError::Authentication {
                message: format!("{operation} failed: GitHub returned {status} {message}"),
            }
        } else {
            ContributionError::Api {
                message: format!("{operation} failed with status {status}: {message}"),
            }
        };
    }

    if is_network_error(error) {
        return ContributionError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    ContributionError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

/// Folds GraphQL `errors` entries into a single API error.
///
/// GitHub reports query-level failures with a 200 status, so these never
/// surface as Octocrab errors.
pub(super) fn map_graphql_errors(operation: &str, errors: &[ApiGraphQlError]) -> ContributionError {
    let joined = errors
        .iter()
        .map(|error| match error.kind.as_deref() {
            Some(kind) => format!("{kind}: {message}", message = error.message),
            None => error.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ");

    if errors
        .iter()
        .any(|error| error.kind.as_deref() == Some("RATE_LIMITED"))
    {
        return ContributionError::RateLimited {
            message: format!("{operation} failed: {joined}"),
        };
    }

    ContributionError::Api {
        message: format!("{operation} failed: {joined}"),
    }
}
