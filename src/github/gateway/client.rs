//! Octocrab client construction for the contribution gateway.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::ContributionError;
use crate::github::identity::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Builds an authenticated Octocrab client for the given API base URL.
///
/// # Errors
///
/// Returns `ContributionError::InvalidUrl` when the base URI cannot be parsed
/// or `ContributionError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, ContributionError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| ContributionError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.value())
        .base_uri(base_uri)
        .map_err(|error| ContributionError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
