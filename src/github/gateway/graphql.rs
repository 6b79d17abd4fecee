//! Octocrab implementation of the contribution source using GitHub GraphQL.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde_json::json;
use tracing::warn;

use crate::github::error::ContributionError;
use crate::github::identity::{PersonalAccessToken, UserLogin};
use crate::github::models::ApiGraphQlResponse;
use crate::github::pagination::{ContributionPage, PageCursor};

use super::ContributionSource;
use super::client::build_octocrab_client;
use super::error_mapping::{map_graphql_errors, map_octocrab_error};

const OPERATION: &str = "merged pull requests";

/// GraphQL query listing merged pull requests authored by a user, 100 per
/// page.
pub const MERGED_PULL_REQUESTS_QUERY: &str = "\
query MergedPullRequests($login: String!, $cursor: String) {
  user(login: $login) {
    pullRequests(first: 100, after: $cursor, states: MERGED) {
      nodes {
        title
        permalink
        repository {
          name
          owner { login avatarUrl }
        }
      }
      pageInfo { endCursor hasNextPage }
    }
  }
}";

/// Octocrab-backed contribution source.
pub struct OctocrabContributionGateway {
    client: Octocrab,
}

impl OctocrabContributionGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ContributionError::InvalidUrl` when the base URI cannot be
    /// parsed or `ContributionError::Api` when Octocrab fails to construct a
    /// client.
    pub fn for_token(
        token: &PersonalAccessToken,
        api_base: &str,
    ) -> Result<Self, ContributionError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl ContributionSource for OctocrabContributionGateway {
    async fn merged_pull_requests(
        &self,
        user: &UserLogin,
        cursor: Option<PageCursor>,
    ) -> Result<ContributionPage, ContributionError> {
        let payload = json!({
            "query": MERGED_PULL_REQUESTS_QUERY,
            "variables": {
                "login": user.as_str(),
                "cursor": cursor.as_ref().map(PageCursor::as_str),
            },
        });

        let response: ApiGraphQlResponse = self
            .client
            .graphql(&payload)
            .await
            .map_err(|error| map_octocrab_error(OPERATION, &error))?;

        response_into_page(user, response)
    }
}

fn response_into_page(
    user: &UserLogin,
    response: ApiGraphQlResponse,
) -> Result<ContributionPage, ContributionError> {
    let ApiGraphQlResponse { data, errors } = response;
    let api_user = data.and_then(|payload| payload.user);

    if !errors.is_empty() {
        let not_found = api_user.is_none()
            && errors
                .iter()
                .any(|error| error.kind.as_deref() == Some("NOT_FOUND"));
        if not_found {
            return Err(user_not_found(user));
        }
        // GitHub nulls the affected nodes, so the page is incomplete.
        warn!(%user, errors = errors.len(), "GraphQL response carried errors");
        return Err(map_graphql_errors(OPERATION, &errors));
    }

    api_user
        .map(|found| found.pull_requests.into())
        .ok_or_else(|| user_not_found(user))
}

fn user_not_found(user: &UserLogin) -> ContributionError {
    ContributionError::UserNotFound {
        login: user.as_str().to_owned(),
    }
}
