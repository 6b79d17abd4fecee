//! Gateways for paging merged pull requests out of GitHub.
//!
//! The [`ContributionSource`] trait is the narrow seam between the
//! pagination driver and the transport. The Octocrab implementation issues
//! GraphQL queries; tests substitute mocks or scripted sources.

mod client;
mod error_mapping;
mod graphql;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use graphql::{MERGED_PULL_REQUESTS_QUERY, OctocrabContributionGateway};

use async_trait::async_trait;

use crate::github::error::ContributionError;
use crate::github::identity::UserLogin;
use crate::github::pagination::{ContributionPage, PageCursor};

/// Upstream source of merged pull request pages for a user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContributionSource: Send + Sync {
    /// Fetch one page of merged pull requests authored by `user`, starting
    /// after `cursor` (or from the beginning when `cursor` is `None`).
    async fn merged_pull_requests(
        &self,
        user: &UserLogin,
        cursor: Option<PageCursor>,
    ) -> Result<ContributionPage, ContributionError>;
}
