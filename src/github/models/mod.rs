//! Data models for merged pull requests returned by the GitHub GraphQL API.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into public domain types.

use serde::Deserialize;

use super::pagination::{ContributionPage, PageCursor, PageInfo};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// One merged pull request as reported by the upstream query source.
///
/// Records are ephemeral: they only live long enough to be folded into a
/// [`crate::index::ContributionIndex`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedPullRequest {
    /// Pull request title.
    pub title: String,
    /// Permalink to the pull request.
    pub link: String,
    /// Login of the account owning the target repository.
    pub repo_owner_login: String,
    /// Name of the target repository.
    pub repo_name: String,
    /// Avatar URL of the repository owner.
    pub owner_avatar_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGraphQlResponse {
    pub(super) data: Option<ApiMergedPullRequestsData>,
    #[serde(default)]
    pub(super) errors: Vec<ApiGraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGraphQlError {
    pub(super) message: String,
    #[serde(rename = "type")]
    pub(super) kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiMergedPullRequestsData {
    pub(super) user: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiUser {
    pub(super) pull_requests: ApiPullRequestConnection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiPullRequestConnection {
    #[serde(default)]
    pub(super) nodes: Vec<Option<ApiPullRequestNode>>,
    pub(super) page_info: ApiPageInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequestNode {
    pub(super) title: String,
    pub(super) permalink: String,
    pub(super) repository: ApiRepository,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) name: String,
    pub(super) owner: ApiRepositoryOwner,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiRepositoryOwner {
    pub(super) login: String,
    pub(super) avatar_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiPageInfo {
    pub(super) end_cursor: Option<String>,
    pub(super) has_next_page: bool,
}

impl From<ApiPullRequestNode> for MergedPullRequest {
    fn from(value: ApiPullRequestNode) -> Self {
        Self {
            title: value.title,
            link: value.permalink,
            repo_owner_login: value.repository.owner.login,
            repo_name: value.repository.name,
            owner_avatar_url: value.repository.owner.avatar_url,
        }
    }
}

impl From<ApiPageInfo> for PageInfo {
    fn from(value: ApiPageInfo) -> Self {
        Self::new(value.end_cursor.map(PageCursor::new), value.has_next_page)
    }
}

impl From<ApiPullRequestConnection> for ContributionPage {
    fn from(value: ApiPullRequestConnection) -> Self {
        Self {
            records: value
                .nodes
                .into_iter()
                .flatten()
                .map(MergedPullRequest::from)
                .collect(),
            page_info: value.page_info.into(),
        }
    }
}
