//! Test helpers for constructing `MergedPullRequest` fixtures.
//!
//! # Examples
//!
//! ```
//! use contributed::github::models::test_support::merged_pull_request;
//!
//! let record = merged_pull_request("acme", "core", "Fix bug", "L1");
//! assert_eq!(record.repo_owner_login, "acme");
//! assert_eq!(record.owner_avatar_url, "https://avatars.example/acme");
//! ```

use super::MergedPullRequest;

/// Constructs a record with a predictable avatar URL derived from the owner.
#[must_use]
pub fn merged_pull_request(owner: &str, repo: &str, title: &str, link: &str) -> MergedPullRequest {
    MergedPullRequest {
        title: title.to_owned(),
        link: link.to_owned(),
        repo_owner_login: owner.to_owned(),
        repo_name: repo.to_owned(),
        owner_avatar_url: format!("https://avatars.example/{owner}"),
    }
}

/// Constructs a record with an explicit avatar URL.
#[must_use]
pub fn merged_pull_request_with_avatar(
    owner: &str,
    repo: &str,
    title: &str,
    avatar_url: &str,
) -> MergedPullRequest {
    MergedPullRequest {
        owner_avatar_url: avatar_url.to_owned(),
        ..merged_pull_request(owner, repo, title, &format!("https://github.com/{owner}/{repo}"))
    }
}
