//! The normalised owner → repository → pull request index for one user.
//!
//! [`ContributionIndex::build`] folds the raw merged pull requests of a user
//! into a hierarchy keyed by repository owner and repository name. Records
//! targeting repositories owned by the queried user are dropped, and a title
//! seen twice within one repository keeps the link of the later record.
//!
//! The serialised form is part of the HTTP contract:
//!
//! ```json
//! {
//!   "acme": {
//!     "avatarURL": "https://avatars.example/acme",
//!     "pullRequests": {
//!       "core": { "Fix bug": "https://github.com/acme/core/pull/1" }
//!     }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::ser::{Serialize, Serializer};

use crate::github::identity::UserLogin;
use crate::github::models::MergedPullRequest;

/// A merged pull request as stored in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEntry {
    title: String,
    link: String,
}

impl PullRequestEntry {
    /// Pull request title.
    #[must_use]
    pub const fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Pull request permalink.
    #[must_use]
    pub const fn link(&self) -> &str {
        self.link.as_str()
    }
}

/// Pull requests merged into one repository, keyed by title.
///
/// Serialises as a JSON object mapping each title to its link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryGroup {
    name: String,
    pull_requests: HashMap<String, PullRequestEntry>,
}

impl RepositoryGroup {
    fn new(name: String) -> Self {
        Self {
            name,
            pull_requests: HashMap::new(),
        }
    }

    // Last write wins for a repeated title.
    fn record(&mut self, title: String, link: String) {
        match self.pull_requests.entry(title) {
            Entry::Occupied(mut occupied) => occupied.get_mut().link = link,
            Entry::Vacant(vacant) => {
                let key = vacant.key().clone();
                vacant.insert(PullRequestEntry { title: key, link });
            }
        }
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Looks up the pull request with `title`.
    #[must_use]
    pub fn pull_request(&self, title: &str) -> Option<&PullRequestEntry> {
        self.pull_requests.get(title)
    }

    /// Iterates over the pull requests in arbitrary order.
    pub fn pull_requests(&self) -> impl Iterator<Item = &PullRequestEntry> {
        self.pull_requests.values()
    }

    /// Number of distinct pull request titles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pull_requests.len()
    }

    /// Returns true if the group holds no pull requests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pull_requests.is_empty()
    }
}

impl Serialize for RepositoryGroup {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            self.pull_requests
                .iter()
                .map(|(title, entry)| (title, entry.link.as_str())),
        )
    }
}

/// Everything contributed to repositories of one owner.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OwnerContributions {
    #[serde(rename = "avatarURL")]
    avatar_url: String,
    #[serde(rename = "pullRequests")]
    repositories: HashMap<String, RepositoryGroup>,
}

impl OwnerContributions {
    fn new(avatar_url: String) -> Self {
        Self {
            avatar_url,
            repositories: HashMap::new(),
        }
    }

    /// Avatar URL of the first record seen for this owner.
    #[must_use]
    pub const fn avatar_url(&self) -> &str {
        self.avatar_url.as_str()
    }

    /// Looks up the repository called `name`.
    #[must_use]
    pub fn repository(&self, name: &str) -> Option<&RepositoryGroup> {
        self.repositories.get(name)
    }

    /// Iterates over the repositories in arbitrary order.
    pub fn repositories(&self) -> impl Iterator<Item = &RepositoryGroup> {
        self.repositories.values()
    }

    /// Number of distinct repositories.
    #[must_use]
    pub fn repository_count(&self) -> usize {
        self.repositories.len()
    }
}

/// Contributions of one user grouped by repository owner.
///
/// Built once and never mutated afterwards; the cache hands out shared
/// references to the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ContributionIndex {
    owners: HashMap<String, OwnerContributions>,
}

impl ContributionIndex {
    /// Folds `records` into an index for `user`.
    ///
    /// Records whose repository owner equals `user` are skipped. The avatar
    /// URL of an owner comes from the first record seen for that owner, and a
    /// repeated title within one repository keeps the link of the last
    /// record processed.
    ///
    /// # Example
    ///
    /// ```
    /// use contributed::github::{MergedPullRequest, UserLogin};
    /// use contributed::index::ContributionIndex;
    ///
    /// let user = UserLogin::new("octocat").expect("valid login");
    /// let records = vec![MergedPullRequest {
    ///     title: "Fix bug".to_owned(),
    ///     link: "https://github.com/acme/core/pull/1".to_owned(),
    ///     repo_owner_login: "acme".to_owned(),
    ///     repo_name: "core".to_owned(),
    ///     owner_avatar_url: "https://avatars.example/acme".to_owned(),
    /// }];
    ///
    /// let index = ContributionIndex::build(&user, records);
    /// assert_eq!(index.owner_count(), 1);
    /// ```
    #[must_use]
    pub fn build<Records>(user: &UserLogin, records: Records) -> Self
    where
        Records: IntoIterator<Item = MergedPullRequest>,
    {
        let mut index = Self::default();
        for record in records {
            if record.repo_owner_login == user.as_str() {
                continue;
            }
            index.insert(record);
        }
        index
    }

    fn insert(&mut self, record: MergedPullRequest) {
        let MergedPullRequest {
            title,
            link,
            repo_owner_login,
            repo_name,
            owner_avatar_url,
        } = record;

        let owner = self
            .owners
            .entry(repo_owner_login)
            .or_insert_with(|| OwnerContributions::new(owner_avatar_url));

        owner
            .repositories
            .entry(repo_name)
            .or_insert_with_key(|name| RepositoryGroup::new(name.clone()))
            .record(title, link);
    }

    /// Looks up the contributions to repositories of `login`.
    #[must_use]
    pub fn owner(&self, login: &str) -> Option<&OwnerContributions> {
        self.owners.get(login)
    }

    /// Iterates over `(owner login, contributions)` pairs in arbitrary order.
    pub fn owners(&self) -> impl Iterator<Item = (&str, &OwnerContributions)> {
        self.owners
            .iter()
            .map(|(login, contributions)| (login.as_str(), contributions))
    }

    /// Number of distinct repository owners.
    #[must_use]
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// Total number of distinct pull requests across all owners.
    #[must_use]
    pub fn pull_request_count(&self) -> usize {
        self.owners
            .values()
            .flat_map(OwnerContributions::repositories)
            .map(RepositoryGroup::len)
            .sum()
    }

    /// Returns true if the user has no contributions to other owners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
