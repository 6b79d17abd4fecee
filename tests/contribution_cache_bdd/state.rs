//! Scenario state and shared utilities for contribution cache BDD tests.

use std::sync::Arc;

use contributed::github::gateway::test_support::ScriptedContributionSource;
use contributed::github::models::MergedPullRequest;
use contributed::github::models::test_support::merged_pull_request;
use contributed::{ContributionCache, ContributionError, ContributionIndex, UserLogin};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

pub(crate) use crate::support::runtime::SharedRuntime;
use crate::support::runtime::ensure_runtime;

#[derive(ScenarioState, Default)]
pub(crate) struct ContributionCacheState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) source: Slot<Arc<ScriptedContributionSource>>,
    pub(crate) contributions: Slot<Vec<(String, MergedPullRequest)>>,
    pub(crate) cache: Slot<Arc<ContributionCache>>,
    pub(crate) index: Slot<Arc<ContributionIndex>>,
    pub(crate) concurrent: Slot<Vec<Arc<ContributionIndex>>>,
    pub(crate) error: Slot<ContributionError>,
}

impl ContributionCacheState {
    /// Returns the scenario runtime, creating it on first use.
    pub(crate) fn runtime(&self) -> SharedRuntime {
        ensure_runtime(&self.runtime)
            .unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}"))
    }

    /// Returns the scripted upstream, creating an empty one on first use.
    pub(crate) fn source(&self) -> Arc<ScriptedContributionSource> {
        if let Some(source) = self.source.get() {
            return source;
        }
        let source = Arc::new(ScriptedContributionSource::new());
        self.source.set(Arc::clone(&source));
        source
    }

    /// Returns the cache configured by an earlier step.
    pub(crate) fn cache(&self) -> Arc<ContributionCache> {
        self.cache
            .get()
            .unwrap_or_else(|| panic!("contribution cache not configured"))
    }

    /// Records that `user` merged `title` into `repository` (`owner/name`)
    /// and republishes the user's single upstream page.
    pub(crate) fn add_contribution(&self, user: &str, title: &str, repository: &str) {
        let (owner, name) = repository
            .split_once('/')
            .unwrap_or_else(|| panic!("repository must be owner/name, got {repository}"));
        let link = format!("https://github.com/{owner}/{name}/pull/{}", title.len());

        let mut contributions = self.contributions.get().unwrap_or_default();
        contributions.push((
            user.to_owned(),
            merged_pull_request(owner, name, title, &link),
        ));
        let page: Vec<MergedPullRequest> = contributions
            .iter()
            .filter(|(author, _)| author == user)
            .map(|(_, record)| record.clone())
            .collect();
        self.contributions.set(contributions);

        let source = self.source();
        self.runtime()
            .block_on(source.set_pages(user, vec![page]));
    }

    /// Makes every subsequent upstream call fail.
    pub(crate) fn fail_upstream(&self) {
        let source = self.source();
        self.runtime().block_on(source.set_failure(Some(ContributionError::Network {
            message: "connection reset by peer".to_owned(),
        })));
    }
}

/// Parses a login captured from a step.
pub(crate) fn login(value: &str) -> UserLogin {
    UserLogin::new(value).unwrap_or_else(|error| panic!("invalid login {value}: {error}"))
}
