//! Then steps for contribution cache behavioural tests.

use std::sync::Arc;

use rstest_bdd_macros::then;

use crate::contribution_cache_bdd_state::{ContributionCacheState, login};
use crate::support::unquote;

#[then("the index lists {title} in {repository}")]
#[expect(
    clippy::expect_used,
    reason = "integration test step; allow-expect-in-tests does not cover integration tests"
)]
fn index_lists(cache_state: &ContributionCacheState, title: String, repository: String) {
    let expected_title = unquote(&title);
    let (owner, name) = unquote(&repository)
        .split_once('/')
        .expect("repository must be owner/name");

    let Some(index) = cache_state.index.get() else {
        let error = cache_state.error.get();
        panic!("contribution index missing; last error: {error:?}");
    };

    let entry = index
        .owner(owner)
        .and_then(|contributions| contributions.repository(name))
        .and_then(|group| group.pull_request(expected_title));
    assert!(
        entry.is_some(),
        "expected {expected_title} in {owner}/{name}, index was {index:?}"
    );
}

#[then("the index has no owner {owner}")]
#[expect(
    clippy::expect_used,
    reason = "integration test step; allow-expect-in-tests does not cover integration tests"
)]
fn index_excludes_owner(cache_state: &ContributionCacheState, owner: String) {
    let index = cache_state.index.get().expect("contribution index missing");

    assert!(index.owner(unquote(&owner)).is_none());
}

#[then("the upstream was called {count:u64} times")]
fn upstream_calls(cache_state: &ContributionCacheState, count: u64) {
    let calls = u64::try_from(cache_state.source().calls())
        .unwrap_or_else(|error| panic!("call count overflow: {error}"));

    assert_eq!(calls, count, "unexpected number of upstream page requests");
}

#[then("{user} is cached")]
fn user_cached(cache_state: &ContributionCacheState, user: String) {
    let cache = cache_state.cache();
    let cached = cache_state
        .runtime()
        .block_on(cache.lookup(&login(unquote(&user))));

    assert!(cached.is_some(), "{user} should be cached");
}

#[then("{user} is not cached")]
fn user_not_cached(cache_state: &ContributionCacheState, user: String) {
    let cache = cache_state.cache();
    let cached = cache_state
        .runtime()
        .block_on(cache.lookup(&login(unquote(&user))));

    assert!(cached.is_none(), "{user} should not be cached");
}

#[then("every concurrent request received the same index")]
#[expect(
    clippy::expect_used,
    reason = "integration test step; allow-expect-in-tests does not cover integration tests"
)]
fn concurrent_share_index(cache_state: &ContributionCacheState) {
    let outcomes = cache_state
        .concurrent
        .get()
        .expect("concurrent requests not run");
    let first = outcomes.first().expect("at least one request");

    assert!(
        outcomes.iter().all(|index| Arc::ptr_eq(index, first)),
        "coalesced requests must share one index"
    );
}

#[then("the request failed with an upstream error")]
fn request_failed(cache_state: &ContributionCacheState) {
    let Some(error) = cache_state.error.get() else {
        panic!("expected the request to fail");
    };

    assert!(error.is_upstream(), "expected an upstream error, got {error:?}");
}
