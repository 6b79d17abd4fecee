//! When steps for contribution cache behavioural tests.

use std::sync::Arc;
use std::time::Duration;

use rstest_bdd_macros::when;

use crate::contribution_cache_bdd_state::{ContributionCacheState, login};
use crate::support::unquote;

fn request_index(cache_state: &ContributionCacheState, user: &str, force_refresh: bool) {
    let cache = cache_state.cache();
    let user_login = login(unquote(user));

    match cache_state
        .runtime()
        .block_on(cache.get_or_build(&user_login, force_refresh))
    {
        Ok(index) => cache_state.index.set(index),
        Err(error) => cache_state.error.set(error),
    }
}

#[when("the index for {user} is requested")]
fn index_requested(cache_state: &ContributionCacheState, user: String) {
    request_index(cache_state, &user, false);
}

#[when("the index for {user} is requested with a forced refresh")]
fn index_refreshed(cache_state: &ContributionCacheState, user: String) {
    request_index(cache_state, &user, true);
}

#[when("{user} merged {title} into {repository}")]
fn merged_later(
    cache_state: &ContributionCacheState,
    user: String,
    title: String,
    repository: String,
) {
    cache_state.add_contribution(unquote(&user), unquote(&title), unquote(&repository));
}

#[when("the upstream starts failing")]
fn upstream_fails_later(cache_state: &ContributionCacheState) {
    cache_state.fail_upstream();
}

#[when("{count:u64} concurrent requests for {user} complete")]
fn concurrent_requests(cache_state: &ContributionCacheState, count: u64, user: String) {
    let cache = cache_state.cache();
    let source = cache_state.source();
    let user_login = login(unquote(&user));

    let outcomes = cache_state.runtime().block_on(async {
        source.hold();
        let waiters: Vec<_> = (0..count)
            .map(|_| {
                let shared = Arc::clone(&cache);
                let requested = user_login.clone();
                tokio::spawn(async move { shared.get_or_build(&requested, false).await })
            })
            .collect();

        while source.calls() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        source.release();

        let mut outcomes = Vec::with_capacity(waiters.len());
        for waiter in waiters {
            let outcome = waiter
                .await
                .unwrap_or_else(|error| panic!("request task panicked: {error}"));
            outcomes.push(outcome.unwrap_or_else(|error| panic!("request failed: {error}")));
        }
        outcomes
    });

    cache_state.concurrent.set(outcomes);
}
