//! Given steps for contribution cache behavioural tests.

use std::num::NonZeroUsize;
use std::sync::Arc;

use contributed::ContributionCache;
use rstest_bdd_macros::given;

use crate::contribution_cache_bdd_state::ContributionCacheState;
use crate::support::unquote;

#[given("{user} merged {title} into {repository}")]
fn merged_contribution(
    cache_state: &ContributionCacheState,
    user: String,
    title: String,
    repository: String,
) {
    cache_state.add_contribution(unquote(&user), unquote(&title), unquote(&repository));
}

#[given("a contribution cache holding {capacity:u64} users")]
fn contribution_cache(cache_state: &ContributionCacheState, capacity: u64) {
    let size = usize::try_from(capacity)
        .ok()
        .and_then(NonZeroUsize::new)
        .unwrap_or_else(|| panic!("capacity must be a positive usize, got {capacity}"));

    let cache = ContributionCache::new(cache_state.source(), size);
    cache_state.cache.set(Arc::new(cache));
}

#[given("the upstream starts failing")]
fn upstream_fails(cache_state: &ContributionCacheState) {
    cache_state.fail_upstream();
}
