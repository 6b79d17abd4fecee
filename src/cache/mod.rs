//! Bounded, invalidation-aware cache of contribution indices.
//!
//! [`ContributionCache`] memoises one [`ContributionIndex`] per user login in
//! a least-recently-used store. A miss pages through the upstream source and
//! aggregates the result; concurrent misses for the same login share that
//! single build, while lookups for other logins proceed independently.
//!
//! Each build runs on its own task and publishes its outcome once through a
//! `watch` channel. Callers that stop waiting never cancel the build, and a
//! failed build is handed to every waiter but never stored.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::github::error::ContributionError;
use crate::github::gateway::ContributionSource;
use crate::github::identity::UserLogin;
use crate::github::pagination::fetch_all;
use crate::index::ContributionIndex;
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

/// Result of a contribution build, shared verbatim with every waiter.
pub type BuildOutcome = Result<Arc<ContributionIndex>, ContributionError>;

type OutcomeReceiver = watch::Receiver<Option<BuildOutcome>>;
type OutcomeSender = watch::Sender<Option<BuildOutcome>>;

struct CacheState {
    entries: LruCache<String, Arc<ContributionIndex>>,
    in_flight: HashMap<String, OutcomeReceiver>,
}

enum Lookup {
    Hit(Arc<ContributionIndex>),
    Pending(OutcomeReceiver),
}

/// LRU cache of contribution indices with single-flight builds.
///
/// All bookkeeping (entries, recency, and in-flight builds) sits behind one
/// async mutex that is never held across an upstream call.
pub struct ContributionCache {
    source: Arc<dyn ContributionSource>,
    state: Arc<Mutex<CacheState>>,
    telemetry: Arc<dyn TelemetrySink>,
    capacity: NonZeroUsize,
}

impl ContributionCache {
    /// Creates an empty cache holding at most `capacity` indices.
    #[must_use]
    pub fn new(source: Arc<dyn ContributionSource>, capacity: NonZeroUsize) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                in_flight: HashMap::new(),
            })),
            telemetry: Arc::new(NoopTelemetrySink),
            capacity,
        }
    }

    /// Routes cache lifecycle events to `telemetry`.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Maximum number of indices kept.
    #[must_use]
    pub const fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Number of indices currently stored.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// Returns true if no index is stored.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }

    /// Returns the stored index for `user` without ever building one.
    ///
    /// A hit marks the entry as most recently used.
    pub async fn lookup(&self, user: &UserLogin) -> Option<Arc<ContributionIndex>> {
        let mut state = self.state.lock().await;
        state.entries.get(user.as_str()).map(Arc::clone)
    }

    /// Removes the stored index for `user`, if any.
    ///
    /// A build already in flight for `user` is left running and stores its
    /// result when it completes.
    pub async fn invalidate(&self, user: &UserLogin) {
        let mut state = self.state.lock().await;
        let removed = remove_entry(&mut state, user);
        drop(state);

        if let Some(event) = removed {
            self.record(event);
        }
    }

    /// Returns the index for `user`, building it on a miss.
    ///
    /// With `force_refresh` the stored entry is invalidated first. Concurrent
    /// calls for the same user share one upstream pagination run and receive
    /// the same index or the same error.
    ///
    /// # Errors
    ///
    /// Returns the upstream failure of the build, or
    /// [`ContributionError::BuildAborted`] when the build task ended without
    /// an outcome.
    pub async fn get_or_build(&self, user: &UserLogin, force_refresh: bool) -> BuildOutcome {
        match self.begin(user, force_refresh).await {
            Lookup::Hit(index) => Ok(index),
            Lookup::Pending(receiver) => self.await_outcome(user, receiver).await,
        }
    }

    /// Same as [`Self::get_or_build`], but stops waiting once `cancel` fires.
    ///
    /// Cancelling only detaches this caller; the shared build keeps running
    /// and still populates the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::Cancelled`] when `cancel` fires first, and
    /// otherwise the same errors as [`Self::get_or_build`].
    pub async fn get_or_build_cancellable(
        &self,
        user: &UserLogin,
        force_refresh: bool,
        cancel: &CancellationToken,
    ) -> BuildOutcome {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!(%user, "caller stopped waiting for contribution build");
                Err(ContributionError::Cancelled {
                    login: user.as_str().to_owned(),
                })
            }
            outcome = self.get_or_build(user, force_refresh) => outcome,
        }
    }

    async fn begin(&self, user: &UserLogin, force_refresh: bool) -> Lookup {
        let mut events = Vec::with_capacity(2);
        let mut state = self.state.lock().await;

        if force_refresh {
            events.extend(remove_entry(&mut state, user));
        }

        let lookup = if let Some(index) = state.entries.get(user.as_str()) {
            debug!(%user, "cache hit");
            events.push(TelemetryEvent::CacheHit {
                user: user.as_str().to_owned(),
            });
            Lookup::Hit(Arc::clone(index))
        } else if let Some(receiver) = state.in_flight.get(user.as_str()) {
            debug!(%user, "joining contribution build already in flight");
            events.push(TelemetryEvent::BuildJoined {
                user: user.as_str().to_owned(),
            });
            Lookup::Pending(receiver.clone())
        } else {
            info!(%user, "cache miss, building contribution index");
            events.push(TelemetryEvent::CacheMiss {
                user: user.as_str().to_owned(),
            });
            let (sender, receiver) = watch::channel(None);
            state
                .in_flight
                .insert(user.as_str().to_owned(), receiver.clone());
            self.spawn_build(user.clone(), sender);
            Lookup::Pending(receiver)
        };
        drop(state);

        for event in events {
            self.record(event);
        }
        lookup
    }

    // The build runs on its own task so a panic surfaces as a join error
    // here, and the in-flight marker is always cleared.
    fn spawn_build(&self, user: UserLogin, sender: OutcomeSender) {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let telemetry = Arc::clone(&self.telemetry);

        tokio::spawn(async move {
            let build_user = user.clone();
            let build_telemetry = Arc::clone(&telemetry);
            let build = tokio::spawn(async move {
                build_index(source.as_ref(), &build_user, build_telemetry.as_ref()).await
            });
            let outcome = build.await.unwrap_or_else(|join_error| {
                warn!(%user, error = %join_error, "contribution build task died");
                Err(ContributionError::BuildAborted {
                    login: user.as_str().to_owned(),
                })
            });

            let mut guard = state.lock().await;
            guard.in_flight.remove(user.as_str());
            let evicted = outcome.as_ref().ok().and_then(|index| {
                guard
                    .entries
                    .push(user.as_str().to_owned(), Arc::clone(index))
                    .map(|(key, _)| key)
                    .filter(|key| key != user.as_str())
            });
            drop(guard);

            if outcome.is_ok() {
                info!(%user, "added to cache for future requests");
            }
            if let Some(evicted) = evicted {
                info!(%evicted, "evicted least recently used entry");
                telemetry.record(TelemetryEvent::CacheEvicted { user: evicted });
            }

            sender.send_replace(Some(outcome));
        });
    }

    async fn await_outcome(&self, user: &UserLogin, mut receiver: OutcomeReceiver) -> BuildOutcome {
        let published = receiver
            .wait_for(Option::is_some)
            .await
            .map(|outcome| (*outcome).clone());

        if let Ok(Some(outcome)) = published {
            return outcome;
        }

        warn!(%user, "contribution build ended without publishing a result");
        self.clear_abandoned(user, &receiver).await;
        Err(ContributionError::BuildAborted {
            login: user.as_str().to_owned(),
        })
    }

    // Drops the in-flight marker when the build's driver task itself was torn
    // down, as happens when the runtime shuts down.
    async fn clear_abandoned(&self, user: &UserLogin, receiver: &OutcomeReceiver) {
        let mut state = self.state.lock().await;
        let is_same_build = state
            .in_flight
            .get(user.as_str())
            .is_some_and(|current| current.same_channel(receiver));
        if is_same_build {
            state.in_flight.remove(user.as_str());
        }
    }

    fn record(&self, event: TelemetryEvent) {
        self.telemetry.record(event);
    }
}

fn remove_entry(state: &mut CacheState, user: &UserLogin) -> Option<TelemetryEvent> {
    state.entries.pop(user.as_str()).map(|_| {
        info!(%user, "invalidated from cache");
        TelemetryEvent::CacheInvalidated {
            user: user.as_str().to_owned(),
        }
    })
}

async fn build_index(
    source: &dyn ContributionSource,
    user: &UserLogin,
    telemetry: &dyn TelemetrySink,
) -> BuildOutcome {
    match fetch_all(source, user).await {
        Ok(records) => {
            let fetched = records.len();
            let index = ContributionIndex::build(user, records);
            debug!(%user, records = fetched, owners = index.owner_count(), "built contribution index");
            telemetry.record(TelemetryEvent::IndexBuilt {
                user: user.as_str().to_owned(),
                records: fetched,
                owners: index.owner_count(),
            });
            Ok(Arc::new(index))
        }
        Err(error) => {
            warn!(%user, %error, "contribution build failed");
            telemetry.record(TelemetryEvent::BuildFailed {
                user: user.as_str().to_owned(),
                message: error.to_string(),
            });
            Err(error)
        }
    }
}
