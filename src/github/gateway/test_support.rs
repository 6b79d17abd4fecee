//! Scripted contribution source for integration tests.
//!
//! [`ScriptedContributionSource`] serves pre-recorded pages per user, counts
//! upstream calls, can be switched into a failing mode, and can hold every
//! request at a gate so tests can pile up concurrent callers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};

use super::ContributionSource;
use crate::github::error::ContributionError;
use crate::github::identity::UserLogin;
use crate::github::models::MergedPullRequest;
use crate::github::pagination::{ContributionPage, PageCursor, PageInfo};

const CURSOR_PREFIX: &str = "page-";

/// Contribution source backed by in-memory pages.
///
/// Cursors are synthesised as `page-<n>`. A user without scripted pages gets
/// a single empty page.
#[derive(Debug)]
pub struct ScriptedContributionSource {
    pages: Mutex<HashMap<String, Vec<Vec<MergedPullRequest>>>>,
    failure: Mutex<Option<ContributionError>>,
    calls: AtomicUsize,
    gate: watch::Sender<bool>,
}

impl Default for ScriptedContributionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedContributionSource {
    /// Creates a source with no scripted users and an open gate.
    #[must_use]
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            pages: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
            gate,
        }
    }

    /// Scripts the pages returned for `user`.
    #[must_use]
    pub fn with_pages(mut self, user: &str, pages: Vec<Vec<MergedPullRequest>>) -> Self {
        self.pages.get_mut().insert(user.to_owned(), pages);
        self
    }

    /// Replaces the pages returned for `user`.
    pub async fn set_pages(&self, user: &str, pages: Vec<Vec<MergedPullRequest>>) {
        self.pages.lock().await.insert(user.to_owned(), pages);
    }

    /// Makes every subsequent call fail with `failure`, or succeed again when
    /// `None`.
    pub async fn set_failure(&self, failure: Option<ContributionError>) {
        *self.failure.lock().await = failure;
    }

    /// Number of page requests served so far, failed ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Holds every request until [`Self::release`] is called.
    pub fn hold(&self) {
        self.gate.send_replace(false);
    }

    /// Lets held and future requests proceed.
    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    async fn wait_for_gate(&self) -> Result<(), ContributionError> {
        let mut open = self.gate.subscribe();
        if open.wait_for(|is_open| *is_open).await.is_err() {
            return Err(ContributionError::Network {
                message: "scripted gate closed".to_owned(),
            });
        }
        Ok(())
    }
}

fn page_index(cursor: Option<&PageCursor>) -> Result<usize, ContributionError> {
    let Some(token) = cursor else {
        return Ok(0);
    };
    token
        .as_str()
        .strip_prefix(CURSOR_PREFIX)
        .and_then(|index| index.parse().ok())
        .ok_or_else(|| ContributionError::Api {
            message: format!("unknown cursor {}", token.as_str()),
        })
}

#[async_trait]
impl ContributionSource for ScriptedContributionSource {
    async fn merged_pull_requests(
        &self,
        user: &UserLogin,
        cursor: Option<PageCursor>,
    ) -> Result<ContributionPage, ContributionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await?;

        if let Some(failure) = self.failure.lock().await.clone() {
            return Err(failure);
        }

        let index = page_index(cursor.as_ref())?;
        let pages = self.pages.lock().await;
        let scripted = pages.get(user.as_str());
        let total = scripted.map_or(1, Vec::len);
        let records = scripted
            .and_then(|all| all.get(index))
            .cloned()
            .unwrap_or_default();

        let next = index.saturating_add(1);
        let page_info = if next < total {
            PageInfo::new(Some(PageCursor::new(format!("{CURSOR_PREFIX}{next}"))), true)
        } else {
            PageInfo::last()
        };

        Ok(ContributionPage { records, page_info })
    }
}
