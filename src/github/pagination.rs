//! Cursor pagination over the merged pull requests of one user.
//!
//! GitHub's GraphQL connections page with an opaque `endCursor` and a
//! `hasNextPage` flag. [`fetch_all`] threads that cursor through repeated
//! calls to a [`ContributionSource`] until the connection is exhausted.

use tracing::debug;

use super::error::ContributionError;
use super::gateway::ContributionSource;
use super::identity::UserLogin;
use super::models::MergedPullRequest;

/// Opaque pagination token marking where the next page begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wraps a cursor returned by the upstream source.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw cursor.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Navigation state reported alongside one page of results.
///
/// # Example
///
/// ```
/// use contributed::github::pagination::{PageCursor, PageInfo};
///
/// let info = PageInfo::new(Some(PageCursor::new("abc")), true);
/// assert!(info.has_next_page());
/// assert!(!info.is_last_page());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    end_cursor: Option<PageCursor>,
    has_next_page: bool,
}

impl PageInfo {
    /// Creates page info from the cursor of the last item and the has-more
    /// flag.
    #[must_use]
    pub const fn new(end_cursor: Option<PageCursor>, has_next_page: bool) -> Self {
        Self {
            end_cursor,
            has_next_page,
        }
    }

    /// Page info for a final page.
    #[must_use]
    pub const fn last() -> Self {
        Self::new(None, false)
    }

    /// Returns the cursor of the last item on this page, if any.
    #[must_use]
    pub const fn end_cursor(&self) -> Option<&PageCursor> {
        self.end_cursor.as_ref()
    }

    /// Returns true if more pages exist after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Returns true if this is the last page.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        !self.has_next_page
    }
}

/// One page of merged pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionPage {
    /// Records on this page, in upstream order.
    pub records: Vec<MergedPullRequest>,
    /// Navigation state for the following page.
    pub page_info: PageInfo,
}

/// Collects every merged pull request for `user` by following cursors until
/// the source reports no further pages.
///
/// Each call owns its own cursor and accumulator, so concurrent runs for
/// different users never observe each other's state.
///
/// # Errors
///
/// Propagates the first error returned by the source without returning any
/// partial results. Returns [`ContributionError::InvalidPagination`] when a
/// page reports more results but carries no cursor to continue from.
pub async fn fetch_all<Source>(
    source: &Source,
    user: &UserLogin,
) -> Result<Vec<MergedPullRequest>, ContributionError>
where
    Source: ContributionSource + ?Sized,
{
    let mut cursor: Option<PageCursor> = None;
    let mut records = Vec::new();
    let mut pages: u32 = 0;

    loop {
        let page = source.merged_pull_requests(user, cursor.take()).await?;
        pages = pages.saturating_add(1);
        records.extend(page.records);

        if page.page_info.is_last_page() {
            break;
        }

        match page.page_info.end_cursor {
            Some(next) => cursor = Some(next),
            None => {
                return Err(ContributionError::InvalidPagination {
                    message: format!(
                        "page {pages} for {user} reported more results without an end cursor"
                    ),
                });
            }
        }
    }

    debug!(%user, pages, records = records.len(), "fetched merged pull requests");
    Ok(records)
}
