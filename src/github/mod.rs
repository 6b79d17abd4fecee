//! GitHub access for merged pull request lookups.
//!
//! This module wraps Octocrab to page through the merged pull requests of a
//! user via the GraphQL API. Errors are mapped into user-friendly variants so
//! that callers can surface precise failures without exposing Octocrab
//! internals.

pub mod error;
pub mod gateway;
pub mod identity;
pub mod models;
pub mod pagination;

pub use error::ContributionError;
pub use gateway::{ContributionSource, OctocrabContributionGateway};
pub use identity::{PersonalAccessToken, UserLogin};
pub use models::MergedPullRequest;
pub use pagination::{ContributionPage, PageCursor, PageInfo, fetch_all};

#[cfg(test)]
pub use gateway::MockContributionSource;

#[cfg(test)]
mod tests;
