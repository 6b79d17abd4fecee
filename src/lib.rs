//! Contributed: which repositories of other people has a GitHub user
//! contributed merged pull requests to?
//!
//! The library pages through a user's merged pull requests via the GitHub
//! GraphQL API, folds them into an owner → repository → pull request index,
//! keeps recent indices in a bounded single-flight cache, and serves them
//! over HTTP. A small client in [`client`] queries a running service.

pub mod cache;
pub mod client;
pub mod config;
pub mod github;
pub mod index;
pub mod server;
pub mod telemetry;

pub use cache::ContributionCache;
pub use config::ContributedConfig;
pub use github::{
    ContributionError, ContributionSource, OctocrabContributionGateway, PersonalAccessToken,
    UserLogin,
};
pub use index::ContributionIndex;
pub use server::{AppState, CACHE_REFRESH_HEADER};
