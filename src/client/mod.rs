//! HTTP client for a running contribution service.
//!
//! [`LookupClient`] asks `GET {endpoint}/{user}` for a user's contribution
//! index and [`write_report`] renders it as an indented owner → repository
//! listing, optionally with every pull request title and link.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use clap::Parser;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::github::error::ContributionError;
use crate::server::CACHE_REFRESH_HEADER;

/// Endpoint of a service started with the default configuration.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:6000/user";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments of the lookup client.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "contributed-lookup",
    about = "Lists the repositories of others a GitHub user has had pull requests merged into"
)]
pub struct LookupArgs {
    /// GitHub logins to look up.
    #[arg(required = true)]
    pub users: Vec<String>,

    /// The `/user` endpoint of the contribution service.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub url: String,

    /// Also print every pull request title and link.
    #[arg(long)]
    pub full: bool,

    /// Ask the service to rebuild each user's index instead of serving the
    /// cached copy.
    #[arg(long)]
    pub refresh: bool,
}

/// Contributions of one owner as served over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OwnerReport {
    /// Avatar of the repository owner.
    #[serde(rename = "avatarURL")]
    pub avatar_url: String,
    /// Repository name → pull request title → link.
    #[serde(rename = "pullRequests")]
    pub repositories: BTreeMap<String, BTreeMap<String, String>>,
}

/// A user's contribution index keyed by owner login, in sorted order.
pub type ContributionReport = BTreeMap<String, OwnerReport>;

/// Client for the `/user/{name}` route of a contribution service.
#[derive(Debug, Clone)]
pub struct LookupClient {
    http: Client,
    endpoint: Url,
}

impl LookupClient {
    /// Creates a client for the service whose `/user` route is `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::InvalidUrl`] when `endpoint` is not an
    /// absolute HTTP(S) URL, or [`ContributionError::Configuration`] when
    /// the HTTP client cannot be built.
    pub fn new(endpoint: &str) -> Result<Self, ContributionError> {
        let parsed = Url::parse(endpoint)
            .map_err(|error| ContributionError::InvalidUrl(format!("{endpoint}: {error}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ContributionError::InvalidUrl(format!(
                "{endpoint}: unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|error| ContributionError::Configuration {
                message: format!("failed to configure lookup HTTP client: {error}"),
            })?;

        Ok(Self {
            http,
            endpoint: parsed,
        })
    }

    /// Fetches the contribution index of `user`.
    ///
    /// With `refresh` the request carries the cache refresh header.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::LookupFailed`] when the service answers
    /// with a non-success status, and [`ContributionError::ServiceRequest`]
    /// when it cannot be reached or its body is not a contribution index.
    pub async fn contributions(
        &self,
        user: &str,
        refresh: bool,
    ) -> Result<ContributionReport, ContributionError> {
        let mut request = self.http.get(self.user_url(user)?);
        if refresh {
            request = request.header(CACHE_REFRESH_HEADER, "true");
        }

        let response = request
            .send()
            .await
            .map_err(|error| ContributionError::ServiceRequest {
                message: format!("lookup for {user} failed: {error}"),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ContributionError::LookupFailed {
                login: user.to_owned(),
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|error| ContributionError::ServiceRequest {
                message: format!("lookup for {user} returned an unreadable body: {error}"),
            })
    }

    fn user_url(&self, user: &str) -> Result<Url, ContributionError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ContributionError::InvalidUrl(format!("{}: cannot be a base", self.endpoint))
            })?
            .pop_if_empty()
            .push(user);
        Ok(url)
    }
}

/// Writes `report` for `user` as an indented listing.
///
/// Each owner is followed by its repositories; with `full` every pull
/// request title and link is listed under its repository.
///
/// # Errors
///
/// Returns [`ContributionError::Io`] when writing fails.
pub fn write_report<W: Write>(
    writer: &mut W,
    user: &str,
    report: &ContributionReport,
    full: bool,
) -> Result<(), ContributionError> {
    if report.is_empty() {
        writeln!(writer, "{user} has no contributions.").map_err(|e| io_error(&e))?;
        return Ok(());
    }

    writeln!(writer, "{user}:").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    for (owner, contributions) in report {
        writeln!(writer, "\t{owner}").map_err(|e| io_error(&e))?;
        for (repository, pull_requests) in &contributions.repositories {
            writeln!(writer, "\t\t{repository}").map_err(|e| io_error(&e))?;
            if full {
                for (title, link) in pull_requests {
                    writeln!(writer, "\t\t\t{title} {link}").map_err(|e| io_error(&e))?;
                }
            }
        }
        writeln!(writer).map_err(|e| io_error(&e))?;
    }

    Ok(())
}

fn io_error(error: &std::io::Error) -> ContributionError {
    ContributionError::Io {
        message: error.to_string(),
    }
}
