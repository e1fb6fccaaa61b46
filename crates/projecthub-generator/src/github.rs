//! Latest commit lookups against the GitHub REST API.
//!
//! Lookups never fail: any network, status or decoding problem degrades to
//! [`LatestUpdate::Unavailable`] so a flaky API only costs lastmod values.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use futures::future::join_all;
use projecthub_core::{Project, config::GithubConfig};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Media type requested from the API.
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Branch used when a project does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Slug -> latest external timestamp, for one build.
pub type ExternalTimestamps = HashMap<String, String>;

/// GitHub client construction errors.
#[derive(Debug, Error)]
pub enum GithubError {
    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// API base URL is invalid.
    #[error("invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// API base URL cannot carry path segments.
    #[error("API base URL cannot be a base: {0}")]
    NotABase(String),

    /// Token contains characters not allowed in a header.
    #[error("invalid API token: {0}")]
    Token(#[from] reqwest::header::InvalidHeaderValue),
}

/// Result type for GitHub client construction.
pub type Result<T> = std::result::Result<T, GithubError>;

/// Outcome of a latest-commit lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestUpdate {
    /// Timestamp of the branch head commit.
    Found(String),
    /// Nothing could be determined.
    Unavailable,
}

impl LatestUpdate {
    /// The timestamp, if one was found.
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Found(timestamp) => Some(timestamp),
            Self::Unavailable => None,
        }
    }
}

/// Source of latest-commit timestamps.
#[async_trait]
pub trait CommitLookup: Send + Sync {
    /// Latest update of `branch` in `repo` (`owner/name`).
    async fn latest_update(&self, repo: &str, branch: &str) -> LatestUpdate;
}

/// Split `owner/name` into its two parts.
pub fn split_repo(repo: &str) -> Option<(&str, &str)> {
    let (owner, name) = repo.trim().split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner, name))
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    commit: Option<CommitDetail>,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    committer: Option<Signature>,
    #[serde(default)]
    author: Option<Signature>,
}

#[derive(Debug, Deserialize)]
struct Signature {
    #[serde(default)]
    date: Option<String>,
}

/// Extract the commit date from a `GET /repos/{owner}/{repo}/commits/{ref}` body.
///
/// Prefers the committer date and falls back to the author date.
pub fn parse_commit_date(body: &str) -> Option<String> {
    let response: CommitResponse = serde_json::from_str(body).ok()?;
    let commit = response.commit?;
    let non_empty = |s: Signature| s.date.filter(|d| !d.trim().is_empty());

    commit
        .committer
        .and_then(non_empty)
        .or_else(|| commit.author.and_then(non_empty))
}

/// GitHub REST API client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: Url,
}

impl GithubClient {
    /// Create a client.
    ///
    /// `token` raises the rate limit when present; its absence is not an error.
    pub fn new(config: &GithubConfig, token: Option<String>) -> Result<Self> {
        let api_base = Url::parse(&config.api_base)?;
        if api_base.cannot_be_a_base() {
            return Err(GithubError::NotABase(config.api_base.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
            debug!("using authenticated GitHub requests");
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, api_base })
    }

    /// Endpoint for the head commit of `branch`, or `None` for a malformed repo.
    pub fn commit_url(&self, repo: &str, branch: &str) -> Option<Url> {
        let (owner, name) = split_repo(repo)?;
        let branch = if branch.trim().is_empty() {
            DEFAULT_BRANCH
        } else {
            branch
        };

        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["repos", owner, name, "commits", branch]);
        Some(url)
    }
}

#[async_trait]
impl CommitLookup for GithubClient {
    async fn latest_update(&self, repo: &str, branch: &str) -> LatestUpdate {
        let Some(url) = self.commit_url(repo, branch) else {
            warn!(repo, "repository is not in owner/name form, skipping lookup");
            return LatestUpdate::Unavailable;
        };

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(repo, branch, error = %e, "commit lookup failed");
                return LatestUpdate::Unavailable;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(repo, branch, %status, "commit lookup returned an error status");
            return LatestUpdate::Unavailable;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(repo, branch, error = %e, "failed to read commit response");
                return LatestUpdate::Unavailable;
            }
        };

        match parse_commit_date(&body) {
            Some(date) => {
                debug!(repo, branch, date = %date, "found latest commit");
                LatestUpdate::Found(date)
            }
            None => {
                warn!(repo, branch, "commit response has no usable date");
                LatestUpdate::Unavailable
            }
        }
    }
}

/// Look up the latest update of every public project linked to GitHub.
///
/// All lookups run concurrently and are awaited together; failed lookups
/// are simply absent from the result.
pub async fn fetch_latest_updates(
    lookup: &dyn CommitLookup,
    projects: &[Project],
) -> ExternalTimestamps {
    let lookups = projects
        .iter()
        .filter(|p| p.is_public())
        .filter_map(|p| p.github().map(|github| (p, github)))
        .map(|(project, github)| async move {
            let update = lookup.latest_update(&github.repo, &github.branch).await;
            (project.slug.clone(), update)
        });

    let results = join_all(lookups).await;
    let requested = results.len();

    let timestamps: ExternalTimestamps = results
        .into_iter()
        .filter_map(|(slug, update)| update.into_option().map(|ts| (slug, ts)))
        .collect();

    info!(
        requested,
        found = timestamps.len(),
        "fetched latest commit dates"
    );

    timestamps
}
