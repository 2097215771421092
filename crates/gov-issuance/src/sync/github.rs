use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{self, HeaderMap, HeaderValue, InvalidHeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::commit::CommitRecord;
use crate::config::SyncConfig;

pub const GITHUB_API_VERSION: &str = "2022-11-28";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("gov-issuance/", env!("CARGO_PKG_VERSION"));
const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("github request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("github responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("GITHUB_TOKEN is not a valid header value")]
    InvalidToken(#[source] InvalidHeaderValue),
}

/// Where commits are read from.
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// One page of the newest commits, newest first. `branch` selects a ref
    /// other than the default branch.
    async fn recent_commits(
        &self,
        page: u32,
        branch: Option<&str>,
    ) -> Result<Vec<CommitRecord>, GitHubError>;

    /// The full commit, including its changed files.
    async fn commit_details(&self, sha: &str) -> Result<CommitRecord, GitHubError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryInfo {
    pub full_name: String,
    pub default_branch: String,
    pub html_url: String,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Deserialize)]
struct ApiCommit {
    sha: String,
    html_url: String,
    commit: ApiCommitBody,
    #[serde(default)]
    files: Vec<ApiFile>,
}

#[derive(Debug, Deserialize)]
struct ApiCommitBody {
    message: String,
    author: Option<ApiSignature>,
}

#[derive(Debug, Deserialize)]
struct ApiSignature {
    name: Option<String>,
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiFile {
    filename: String,
}

impl From<ApiCommit> for CommitRecord {
    fn from(api: ApiCommit) -> Self {
        let (author, date) = match api.commit.author {
            Some(signature) => (signature.name, signature.date),
            None => (None, None),
        };

        Self {
            sha: api.sha,
            message: api.commit.message,
            author: author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            date,
            url: api.html_url,
            files: api.files.into_iter().map(|file| file.filename).collect(),
        }
    }
}

/// Reads commits through the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    owner: String,
    repo: String,
    per_page: u8,
}

impl GitHubClient {
    pub fn new(config: &SyncConfig) -> Result<Self, GitHubError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.github_token))
            .map_err(GitHubError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.github_api_base_url.trim_end_matches('/').to_string(),
            owner: config.github_owner.clone(),
            repo: config.github_repo.clone(),
            per_page: config.per_page,
        })
    }

    /// Repository metadata; doubles as a credentials check.
    pub async fn repository(&self) -> Result<RepositoryInfo, GitHubError> {
        let url = format!("{}/repos/{}/{}", self.base_url, self.owner, self.repo);
        debug!(%url, "fetching repository info");
        read_json(self.http.get(url).send().await?).await
    }

    fn commits_url(&self) -> String {
        format!("{}/repos/{}/{}/commits", self.base_url, self.owner, self.repo)
    }
}

#[async_trait]
impl CommitSource for GitHubClient {
    async fn recent_commits(
        &self,
        page: u32,
        branch: Option<&str>,
    ) -> Result<Vec<CommitRecord>, GitHubError> {
        let mut query = vec![
            ("per_page", self.per_page.to_string()),
            ("page", page.to_string()),
        ];
        if let Some(branch) = branch {
            query.push(("sha", branch.to_string()));
        }

        debug!(page, ?branch, per_page = self.per_page, "listing commits");
        let response = self.http.get(self.commits_url()).query(&query).send().await?;
        let commits: Vec<ApiCommit> = read_json(response).await?;
        Ok(commits.into_iter().map(CommitRecord::from).collect())
    }

    async fn commit_details(&self, sha: &str) -> Result<CommitRecord, GitHubError> {
        let url = format!("{}/{sha}", self.commits_url());
        debug!(%sha, "fetching commit details");
        let commit: ApiCommit = read_json(self.http.get(url).send().await?).await?;
        Ok(commit.into())
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GitHubError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GitHubError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}
