//! GitHub client implementation
//!
//! Thin typed wrapper over the REST endpoints for refs, trees, contents,
//! pull requests and issue metadata of a single repository.

use crate::config::GitHubConfig;
use crate::github::types::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Page size used when listing pull requests (GitHub maximum)
const PER_PAGE: usize = 100;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("request to GitHub failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub responded {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("invalid GitHub configuration: {0}")]
    InvalidConfig(String),
}

impl GitHubError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GitHubError::Api { status, .. } => Some(*status),
            GitHubError::Http(e) => e.status(),
            GitHubError::InvalidConfig(_) => None,
        }
    }

    /// 422 Unprocessable Entity, which `create_ref` returns for an existing ref
    pub fn is_unprocessable(&self) -> bool {
        self.status() == Some(StatusCode::UNPROCESSABLE_ENTITY)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Client bound to one repository
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: Url,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self, GitHubError> {
        let (owner, repo) = config
            .repo_id
            .split_once('/')
            .ok_or_else(|| GitHubError::InvalidConfig(format!("bad repo id '{}'", config.repo_id)))?;

        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| GitHubError::InvalidConfig("token is not a valid header value".into()))?;
        token.set_sensitive(true);
        headers.insert(AUTHORIZATION, token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));

        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Commit sha at the tip of a branch
    pub async fn branch_head(&self, branch: &str) -> Result<String, GitHubError> {
        let branch: Branch = self
            .send_json(self.request(Method::GET, &["branches", branch])?)
            .await?;
        Ok(branch.commit.sha)
    }

    /// Create `ref_name` (e.g. `refs/heads/foo`) pointing at `sha`
    pub async fn create_ref(&self, ref_name: &str, sha: &str) -> Result<(), GitHubError> {
        let request = self
            .request(Method::POST, &["git", "refs"])?
            .json(&NewRef { ref_name, sha });
        self.send(request).await?;
        Ok(())
    }

    /// Entries of the tree `tree_ish` (`branch:dir`), `None` if it does not exist
    pub async fn tree_entries(&self, tree_ish: &str) -> Result<Option<Vec<TreeEntry>>, GitHubError> {
        let request = self.request(Method::GET, &["git", "trees", tree_ish])?;
        match self.send_json::<Tree>(request).await {
            Ok(tree) => Ok(Some(tree.tree)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Blob sha of the file at `path` on `branch`, `None` if absent
    pub async fn file_sha(&self, path: &str, branch: &str) -> Result<Option<String>, GitHubError> {
        let request = self
            .request(Method::GET, &file_segments(path))?
            .query(&[("ref", branch)]);
        match self.send_json::<ContentFile>(request).await {
            Ok(file) => Ok(Some(file.sha)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create or overwrite a file with one commit on `branch`
    pub async fn put_file(
        &self,
        path: &str,
        message: &str,
        content: &[u8],
        sha: Option<&str>,
        branch: &str,
    ) -> Result<(), GitHubError> {
        let request = self
            .request(Method::PUT, &file_segments(path))?
            .json(&FileUpdate {
                message,
                content: STANDARD.encode(content),
                branch,
                sha,
            });
        self.send(request).await?;
        Ok(())
    }

    pub async fn delete_file(
        &self,
        path: &str,
        message: &str,
        sha: &str,
        branch: &str,
    ) -> Result<(), GitHubError> {
        let request = self
            .request(Method::DELETE, &file_segments(path))?
            .json(&FileDelete { message, sha, branch });
        self.send(request).await?;
        Ok(())
    }

    pub async fn create_pull(&self, pull: &NewPullRequest<'_>) -> Result<PullRequest, GitHubError> {
        let request = self.request(Method::POST, &["pulls"])?.json(pull);
        self.send_json(request).await
    }

    /// All pull requests in `state`, following pagination
    pub async fn list_pulls(&self, state: ListState) -> Result<Vec<PullRequest>, GitHubError> {
        let mut pulls = Vec::new();
        let mut page = 1usize;

        loop {
            let request = self.request(Method::GET, &["pulls"])?.query(&[
                ("state", state.as_str().to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ]);
            let batch: Vec<PullRequest> = self.send_json(request).await?;
            let done = batch.len() < PER_PAGE;
            pulls.extend(batch);
            if done {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} pull request(s) in state {}", pulls.len(), state.as_str());
        Ok(pulls)
    }

    /// Replace the labels of an issue or pull request
    pub async fn set_labels(&self, number: u64, labels: &[String]) -> Result<(), GitHubError> {
        let number = number.to_string();
        let request = self
            .request(Method::PUT, &["issues", number.as_str(), "labels"])?
            .json(&serde_json::json!({ "labels": labels }));
        self.send(request).await?;
        Ok(())
    }

    pub async fn add_assignees(&self, number: u64, assignees: &[String]) -> Result<(), GitHubError> {
        let number = number.to_string();
        let request = self
            .request(Method::POST, &["issues", number.as_str(), "assignees"])?
            .json(&serde_json::json!({ "assignees": assignees }));
        self.send(request).await?;
        Ok(())
    }

    pub async fn request_reviewers(&self, number: u64, reviewers: &[String]) -> Result<(), GitHubError> {
        let number = number.to_string();
        let request = self
            .request(Method::POST, &["pulls", number.as_str(), "requested_reviewers"])?
            .json(&serde_json::json!({ "reviewers": reviewers }));
        self.send(request).await?;
        Ok(())
    }

    /// Build a request to `{api}/repos/{owner}/{repo}/{segments...}`
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, GitHubError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitHubError::InvalidConfig(format!("cannot use '{}' as API base", self.api_url)))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str()])
            .extend(segments);

        debug!("GitHub {} {}", method, url);
        Ok(self.http.request(method, url))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GitHubError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        Err(GitHubError::Api { status, message })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GitHubError> {
        Ok(self.send(request).await?.json::<T>().await?)
    }
}

/// `contents/{path}` split into URL segments so slashes stay separators
fn file_segments(path: &str) -> Vec<&str> {
    std::iter::once("contents")
        .chain(path.split('/').filter(|s| !s.is_empty()))
        .collect()
}
