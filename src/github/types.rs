//! GitHub API payloads
//!
//! Only the fields this service reads or writes are modeled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    pub commit: CommitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub tree: Vec<TreeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub sha: String,
}

/// Response of `GET /repos/{repo}/contents/{path}` for a file
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFile {
    pub sha: String,
}

/// State of an issue or pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// `state` filter of the pull request listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Open,
    All,
}

impl ListState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListState::Open => "open",
            ListState::All => "all",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
    pub state: IssueState,
    /// Description; absent when the PR was opened without one
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub head: PullHead,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullHead {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewRef<'a> {
    #[serde(rename = "ref")]
    pub ref_name: &'a str,
    pub sha: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct FileUpdate<'a> {
    pub message: &'a str,
    /// Base64 encoded file content
    pub content: String,
    pub branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FileDelete<'a> {
    pub message: &'a str,
    pub sha: &'a str,
    pub branch: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NewPullRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub head: &'a str,
    pub base: &'a str,
    pub maintainer_can_modify: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
