//! Proposal data models
//!
//! A change proposal is a pull request whose description carries a small
//! JSON document describing the submitted catalog item change.

use crate::github::{IssueState, PullRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of change requested for a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    Add,
    Update,
    Delete,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeType::Add => write!(f, "Add"),
            ChangeType::Update => write!(f, "Update"),
            ChangeType::Delete => write!(f, "Delete"),
        }
    }
}

/// Review state, observed from the pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    Pending,
    Merged,
    Rejected,
}

impl ProposalState {
    pub fn from_pull_request(pr: &PullRequest) -> Self {
        match pr.state {
            IssueState::Open => ProposalState::Pending,
            IssueState::Closed if pr.merged_at.is_some() => ProposalState::Merged,
            IssueState::Closed => ProposalState::Rejected,
        }
    }
}

/// A catalog change proposal as presented to API clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeProposal {
    pub filename: String,
    pub item_type: String,
    pub change_type: ChangeType,
    pub state: ProposalState,
    pub user: String,
    pub data_owner: bool,
    pub url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// The part of a proposal stored in the pull request description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProposalBody {
    pub filename: String,
    pub item_type: String,
    pub change_type: ChangeType,
    pub user: String,
    pub data_owner: bool,
}

#[derive(Error, Debug)]
pub enum BodyParseError {
    #[error("pull request has no description")]
    Empty,

    #[error("description is not a proposal body: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ProposalBody {
    pub fn to_description(&self) -> String {
        // Only plain strings, an enum and a bool: serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_description(description: Option<&str>) -> Result<Self, BodyParseError> {
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or(BodyParseError::Empty)?;
        Ok(serde_json::from_str(description)?)
    }

    /// Combine with the pull request it was read from
    pub fn into_proposal(self, pr: &PullRequest) -> ChangeProposal {
        ChangeProposal {
            filename: self.filename,
            item_type: self.item_type,
            change_type: self.change_type,
            state: ProposalState::from_pull_request(pr),
            user: self.user,
            data_owner: self.data_owner,
            url: Some(pr.html_url.clone()),
            created_at: Some(pr.created_at),
        }
    }
}

/// An item mutation handed to the proposal manager
#[derive(Debug, Clone)]
pub struct ChangeSubmission {
    pub item_type: String,
    pub filename: String,
    pub change_type: ChangeType,
    /// File content; `None` for deletions
    pub content: Option<Vec<u8>>,
    pub user: String,
    pub data_owner: bool,
    pub assignees: Vec<String>,
    pub reviewers: Vec<String>,
}

impl ChangeSubmission {
    pub fn body(&self) -> ProposalBody {
        ProposalBody {
            filename: self.filename.clone(),
            item_type: self.item_type.clone(),
            change_type: self.change_type,
            user: self.user.clone(),
            data_owner: self.data_owner,
        }
    }
}
