//! Issue backend port for the tracked-issue lifecycle.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The `org/repo` pair an issue lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Owning organization or user.
    pub org: String,
    /// Repository name.
    pub repo: String,
}

impl RepoRef {
    /// Creates a repository reference.
    pub fn new(org: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.repo)
    }
}

/// Whether an issue is open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// The issue is open.
    Open,
    /// The issue has been closed.
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

/// An issue as reported by the backend.
///
/// The tracker never constructs one of these itself; it only reads what the
/// backend hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedIssue {
    /// Repository-scoped issue number.
    pub number: u64,
    /// Issue title. Correlates the issue with a test.
    pub title: String,
    /// Open or closed.
    pub state: IssueState,
    /// When the issue last changed on the backend.
    pub updated_at: DateTime<Utc>,
    /// Names of the labels attached to the issue.
    pub labels: BTreeSet<String>,
}

impl TrackedIssue {
    /// Returns `true` when the issue carries every label in `labels`.
    #[must_use]
    pub fn has_labels(&self, labels: &[String]) -> bool {
        labels.iter().all(|label| self.labels.contains(label))
    }
}

/// A comment posted on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueComment {
    /// Backend-assigned comment id.
    pub id: u64,
    /// Comment text.
    pub body: String,
}

/// Failure reported by an issue backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },
    /// The response could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// No issue with this number exists.
    #[error("issue #{number} not found")]
    NotFound {
        /// The requested issue number.
        number: u64,
    },
    /// A failure injected by a test double.
    #[error("injected failure: {0}")]
    Injected(String),
}

/// The six backend capabilities the lifecycle manager consumes.
///
/// Abstracting the backend lets tests substitute an in-memory fake without
/// any network access.
pub trait IssueBackend: Send + Sync {
    /// Lists issues in `repo` (any state) carrying every label in `labels`.
    ///
    /// # Errors
    ///
    /// Returns an error if the issues cannot be listed.
    fn list_issues(
        &self,
        repo: &RepoRef,
        labels: &[String],
    ) -> Result<Vec<TrackedIssue>, BackendError>;

    /// Creates a new open issue and returns it with its assigned number.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue cannot be created.
    fn create_issue(
        &self,
        repo: &RepoRef,
        title: &str,
        body: &str,
    ) -> Result<TrackedIssue, BackendError>;

    /// Attaches `labels` to an existing issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue is missing or the labels cannot be added.
    fn add_labels(&self, repo: &RepoRef, number: u64, labels: &[String])
        -> Result<(), BackendError>;

    /// Closes an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the state change.
    fn close_issue(&self, repo: &RepoRef, number: u64) -> Result<(), BackendError>;

    /// Reopens a closed issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the state change.
    fn reopen_issue(&self, repo: &RepoRef, number: u64) -> Result<(), BackendError>;

    /// Posts a comment on an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment cannot be created.
    fn create_comment(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<IssueComment, BackendError>;
}
