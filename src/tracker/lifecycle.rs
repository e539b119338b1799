//! Lifecycle decisions for a reported regression.
//!
//! Deciding is kept apart from executing so the rules can be checked
//! without a backend.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::ports::{IssueState, TrackedIssue};

/// What to do about a regression report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No issue tracks the test yet.
    Create,
    /// The tracking issue was closed.
    Reopen {
        /// Issue number.
        number: u64,
    },
    /// The tracking issue is open but has been quiet past the threshold.
    Comment {
        /// Issue number.
        number: u64,
    },
    /// The tracking issue is open and recently updated.
    AlreadyTracked {
        /// Issue number.
        number: u64,
    },
}

/// What `add_issue` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new issue was created. `None` when creation was skipped by dry run.
    Created {
        /// Number of the new issue.
        number: Option<u64>,
    },
    /// A closed issue was reopened and commented on.
    Reopened {
        /// Issue number.
        number: u64,
    },
    /// A stale open issue received a new comment.
    Commented {
        /// Issue number.
        number: u64,
    },
    /// A fresh open issue was left alone.
    AlreadyTracked {
        /// Issue number.
        number: u64,
    },
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { number } => match number {
                Some(number) => write!(f, "created issue #{number}"),
                None => f.write_str("created issue"),
            },
            Self::Reopened { number } => write!(f, "reopened issue #{number}"),
            Self::Commented { number } => write!(f, "commented on stale issue #{number}"),
            Self::AlreadyTracked { number } => {
                write!(f, "issue #{number} is already tracked and fresh")
            }
        }
    }
}

/// Returns the first issue titled exactly `title` that carries every label.
#[must_use]
pub fn find_tracked<'a>(
    issues: &'a [TrackedIssue],
    title: &str,
    labels: &[String],
) -> Option<&'a TrackedIssue> {
    issues
        .iter()
        .find(|issue| issue.title == title && issue.has_labels(labels))
}

/// Returns `true` when more than `threshold` has passed since `updated_at`.
#[must_use]
pub fn is_stale(updated_at: DateTime<Utc>, now: DateTime<Utc>, threshold: Duration) -> bool {
    now.signed_duration_since(updated_at) > threshold
}

/// Picks the lifecycle transition for a report given the tracking issue, if any.
#[must_use]
pub fn decide(
    existing: Option<&TrackedIssue>,
    now: DateTime<Utc>,
    threshold: Duration,
) -> Decision {
    let Some(issue) = existing else {
        return Decision::Create;
    };
    let number = issue.number;
    if issue.state == IssueState::Closed {
        Decision::Reopen { number }
    } else if is_stale(issue.updated_at, now, threshold) {
        Decision::Comment { number }
    } else {
        Decision::AlreadyTracked { number }
    }
}
