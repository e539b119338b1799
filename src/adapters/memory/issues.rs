//! In-memory issue backend that records every call.

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{
    BackendError, Clock, IssueBackend, IssueComment, IssueState, RepoRef, TrackedIssue,
};

/// Which backend capability a call exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `list_issues`
    ListIssues,
    /// `create_issue`
    CreateIssue,
    /// `add_labels`
    AddLabels,
    /// `close_issue`
    CloseIssue,
    /// `reopen_issue`
    ReopenIssue,
    /// `create_comment`
    CreateComment,
}

/// One call received by the backend, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// Issues were listed.
    ListIssues {
        /// Target repository.
        repo: RepoRef,
        /// Required labels.
        labels: Vec<String>,
    },
    /// An issue was created.
    CreateIssue {
        /// Target repository.
        repo: RepoRef,
        /// Issue title.
        title: String,
        /// Issue body.
        body: String,
    },
    /// Labels were attached.
    AddLabels {
        /// Target repository.
        repo: RepoRef,
        /// Issue number.
        number: u64,
        /// Labels added.
        labels: Vec<String>,
    },
    /// An issue was closed.
    CloseIssue {
        /// Target repository.
        repo: RepoRef,
        /// Issue number.
        number: u64,
    },
    /// An issue was reopened.
    ReopenIssue {
        /// Target repository.
        repo: RepoRef,
        /// Issue number.
        number: u64,
    },
    /// A comment was posted.
    CreateComment {
        /// Target repository.
        repo: RepoRef,
        /// Issue number.
        number: u64,
        /// Comment text.
        body: String,
    },
}

impl BackendCall {
    /// The capability this call exercised.
    #[must_use]
    pub fn kind(&self) -> CallKind {
        match self {
            Self::ListIssues { .. } => CallKind::ListIssues,
            Self::CreateIssue { .. } => CallKind::CreateIssue,
            Self::AddLabels { .. } => CallKind::AddLabels,
            Self::CloseIssue { .. } => CallKind::CloseIssue,
            Self::ReopenIssue { .. } => CallKind::ReopenIssue,
            Self::CreateComment { .. } => CallKind::CreateComment,
        }
    }

    /// Returns `true` for every call except listing.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        self.kind() != CallKind::ListIssues
    }
}

#[derive(Debug)]
struct StoredIssue {
    repo: RepoRef,
    issue: TrackedIssue,
    comments: Vec<IssueComment>,
}

#[derive(Debug, Default)]
struct State {
    issues: Vec<StoredIssue>,
    calls: Vec<BackendCall>,
    failures: HashSet<CallKind>,
    next_comment_id: u64,
}

impl State {
    fn find_mut(&mut self, repo: &RepoRef, number: u64) -> Result<&mut StoredIssue, BackendError> {
        self.issues
            .iter_mut()
            .find(|stored| stored.repo == *repo && stored.issue.number == number)
            .ok_or(BackendError::NotFound { number })
    }

    fn next_number(&self, repo: &RepoRef) -> u64 {
        self.issues
            .iter()
            .filter(|stored| stored.repo == *repo)
            .map(|stored| stored.issue.number)
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Issue backend held entirely in memory.
///
/// Every call is appended to a log before it is applied, including calls
/// that fail, so tests can assert on exact call sequences. Failures can be
/// injected per capability with [`fail_on`](Self::fail_on).
#[derive(Clone)]
pub struct InMemoryIssueBackend {
    state: Arc<Mutex<State>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryIssueBackend {
    /// Creates an empty backend that stamps updates with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts an existing issue without recording a call.
    pub fn seed(&self, repo: &RepoRef, issue: TrackedIssue) {
        self.lock().issues.push(StoredIssue {
            repo: repo.clone(),
            issue,
            comments: Vec::new(),
        });
    }

    /// Makes every subsequent call of `kind` fail.
    pub fn fail_on(&self, kind: CallKind) {
        self.lock().failures.insert(kind);
    }

    /// All calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Calls received so far, excluding listings.
    #[must_use]
    pub fn mutations(&self) -> Vec<BackendCall> {
        self.calls()
            .into_iter()
            .filter(BackendCall::is_mutation)
            .collect()
    }

    /// Current state of every issue in `repo`.
    #[must_use]
    pub fn issues(&self, repo: &RepoRef) -> Vec<TrackedIssue> {
        self.lock()
            .issues
            .iter()
            .filter(|stored| stored.repo == *repo)
            .map(|stored| stored.issue.clone())
            .collect()
    }

    /// Comments posted on issue `number` in `repo`.
    #[must_use]
    pub fn comments(&self, repo: &RepoRef, number: u64) -> Vec<IssueComment> {
        self.lock()
            .issues
            .iter()
            .find(|stored| stored.repo == *repo && stored.issue.number == number)
            .map(|stored| stored.comments.clone())
            .unwrap_or_default()
    }

    /// Records `call` and returns the locked state, or the injected failure.
    fn begin(&self, call: BackendCall) -> Result<MutexGuard<'_, State>, BackendError> {
        let kind = call.kind();
        let mut state = self.lock();
        state.calls.push(call);
        if state.failures.contains(&kind) {
            return Err(BackendError::Injected(format!("{kind:?}")));
        }
        Ok(state)
    }

    fn set_state(
        &self,
        call: BackendCall,
        repo: &RepoRef,
        number: u64,
        to: IssueState,
    ) -> Result<(), BackendError> {
        let now = self.clock.now();
        let mut state = self.begin(call)?;
        let stored = state.find_mut(repo, number)?;
        stored.issue.state = to;
        stored.issue.updated_at = now;
        Ok(())
    }
}

impl IssueBackend for InMemoryIssueBackend {
    fn list_issues(
        &self,
        repo: &RepoRef,
        labels: &[String],
    ) -> Result<Vec<TrackedIssue>, BackendError> {
        let state = self.begin(BackendCall::ListIssues {
            repo: repo.clone(),
            labels: labels.to_vec(),
        })?;
        Ok(state
            .issues
            .iter()
            .filter(|stored| stored.repo == *repo && stored.issue.has_labels(labels))
            .map(|stored| stored.issue.clone())
            .collect())
    }

    fn create_issue(
        &self,
        repo: &RepoRef,
        title: &str,
        body: &str,
    ) -> Result<TrackedIssue, BackendError> {
        let now = self.clock.now();
        let mut state = self.begin(BackendCall::CreateIssue {
            repo: repo.clone(),
            title: title.to_string(),
            body: body.to_string(),
        })?;
        let issue = TrackedIssue {
            number: state.next_number(repo),
            title: title.to_string(),
            state: IssueState::Open,
            updated_at: now,
            labels: BTreeSet::new(),
        };
        state.issues.push(StoredIssue {
            repo: repo.clone(),
            issue: issue.clone(),
            comments: Vec::new(),
        });
        Ok(issue)
    }

    fn add_labels(
        &self,
        repo: &RepoRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), BackendError> {
        let now = self.clock.now();
        let mut state = self.begin(BackendCall::AddLabels {
            repo: repo.clone(),
            number,
            labels: labels.to_vec(),
        })?;
        let stored = state.find_mut(repo, number)?;
        stored.issue.labels.extend(labels.iter().cloned());
        stored.issue.updated_at = now;
        Ok(())
    }

    fn close_issue(&self, repo: &RepoRef, number: u64) -> Result<(), BackendError> {
        let call = BackendCall::CloseIssue {
            repo: repo.clone(),
            number,
        };
        self.set_state(call, repo, number, IssueState::Closed)
    }

    fn reopen_issue(&self, repo: &RepoRef, number: u64) -> Result<(), BackendError> {
        let call = BackendCall::ReopenIssue {
            repo: repo.clone(),
            number,
        };
        self.set_state(call, repo, number, IssueState::Open)
    }

    fn create_comment(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<IssueComment, BackendError> {
        let now = self.clock.now();
        let mut state = self.begin(BackendCall::CreateComment {
            repo: repo.clone(),
            number,
            body: body.to_string(),
        })?;
        state.next_comment_id += 1;
        let comment = IssueComment {
            id: state.next_comment_id,
            body: body.to_string(),
        };
        let stored = state.find_mut(repo, number)?;
        stored.comments.push(comment.clone());
        stored.issue.updated_at = now;
        Ok(comment)
    }
}
