//! Issue lifecycle manager for performance regressions.
//!
//! One labelled GitHub issue tracks each regressing test, matched by its
//! rendered title. A report either creates that issue, reopens it, adds a
//! comment to it when it has gone stale, or leaves it alone. Every backend
//! call goes through [`OperationRunner`] so dry-run mode holds on every path.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod runner;
pub mod templates;

use tracing::info;

pub use config::{DryRunScope, TrackerConfig};
pub use error::TrackerError;
pub use lifecycle::{AddOutcome, Decision};
pub use runner::{OperationKind, OperationRunner};
pub use templates::Templates;

use crate::context::ServiceContext;
use crate::ports::{BackendError, Clock, IssueBackend, RepoRef, TrackedIssue};
use runner::OperationKind::{Mutation, Read};

/// Operations callers perform on tracked issues.
pub trait IssueOperations {
    /// Records a regression for `test_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend call fails. Effects applied before the
    /// failure are not rolled back.
    fn add_issue(&self, test_name: &str, description: &str) -> Result<AddOutcome, TrackerError>;

    /// Closes issue `number`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the request.
    fn close_issue(&self, number: u64) -> Result<(), TrackerError>;
}

/// Authenticates against GitHub and builds a handler for `config`.
///
/// # Errors
///
/// Returns [`TrackerError::Authentication`] for an empty or unusable
/// credential, or a configuration error if `config` is invalid.
pub fn setup(credential: &str, config: TrackerConfig) -> Result<IssueHandler, TrackerError> {
    if credential.trim().is_empty() {
        return Err(TrackerError::Authentication("no GitHub token provided".into()));
    }
    let ctx = ServiceContext::live(credential, &config.api_base_url)
        .map_err(|e| TrackerError::Authentication(e.to_string()))?;
    IssueHandler::new(ctx.issues, ctx.clock, config)
}

/// Drives issue lifecycles against an injected backend.
pub struct IssueHandler {
    backend: Box<dyn IssueBackend>,
    clock: Box<dyn Clock>,
    runner: OperationRunner,
    repo: RepoRef,
    config: TrackerConfig,
}

impl IssueHandler {
    /// Creates a handler using `backend` for issue calls and `clock` for staleness.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(
        backend: Box<dyn IssueBackend>,
        clock: Box<dyn Clock>,
        config: TrackerConfig,
    ) -> Result<Self, TrackerError> {
        config.validate()?;
        Ok(Self {
            backend,
            clock,
            runner: OperationRunner::new(config.dry_run, config.dry_run_scope),
            repo: config.repo_ref(),
            config,
        })
    }

    /// The configuration this handler was built with.
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Runs one backend call through the runner and attaches diagnostics.
    fn run<T>(
        &self,
        kind: OperationKind,
        operation: &'static str,
        target: &str,
        op: impl FnOnce(&dyn IssueBackend) -> Result<T, BackendError>,
    ) -> Result<Option<T>, TrackerError> {
        self.runner
            .run(kind, operation, || op(self.backend.as_ref()))
            .map_err(|failure| failure.in_context(target, &self.repo))
    }

    fn find_issue(&self, title: &str, target: &str) -> Result<Option<TrackedIssue>, TrackerError> {
        let issues = self
            .run(Read, "listing issues", target, |backend| {
                backend.list_issues(&self.repo, &self.config.labels)
            })?
            .unwrap_or_default();
        let tracked = lifecycle::find_tracked(&issues, title, &self.config.labels);
        Ok(tracked.cloned())
    }

    fn create_new_issue(
        &self,
        test_name: &str,
        title: &str,
        target: &str,
        description: &str,
    ) -> Result<AddOutcome, TrackerError> {
        let templates = &self.config.templates;
        let body = templates.render_body(test_name)?;
        let comment = templates.render_new_regression(description)?;

        let Some(issue) = self.run(Mutation, "creating issue", target, |backend| {
            backend.create_issue(&self.repo, title, &body)
        })?
        else {
            info!(title, "dry run: skipping labels and comment");
            return Ok(AddOutcome::Created { number: None });
        };

        let labels = &self.config.labels;
        self.run(Mutation, "adding tracking labels", target, |backend| {
            backend.add_labels(&self.repo, issue.number, labels)
        })?;
        self.add_comment(issue.number, target, &comment)?;

        info!(title, number = issue.number, "created tracking issue");
        let number = Some(issue.number);
        Ok(AddOutcome::Created { number })
    }

    fn reopen_issue(
        &self,
        number: u64,
        target: &str,
        description: &str,
    ) -> Result<(), TrackerError> {
        let comment = self.config.templates.render_reopen(description)?;
        self.run(Mutation, "reopening issue", target, |backend| {
            backend.reopen_issue(&self.repo, number)
        })?;
        self.add_comment(number, target, &comment)?;
        info!(number, "reopened tracking issue");
        Ok(())
    }

    fn add_comment(&self, number: u64, target: &str, body: &str) -> Result<(), TrackerError> {
        self.run(Mutation, "adding comment", target, |backend| {
            backend.create_comment(&self.repo, number, body)
        })?;
        Ok(())
    }
}

impl IssueOperations for IssueHandler {
    fn add_issue(&self, test_name: &str, description: &str) -> Result<AddOutcome, TrackerError> {
        let title = self.config.templates.render_title(test_name)?;
        let target = format!("issue '{title}'");

        let existing = self.find_issue(&title, &target)?;
        let decision = lifecycle::decide(
            existing.as_ref(),
            self.clock.now(),
            self.config.staleness_threshold(),
        );
        info!(test_name, ?decision, "regression reported");

        match decision {
            Decision::Create => self.create_new_issue(test_name, &title, &target, description),
            Decision::Reopen { number } => {
                self.reopen_issue(number, &target, description)?;
                Ok(AddOutcome::Reopened { number })
            }
            Decision::Comment { number } => {
                let comment = self.config.templates.render_new_regression(description)?;
                self.add_comment(number, &target, &comment)?;
                Ok(AddOutcome::Commented { number })
            }
            Decision::AlreadyTracked { number } => Ok(AddOutcome::AlreadyTracked { number }),
        }
    }

    fn close_issue(&self, number: u64) -> Result<(), TrackerError> {
        let target = format!("issue #{number}");
        self.run(Mutation, "closing issue", &target, |backend| {
            backend.close_issue(&self.repo, number)
        })?;
        info!(number, "closed issue");
        Ok(())
    }
}
