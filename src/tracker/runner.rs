//! The dry-run boundary every backend call passes through.

use thiserror::Error;
use tracing::{debug, info};

use super::config::DryRunScope;
use super::error::TrackerError;
use crate::ports::{BackendError, RepoRef};

/// Whether an operation only reads backend state or changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Reads backend state.
    Read,
    /// Changes backend state.
    Mutation,
}

/// A backend call that failed, tagged with the operation name.
#[derive(Debug, Error)]
#[error("failed {operation}: {source}")]
pub struct OperationFailure {
    /// Human-readable operation name.
    pub operation: &'static str,
    /// Backend failure.
    pub source: BackendError,
}

impl OperationFailure {
    /// Attaches the targeted issue and repository.
    #[must_use]
    pub fn in_context(self, target: &str, repo: &RepoRef) -> TrackerError {
        TrackerError::Operation {
            operation: self.operation,
            target: target.to_string(),
            repo: repo.clone(),
            source: self.source,
        }
    }
}

/// Runs named backend operations, or skips them in dry-run mode.
#[derive(Debug, Clone, Copy)]
pub struct OperationRunner {
    dry_run: bool,
    scope: DryRunScope,
}

impl OperationRunner {
    /// Creates a runner. `scope` only matters when `dry_run` is set.
    #[must_use]
    pub fn new(dry_run: bool, scope: DryRunScope) -> Self {
        Self { dry_run, scope }
    }

    /// Returns `true` when operations of `kind` are skipped.
    #[must_use]
    pub fn skips(&self, kind: OperationKind) -> bool {
        self.dry_run && (kind == OperationKind::Mutation || self.scope == DryRunScope::All)
    }

    /// Runs `op`, or skips it and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the backend error from `op`, tagged with `operation`.
    pub fn run<T>(
        &self,
        kind: OperationKind,
        operation: &'static str,
        op: impl FnOnce() -> Result<T, BackendError>,
    ) -> Result<Option<T>, OperationFailure> {
        if self.skips(kind) {
            info!(operation, "dry run: skipping");
            return Ok(None);
        }

        debug!(operation, "running");
        match op() {
            Ok(value) => Ok(Some(value)),
            Err(source) => Err(OperationFailure { operation, source }),
        }
    }
}
