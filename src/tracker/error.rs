//! Tracker error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::ports::{BackendError, RepoRef};

/// Failure raised by the issue lifecycle manager.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The credential was missing or rejected before any call was made.
    #[error("cannot authenticate to GitHub: {0}")]
    Authentication(String),
    /// The tracker configuration is unusable.
    #[error("invalid tracker configuration: {0}")]
    InvalidConfig(String),
    /// A template failed to parse or render.
    #[error("invalid {name} template: {reason}")]
    Template {
        /// Which template.
        name: &'static str,
        /// Rendering error.
        reason: String,
    },
    /// A configuration file could not be loaded.
    #[error("failed to load config {}: {reason}", path.display())]
    ConfigFile {
        /// File that was read.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },
    /// A backend call failed.
    #[error("failed {operation} for {target} in repo '{repo}': {source}")]
    Operation {
        /// Human-readable operation name.
        operation: &'static str,
        /// The issue the operation targeted.
        target: String,
        /// Repository the issue lives in.
        repo: RepoRef,
        /// Backend failure.
        source: BackendError,
    },
}
