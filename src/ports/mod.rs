//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the tracker core and an
//! external system (time, filesystem, issue backend).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod issues;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use issues::{BackendError, IssueBackend, IssueComment, IssueState, RepoRef, TrackedIssue};
