//! In-memory adapters for tests.
//!
//! Each adapter is cheaply cloneable and shares its state between clones, so a
//! test can hand one clone to the tracker and inspect another afterwards.

pub mod clock;
pub mod filesystem;
pub mod issues;

pub use clock::FixedClock;
pub use filesystem::InMemoryFileSystem;
pub use issues::{BackendCall, CallKind, InMemoryIssueBackend};
