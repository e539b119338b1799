//! Commit ID lookup from the `HEAD` file baked into the build's data directory.
//!
//! The data directory is named by `KO_DATA_PATH`. Its `HEAD` file holds
//! either a commit hash or a one-level `ref: <path>` pointer to a file that
//! does.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::ports::FileSystem;

/// Environment variable naming the data directory.
pub const DATA_PATH_ENV: &str = "KO_DATA_PATH";
const HEAD_FILE: &str = "HEAD";
const REF_PREFIX: &str = "ref: ";
const SHORT_LEN: usize = 7;

static COMMIT_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-f0-9]{40}$").unwrap());

/// Failure resolving the commit ID.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The data directory variable is unset or empty.
    #[error("{var:?} does not exist or is empty")]
    DataPathUnset {
        /// Variable name.
        var: &'static str,
    },
    /// A file under the data directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A symbolic ref climbs out of the data directory.
    #[error("{0:?} points outside the data directory")]
    RefOutsideDataDir(String),
    /// The resolved content is not a full lowercase commit hash.
    #[error("{0:?} is not a valid commit ID")]
    InvalidCommitId(String),
}

/// Resolves the commit ID a build was made from.
pub struct CommitResolver<'a> {
    fs: &'a dyn FileSystem,
    data_dir: PathBuf,
}

impl<'a> CommitResolver<'a> {
    /// Creates a resolver reading from `data_dir`.
    pub fn new(fs: &'a dyn FileSystem, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            data_dir: data_dir.into(),
        }
    }

    /// Creates a resolver for the directory named by `KO_DATA_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError::DataPathUnset`] if the variable is unset or empty.
    pub fn from_env(fs: &'a dyn FileSystem) -> Result<Self, CommitError> {
        let data_dir = data_dir_from(std::env::var(DATA_PATH_ENV).ok())?;
        Ok(Self::new(fs, data_dir))
    }

    /// Returns the 7-character short commit ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID cannot be read or is malformed.
    pub fn get(&self) -> Result<String, CommitError> {
        let mut id = self.get_full()?;
        id.truncate(SHORT_LEN);
        Ok(id)
    }

    /// Returns the full 40-character commit ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID cannot be read or is malformed.
    pub fn get_full(&self) -> Result<String, CommitError> {
        let head = self.read(Path::new(HEAD_FILE))?;
        let id = match head.strip_prefix(REF_PREFIX) {
            Some(target) => {
                debug!(ref_path = target, "following symbolic ref");
                self.read(&ref_path(target)?)?
            }
            None => head,
        };

        if COMMIT_ID.is_match(&id) {
            Ok(id)
        } else {
            Err(CommitError::InvalidCommitId(id))
        }
    }

    fn read(&self, relative: &Path) -> Result<String, CommitError> {
        let path = self.data_dir.join(relative);
        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|source| CommitError::Read { path, source })?;
        Ok(content.trim().to_string())
    }
}

/// Resolves a ref target against the data directory. A leading `/` is
/// dropped; `..` is refused.
fn ref_path(target: &str) -> Result<PathBuf, CommitError> {
    let mut path = PathBuf::new();
    for component in Path::new(target).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(CommitError::RefOutsideDataDir(target.to_string()));
            }
        }
    }
    Ok(path)
}

/// Validates a raw `KO_DATA_PATH` value.
fn data_dir_from(raw: Option<String>) -> Result<PathBuf, CommitError> {
    match raw {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Err(CommitError::DataPathUnset { var: DATA_PATH_ENV }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryFileSystem;

    const FULL: &str = "abc1234567890abcdef1234567890abcdef12345";

    fn resolver(fs: &InMemoryFileSystem) -> CommitResolver<'_> {
        CommitResolver::new(fs, "/kodata")
    }

    #[test]
    fn follows_one_symbolic_ref() {
        let fs = InMemoryFileSystem::new()
            .with_file("/kodata/HEAD", "ref: refs/heads/x\n")
            .with_file("/kodata/refs/heads/x", format!("{FULL}\n"));

        assert_eq!(resolver(&fs).get_full().unwrap(), FULL);
        assert_eq!(resolver(&fs).get().unwrap(), "abc1234");
    }

    #[test]
    fn reads_plain_hash() {
        let fs = InMemoryFileSystem::new().with_file("/kodata/HEAD", FULL);
        assert_eq!(resolver(&fs).get().unwrap(), &FULL[..7]);
    }

    #[test]
    fn rejects_39_characters() {
        let fs = InMemoryFileSystem::new()
            .with_file("/kodata/HEAD", &FULL[..39]);
        for result in [resolver(&fs).get(), resolver(&fs).get_full()] {
            let err = result.unwrap_err();
            assert!(err.to_string().contains("not a valid commit ID"), "{err}");
        }
    }

    #[test]
    fn rejects_uppercase_hex() {
        let fs = InMemoryFileSystem::new()
            .with_file("/kodata/HEAD", FULL.to_uppercase());
        let err = resolver(&fs).get_full().unwrap_err();
        assert!(matches!(err, CommitError::InvalidCommitId(ref id) if id == &FULL.to_uppercase()));
    }

    #[test]
    fn does_not_follow_a_second_ref() {
        let fs = InMemoryFileSystem::new()
            .with_file("/kodata/HEAD", "ref: refs/heads/x")
            .with_file("/kodata/refs/heads/x", "ref: refs/heads/y")
            .with_file("/kodata/refs/heads/y", FULL);

        let err = resolver(&fs).get_full().unwrap_err();
        assert!(matches!(err, CommitError::InvalidCommitId(_)));
    }

    #[test]
    fn missing_ref_target_is_a_read_error() {
        let fs = InMemoryFileSystem::new()
            .with_file("/kodata/HEAD", "ref: refs/heads/gone");
        let err = resolver(&fs).get().unwrap_err();
        match err {
            CommitError::Read { path, .. } => {
                assert_eq!(path, Path::new("/kodata/refs/heads/gone"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn absolute_ref_target_stays_inside_data_dir() {
        let outside = "0000000000000000000000000000000000000000";
        let fs = InMemoryFileSystem::new()
            .with_file("/kodata/HEAD", "ref: /elsewhere/x")
            .with_file("/elsewhere/x", outside)
            .with_file("/kodata/elsewhere/x", FULL);

        assert_eq!(resolver(&fs).get_full().unwrap(), FULL);
    }

    #[test]
    fn parent_dir_ref_target_is_refused() {
        let fs = InMemoryFileSystem::new()
            .with_file("/kodata/HEAD", "ref: ../elsewhere/x")
            .with_file("/elsewhere/x", FULL);

        let err = resolver(&fs).get_full().unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"../elsewhere/x\" points outside the data directory"
        );
    }

    #[test]
    fn missing_head_is_a_read_error() {
        let fs = InMemoryFileSystem::new();
        assert!(matches!(resolver(&fs).get_full(), Err(CommitError::Read { .. })));
    }

    #[test]
    fn unset_or_empty_data_path_is_rejected() {
        for raw in [None, Some(String::new())] {
            let err = data_dir_from(raw).unwrap_err();
            assert_eq!(
                err.to_string(),
                "\"KO_DATA_PATH\" does not exist or is empty"
            );
        }
        assert_eq!(
            data_dir_from(Some("/kodata".into())).unwrap(),
            PathBuf::from("/kodata")
        );
    }
}
