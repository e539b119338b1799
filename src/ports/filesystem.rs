//! Filesystem port for reading build metadata.

use std::path::Path;

/// Provides read access to files baked into the build output.
///
/// Abstracting the filesystem lets the commit resolver run in tests
/// without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;
}
