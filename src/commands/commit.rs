//! `alerter commit` command.

use crate::adapters::live::LiveFileSystem;
use crate::changeset::CommitResolver;

/// Execute the `commit` command.
///
/// # Errors
///
/// Returns an error string if the commit ID cannot be resolved.
pub fn run(full: bool) -> Result<(), String> {
    let resolver = CommitResolver::from_env(&LiveFileSystem)
        .map_err(|e| e.to_string())?;
    println!("{}", resolve(&resolver, full)?);
    Ok(())
}

/// Returns the short or full commit ID.
///
/// # Errors
///
/// Returns an error string if the commit ID cannot be resolved.
pub fn resolve(resolver: &CommitResolver<'_>, full: bool) -> Result<String, String> {
    let id = if full {
        resolver.get_full()
    } else {
        resolver.get()
    };
    id.map_err(|e| e.to_string())
}
