//! `alerter add-issue` command.

use crate::cli::TrackerArgs;
use crate::tracker::IssueOperations;

/// Execute the `add-issue` command.
///
/// # Errors
///
/// Returns an error string if setup or any backend call fails.
pub fn run(args: &TrackerArgs, test_name: &str, description: &str) -> Result<(), String> {
    let handler = super::live_handler(args)?;
    let line = execute(&handler, handler.config().dry_run, test_name, description)?;
    println!("{line}");
    Ok(())
}

/// Reports a regression and describes what happened.
///
/// # Errors
///
/// Returns an error string if the report fails.
pub fn execute(
    ops: &dyn IssueOperations,
    dry_run: bool,
    test_name: &str,
    description: &str,
) -> Result<String, String> {
    let outcome = ops
        .add_issue(test_name, description)
        .map_err(|e| e.to_string())?;
    if dry_run {
        Ok(format!("dry run: {outcome}"))
    } else {
        Ok(outcome.to_string())
    }
}
