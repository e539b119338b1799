//! `alerter close-issue` command.

use crate::cli::TrackerArgs;
use crate::tracker::IssueOperations;

/// Execute the `close-issue` command.
///
/// # Errors
///
/// Returns an error string if setup or the close call fails.
pub fn run(args: &TrackerArgs, number: u64) -> Result<(), String> {
    let handler = super::live_handler(args)?;
    handler.close_issue(number).map_err(|e| e.to_string())?;
    if handler.config().dry_run {
        println!("dry run: closed issue #{number}");
    } else {
        println!("closed issue #{number}");
    }
    Ok(())
}
