//! Command dispatch and handlers.

pub mod add_issue;
pub mod close_issue;
pub mod commit;

use crate::cli::{Command, TrackerArgs};
use crate::tracker::{self, IssueHandler, TrackerConfig};

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::AddIssue {
            tracker,
            test_name,
            description,
        } => add_issue::run(tracker, test_name, description),
        Command::CloseIssue { tracker, number } => close_issue::run(tracker, *number),
        Command::Commit { full } => commit::run(*full),
    }
}

/// Builds the tracker configuration: file (or defaults), then flag overrides.
///
/// # Errors
///
/// Returns an error string if the configuration file cannot be loaded.
pub fn tracker_config(args: &TrackerArgs) -> Result<TrackerConfig, String> {
    let mut config = match &args.config {
        Some(path) => TrackerConfig::load(path).map_err(|e| e.to_string())?,
        None => TrackerConfig::default(),
    };
    if let Some(org) = &args.org {
        config.org.clone_from(org);
    }
    if let Some(repo) = &args.repo {
        config.repo.clone_from(repo);
    }
    if args.dry_run {
        config.dry_run = true;
    }
    if let Some(scope) = args.dry_run_scope {
        config.dry_run_scope = scope;
    }
    Ok(config)
}

/// Authenticates and builds a live handler from CLI options.
fn live_handler(args: &TrackerArgs) -> Result<IssueHandler, String> {
    let config = tracker_config(args)?;
    let token = args.github_token.as_deref().unwrap_or_default();
    tracker::setup(token, config).map_err(|e| e.to_string())
}
