//! Core library entry for the `alerter` CLI.
//!
//! [`tracker`] keeps one GitHub issue per regressing test;
//! [`changeset`] reports the commit a build came from.

pub mod adapters;
pub mod changeset;
pub mod cli;
pub mod commands;
pub mod context;
pub mod logging;
pub mod ports;
pub mod tracker;

use clap::Parser;

pub use tracker::{setup, AddOutcome, IssueHandler, IssueOperations, TrackerConfig, TrackerError};

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    logging::init(cli.verbose);
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["alerter", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_rejects_invalid_issue_number() {
        let err = run(["alerter", "close-issue", "not-a-number"]).unwrap_err();
        assert!(err.contains("invalid value"), "{err}");
    }
}
