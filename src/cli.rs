//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::tracker::DryRunScope;

/// Top-level CLI parser for `alerter`.
#[derive(Debug, Parser)]
#[command(
    name = "alerter",
    version,
    about = "Track performance regressions as GitHub issues"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by commands that talk to the issue tracker.
#[derive(Debug, Clone, Args)]
pub struct TrackerArgs {
    /// YAML tracker configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// GitHub organization (overrides the config file).
    #[arg(long, env = "ALERTER_ORG")]
    pub org: Option<String>,
    /// GitHub repository (overrides the config file).
    #[arg(long, env = "ALERTER_REPO")]
    pub repo: Option<String>,
    /// Log intended backend calls instead of making them.
    #[arg(long)]
    pub dry_run: bool,
    /// Which calls a dry run skips.
    #[arg(long, value_enum, value_name = "SCOPE")]
    pub dry_run_scope: Option<DryRunScope>,
    /// GitHub token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report a regression, creating, reopening or commenting on its issue.
    AddIssue {
        /// Tracker options.
        #[command(flatten)]
        tracker: TrackerArgs,
        /// Name of the regressing test.
        #[arg(long = "test", value_name = "NAME")]
        test_name: String,
        /// Description of the regression.
        #[arg(long, value_name = "TEXT")]
        description: String,
    },
    /// Close a tracked issue.
    CloseIssue {
        /// Tracker options.
        #[command(flatten)]
        tracker: TrackerArgs,
        /// Issue number.
        number: u64,
    },
    /// Print the commit ID from `$KO_DATA_PATH/HEAD`.
    Commit {
        /// Print all 40 characters instead of the short form.
        #[arg(long)]
        full: bool,
    },
}
