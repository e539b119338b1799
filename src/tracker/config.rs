//! Tracker configuration.

use std::path::Path;

use chrono::Duration;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::error::TrackerError;
use super::templates::Templates;
use crate::adapters::live::github::GITHUB_API_URL;
use crate::ports::RepoRef;

/// Label carried by every auto-generated performance issue.
pub const DEFAULT_LABEL: &str = "auto:perf";
/// Days an open issue may stay quiet before a new regression gets a comment.
pub const DEFAULT_STALENESS_DAYS: u32 = 10;

/// Which backend calls dry-run mode suppresses.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DryRunScope {
    /// Only state-changing calls are skipped; lookups still run.
    #[default]
    Mutations,
    /// Every backend call is skipped, so lookups find nothing.
    All,
}

/// Configuration for one tracker instance. Immutable once a handler is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Organization owning the repository.
    pub org: String,
    /// Repository issues are filed in.
    pub repo: String,
    /// Skip backend calls instead of performing them.
    pub dry_run: bool,
    /// Which calls `dry_run` skips.
    pub dry_run_scope: DryRunScope,
    /// Labels attached to, and required on, tracked issues.
    pub labels: Vec<String>,
    /// Quiet period after which an open issue receives a new comment.
    pub staleness_days: u32,
    /// Title, body and comment templates.
    pub templates: Templates,
    /// GitHub API base URL.
    pub api_base_url: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            org: String::new(),
            repo: String::new(),
            dry_run: false,
            dry_run_scope: DryRunScope::default(),
            labels: vec![DEFAULT_LABEL.to_string()],
            staleness_days: DEFAULT_STALENESS_DAYS,
            templates: Templates::default(),
            api_base_url: GITHUB_API_URL.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Creates a default configuration for `org/repo`.
    pub fn new(org: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
            ..Self::default()
        }
    }

    /// Enables dry-run mode with the given scope.
    #[must_use]
    pub fn with_dry_run(mut self, scope: DryRunScope) -> Self {
        self.dry_run = true;
        self.dry_run_scope = scope;
        self
    }

    /// Parses a YAML configuration. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Loads a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ConfigFile`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, TrackerError> {
        let file_error = |reason: String| TrackerError::ConfigFile {
            path: path.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| file_error(e.to_string()))?;
        Self::from_yaml(&content)
            .map_err(|e| file_error(e.to_string()))
    }

    /// The repository issues are filed in.
    #[must_use]
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(&self.org, &self.repo)
    }

    /// The staleness threshold as a duration.
    #[must_use]
    pub fn staleness_threshold(&self) -> Duration {
        Duration::days(i64::from(self.staleness_days))
    }

    /// Checks the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidConfig`] or [`TrackerError::Template`]
    /// describing the first problem found.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.org.trim().is_empty() {
            return Err(TrackerError::InvalidConfig("organization must not be empty".into()));
        }
        if self.repo.trim().is_empty() {
            return Err(TrackerError::InvalidConfig("repository must not be empty".into()));
        }
        if self.labels.is_empty() {
            return Err(TrackerError::InvalidConfig(
                "at least one tracking label is required".into(),
            ));
        }
        if self.labels.iter().any(|label| label.trim().is_empty()) {
            return Err(TrackerError::InvalidConfig("tracking labels must not be blank".into()));
        }
        if self.staleness_days == 0 {
            return Err(TrackerError::InvalidConfig("staleness_days must be positive".into()));
        }
        self.templates.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_track_auto_perf_for_ten_days() {
        let config = TrackerConfig::new("knative", "serving");
        assert_eq!(config.labels, ["auto:perf"]);
        assert_eq!(config.staleness_threshold(), Duration::days(10));
        assert!(!config.dry_run);
        assert_eq!(config.dry_run_scope, DryRunScope::Mutations);
        assert_eq!(config.api_base_url, "https://api.github.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_overrides_selected_fields() {
        let yaml = "\
org: knative
repo: eventing
dry_run: true
dry_run_scope: all
labels: ['auto:perf', area/perf]
templates:
  title: 'perf: {{ test_name }}'
";
        let config = TrackerConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.repo_ref(), RepoRef::new("knative", "eventing"));
        assert!(config.dry_run);
        assert_eq!(config.dry_run_scope, DryRunScope::All);
        assert_eq!(config.labels, ["auto:perf", "area/perf"]);
        assert_eq!(config.templates.title, "perf: {{ test_name }}");
        assert_eq!(config.templates.body, Templates::default().body);
        assert_eq!(config.staleness_days, 10);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerter.yaml");
        let yaml = "org: o\nrepo: r\nstaleness_days: 3\n";
        std::fs::write(&path, yaml).unwrap();

        let config = TrackerConfig::load(&path).unwrap();
        assert_eq!(config.staleness_threshold(), Duration::days(3));
    }

    #[test]
    fn load_reports_path_of_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = TrackerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing.yaml"), "{err}");
    }

    #[test]
    fn rejects_empty_org_or_repo() {
        assert!(matches!(
            TrackerConfig::new("", "r").validate(),
            Err(TrackerError::InvalidConfig(msg)) if msg.contains("organization")
        ));
        assert!(matches!(
            TrackerConfig::new("o", " ").validate(),
            Err(TrackerError::InvalidConfig(msg)) if msg.contains("repository")
        ));
    }

    #[test]
    fn rejects_missing_labels_and_zero_staleness() {
        let no_labels = TrackerConfig {
            labels: vec![],
            ..TrackerConfig::new("o", "r")
        };
        assert!(no_labels.validate().is_err());

        let blank = TrackerConfig {
            labels: vec!["auto:perf".into(), String::new()],
            ..TrackerConfig::new("o", "r")
        };
        assert!(blank.validate().is_err());

        let zero = TrackerConfig {
            staleness_days: 0,
            ..TrackerConfig::new("o", "r")
        };
        assert!(zero.validate().is_err());
    }
}
