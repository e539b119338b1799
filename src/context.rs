//! Service context bundling the port trait objects the tracker needs.

use crate::adapters::live::{GitHubBackend, LiveClock};
use crate::ports::{BackendError, Clock, IssueBackend};

/// Bundles port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations.
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Issue backend.
    pub issues: Box<dyn IssueBackend>,
}

impl ServiceContext {
    /// Creates a live context talking to GitHub at `api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the GitHub client cannot be built from `token`.
    pub fn live(token: &str, api_base_url: &str) -> Result<Self, BackendError> {
        Ok(Self {
            clock: Box::new(LiveClock),
            issues: Box::new(GitHubBackend::new(token, api_base_url)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::github::GITHUB_API_URL;

    #[test]
    fn live_context_rejects_malformed_token() {
        assert!(ServiceContext::live("a\nb", GITHUB_API_URL).is_err());
    }

    #[test]
    fn live_context_builds_with_a_token() {
        assert!(ServiceContext::live("token", GITHUB_API_URL).is_ok());
    }
}
