//! Live adapter for the `IssueBackend` port using the GitHub REST API v3.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ports::{BackendError, IssueBackend, IssueComment, IssueState, RepoRef, TrackedIssue};

/// Default base URL for the public GitHub API.
pub const GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "alerter";
/// Largest page GitHub serves; lookup makes a single pass.
const PER_PAGE: &str = "100";

/// Blocking GitHub issue backend.
#[derive(Debug, Clone)]
pub struct GitHubBackend {
    http: Client,
    base_url: String,
}

impl GitHubBackend {
    /// Creates a backend authenticated with `token` against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(token: &str, base_url: &str) -> Result<Self, BackendError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| BackendError::Transport(format!("invalid token: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn issues_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}/issues", self.base_url, repo.org, repo.repo)
    }

    fn issue_url(&self, repo: &RepoRef, number: u64) -> String {
        format!("{}/{number}", self.issues_url(repo))
    }

    fn set_state(
        &self,
        repo: &RepoRef,
        number: u64,
        state: IssueState,
    ) -> Result<(), BackendError> {
        let url = self.issue_url(repo, number);
        debug!(%url, %state, "updating issue state");
        let _: IgnoredAny = send(self.http.patch(&url).json(&StateRequest { state }))?;
        Ok(())
    }
}

/// Sends a request and decodes a successful JSON response.
fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, BackendError> {
    let response = request
        .send()
        .map_err(|e| BackendError::Transport(e.to_string()))?;
    let status = response.status();
    let text = response
        .text()
        .map_err(|e| BackendError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text)
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// An issue payload returned by GitHub.
#[derive(Debug, Deserialize)]
struct GitHubIssue {
    number: u64,
    title: String,
    state: IssueState,
    updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    labels: Vec<GitHubLabel>,
    /// Present when the item is a pull request rather than an issue.
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

impl From<GitHubIssue> for TrackedIssue {
    fn from(issue: GitHubIssue) -> Self {
        Self {
            number: issue.number,
            title: issue.title,
            state: issue.state,
            updated_at: issue.updated_at,
            labels: issue.labels.into_iter().map(|label| label.name).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GitHubComment {
    id: u64,
    #[serde(default)]
    body: String,
}

#[derive(Serialize)]
struct CreateIssueRequest<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct LabelsRequest<'a> {
    labels: &'a [String],
}

#[derive(Serialize)]
struct StateRequest {
    state: IssueState,
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

impl IssueBackend for GitHubBackend {
    fn list_issues(
        &self,
        repo: &RepoRef,
        labels: &[String],
    ) -> Result<Vec<TrackedIssue>, BackendError> {
        let url = self.issues_url(repo);
        let labels = labels.join(",");
        debug!(%url, %labels, "listing issues");

        let query = [
            ("state", "all"),
            ("labels", labels.as_str()),
            ("per_page", PER_PAGE),
        ];
        let issues: Vec<GitHubIssue> = send(self.http.get(&url).query(&query))?;

        Ok(issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .map(TrackedIssue::from)
            .collect())
    }

    fn create_issue(
        &self,
        repo: &RepoRef,
        title: &str,
        body: &str,
    ) -> Result<TrackedIssue, BackendError> {
        let url = self.issues_url(repo);
        debug!(%url, title, "creating issue");
        let request = CreateIssueRequest { title, body };
        let issue: GitHubIssue = send(self.http.post(&url).json(&request))?;
        Ok(issue.into())
    }

    fn add_labels(
        &self,
        repo: &RepoRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), BackendError> {
        let url = format!("{}/labels", self.issue_url(repo, number));
        debug!(%url, ?labels, "adding labels");
        let _: IgnoredAny = send(self.http.post(&url).json(&LabelsRequest { labels }))?;
        Ok(())
    }

    fn close_issue(&self, repo: &RepoRef, number: u64) -> Result<(), BackendError> {
        self.set_state(repo, number, IssueState::Closed)
    }

    fn reopen_issue(&self, repo: &RepoRef, number: u64) -> Result<(), BackendError> {
        self.set_state(repo, number, IssueState::Open)
    }

    fn create_comment(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<IssueComment, BackendError> {
        let url = format!("{}/comments", self.issue_url(repo, number));
        debug!(%url, "creating comment");
        let comment: GitHubComment = send(self.http.post(&url).json(&CommentRequest { body }))?;
        Ok(IssueComment {
            id: comment.id,
            body: comment.body,
        })
    }
}
