//! GitHub REST client for issue comments and labels.
//!
//! Implements the tracker side of the workflow: posting comments and
//! mutating labels. Mutations are idempotent from the orchestrator's
//! point of view (re-adding a label is a no-op on GitHub's side, and
//! removing an absent label is treated as already removed).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::{Issue, IssueRef};

use super::IssueTracker;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("issue-triage/", env!("CARGO_PKG_VERSION"));

/// GitHub REST API client
pub struct GitHubClient {
    /// API base URL (overridable for tests)
    base_url: String,
    /// Access token
    token: String,
    /// HTTP client
    client: reqwest::Client,
}

/// Issue payload from GET /repos/{owner}/{repo}/issues/{number}
#[derive(Debug, Deserialize)]
struct IssueResponse {
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    labels: Vec<LabelResponse>,
    state: String,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    name: String,
}

impl GitHubClient {
    /// Create a client against the public GitHub API
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, token)
    }

    /// Create a client against a custom API base (GitHub Enterprise, tests)
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build an issue-scoped API URL
    fn issue_url(&self, issue_ref: &IssueRef, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}{}",
            self.base_url, issue_ref.owner, issue_ref.repo, issue_ref.number, suffix
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn fetch_issue(&self, issue_ref: &IssueRef) -> Result<Issue> {
        let url = self.issue_url(issue_ref, "");

        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("Failed to fetch issue {}", issue_ref))?;

        if !response.status().is_success() {
            anyhow::bail!("GitHub returned {} for {}", response.status(), issue_ref);
        }

        let payload: IssueResponse = response
            .json()
            .await
            .context("Failed to parse issue response")?;

        Ok(Issue {
            issue_ref: IssueRef::new(
                issue_ref.owner.clone(),
                issue_ref.repo.clone(),
                payload.number,
            ),
            title: payload.title,
            body: payload.body.unwrap_or_default(),
            labels: payload.labels.into_iter().map(|l| l.name).collect(),
            state: payload.state,
        })
    }

    async fn post_comment(&self, issue_ref: &IssueRef, body: &str) -> Result<bool> {
        let url = self.issue_url(issue_ref, "/comments");

        let response = self
            .request(self.client.post(&url))
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .with_context(|| format!("Failed to post comment on {}", issue_ref))?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub comment error ({}): {}", status, text)
        }
    }

    async fn add_labels(&self, issue_ref: &IssueRef, labels: &[String]) -> Result<()> {
        let url = self.issue_url(issue_ref, "/labels");

        let response = self
            .request(self.client.post(&url))
            .json(&serde_json::json!({ "labels": labels }))
            .send()
            .await
            .with_context(|| format!("Failed to add labels on {}", issue_ref))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub label error ({}): {}", status, text)
        }
    }

    async fn remove_label(&self, issue_ref: &IssueRef, label: &str) -> Result<()> {
        // Label names may carry spaces or slashes ("good first issue")
        let url = self.issue_url(issue_ref, &format!("/labels/{}", urlencoding::encode(label)));

        let response = self
            .request(self.client.delete(&url))
            .send()
            .await
            .with_context(|| format!("Failed to remove label on {}", issue_ref))?;

        let status = response.status();
        // 404 means the label was never there, which is fine
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub label removal error ({}): {}", status, text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_url() {
        let client = GitHubClient::new("TOKEN");
        let issue_ref = IssueRef::new("octo", "widgets", 42);

        assert_eq!(
            client.issue_url(&issue_ref, "/comments"),
            "https://api.github.com/repos/octo/widgets/issues/42/comments"
        );
    }

    #[test]
    fn test_label_path_segment_is_encoded() {
        let client = GitHubClient::new("TOKEN");
        let issue_ref = IssueRef::new("octo", "widgets", 42);

        let url = client.issue_url(
            &issue_ref,
            &format!("/labels/{}", urlencoding::encode("good first issue")),
        );
        assert_eq!(
            url,
            "https://api.github.com/repos/octo/widgets/issues/42/labels/good%20first%20issue"
        );

        let url = client.issue_url(
            &issue_ref,
            &format!("/labels/{}", urlencoding::encode("area/parser")),
        );
        assert!(url.ends_with("/labels/area%2Fparser"));
    }

    #[test]
    fn test_custom_base_url() {
        let client = GitHubClient::with_base_url("http://localhost:8080", "TOKEN");
        let issue_ref = IssueRef::new("octo", "widgets", 1);

        assert_eq!(
            client.issue_url(&issue_ref, ""),
            "http://localhost:8080/repos/octo/widgets/issues/1"
        );
    }
}
