//! Triage model service client.
//!
//! Talks to the classification/comment service over HTTP with bearer-token
//! auth. The service exposes three routes:
//!   POST /duplicates  - candidate duplicate lookup
//!   POST /classify    - label classification
//!   POST /comment     - acknowledgment comment drafting
//!
//! Classification responses carry an optional in-band `error` field, which
//! maps to [`ClassificationOutcome::Failed`] so stale label data is never
//! read after a failure.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Classification, ClassificationOutcome, DuplicateCandidate, Issue, LabelTaxonomy,
};

use super::{DuplicateDetector, IssueClassifier};

/// Client for the triage model service
pub struct ModelClient {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

/// Issue context sent with every request
#[derive(Debug, Serialize)]
struct IssuePayload<'a> {
    owner: &'a str,
    repo: &'a str,
    number: u64,
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    #[serde(flatten)]
    issue: IssuePayload<'a>,
    /// Valid label names the model may choose from
    labels: Vec<&'a str>,
}

/// Classification response with the service's in-band error field
#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    confidence: HashMap<String, f64>,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    tokens_used: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DuplicatesResponse {
    #[serde(default)]
    candidates: Vec<DuplicateCandidate>,
}

#[derive(Debug, Serialize)]
struct CommentRequest<'a> {
    #[serde(flatten)]
    issue: IssuePayload<'a>,
    classification: &'a Classification,
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    comment: String,
}

impl ModelClient {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn route(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }

    fn issue_payload(issue: &Issue) -> IssuePayload<'_> {
        IssuePayload {
            owner: &issue.issue_ref.owner,
            repo: &issue.issue_ref.repo,
            number: issue.issue_ref.number,
            title: &issue.title,
            body: &issue.body,
        }
    }

    async fn post<Req, Resp>(&self, path: &str, payload: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.route(path))
            .header("Authorization", format!("Bearer {}", self.token))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to reach model service at {}", path))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Model service error ({}): {}", status, text);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse model service response from {}", path))
    }
}

#[async_trait]
impl DuplicateDetector for ModelClient {
    async fn detect(&self, issue: &Issue) -> Result<Vec<DuplicateCandidate>> {
        let response: DuplicatesResponse = self
            .post("/duplicates", &Self::issue_payload(issue))
            .await?;
        Ok(response.candidates)
    }
}

#[async_trait]
impl IssueClassifier for ModelClient {
    async fn classify(
        &self,
        issue: &Issue,
        taxonomy: &LabelTaxonomy,
    ) -> Result<ClassificationOutcome> {
        let request = ClassifyRequest {
            issue: Self::issue_payload(issue),
            labels: taxonomy.labels.keys().map(|k| k.as_str()).collect(),
        };

        let response: ClassifyResponse = self.post("/classify", &request).await?;

        if let Some(error) = response.error {
            return Ok(ClassificationOutcome::Failed { reason: error });
        }

        Ok(ClassificationOutcome::Classified(Classification {
            labels: response.labels,
            confidence: response.confidence,
            reasoning: response.reasoning,
            tokens_used: response.tokens_used,
        }))
    }

    async fn acknowledgment(
        &self,
        issue: &Issue,
        classification: &Classification,
    ) -> Result<String> {
        let request = CommentRequest {
            issue: Self::issue_payload(issue),
            classification,
        };

        let response: CommentResponse = self.post("/comment", &request).await?;
        Ok(response.comment)
    }
}
