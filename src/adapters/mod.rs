//! Adapter interfaces for external systems.
//!
//! Adapters provide a unified interface for the collaborators the
//! orchestrator calls: the issue tracker, the duplicate detector, and the
//! classification model. Each is a black box behind an async trait so the
//! orchestrator can be tested with mocks.

pub mod github;
pub mod model;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{
    Classification, ClassificationOutcome, DuplicateCandidate, Issue, IssueRef, LabelTaxonomy,
};

// Re-export the concrete clients
pub use github::GitHubClient;
pub use model::ModelClient;

/// Finds existing issues similar to a new one
#[async_trait]
pub trait DuplicateDetector: Send + Sync {
    /// Return candidate duplicates ordered by similarity (may be empty)
    async fn detect(&self, issue: &Issue) -> Result<Vec<DuplicateCandidate>>;
}

/// Classifies issues against the label taxonomy and drafts comments
#[async_trait]
pub trait IssueClassifier: Send + Sync {
    /// Classify an issue; failures may be reported in-band as
    /// [`ClassificationOutcome::Failed`]
    async fn classify(
        &self,
        issue: &Issue,
        taxonomy: &LabelTaxonomy,
    ) -> Result<ClassificationOutcome>;

    /// Generate the acknowledgment comment text for a classified issue
    async fn acknowledgment(
        &self,
        issue: &Issue,
        classification: &Classification,
    ) -> Result<String>;
}

/// Mutates issues on the external tracker.
///
/// All mutations are expected to be idempotent on the tracker side:
/// re-adding a label or re-posting an identical comment must be harmless.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch an issue's title/body/labels (used by CLI drivers)
    async fn fetch_issue(&self, issue_ref: &IssueRef) -> Result<Issue>;

    /// Post a comment; returns true when the comment was actually posted
    async fn post_comment(&self, issue_ref: &IssueRef, body: &str) -> Result<bool>;

    /// Apply labels to an issue
    async fn add_labels(&self, issue_ref: &IssueRef, labels: &[String]) -> Result<()>;

    /// Remove a single label; removing an absent label is not an error
    async fn remove_label(&self, issue_ref: &IssueRef, label: &str) -> Result<()>;
}
