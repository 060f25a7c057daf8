//! Main orchestrator for the triage workflow.
//!
//! Sequences duplicate detection, classification, acknowledgment, and
//! label assignment for one issue, isolating each stage's failures so a
//! single collaborator outage never aborts the run.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::adapters::{DuplicateDetector, IssueClassifier, IssueTracker};
use crate::domain::{
    Classification, ClassificationOutcome, DuplicateCandidate, Issue, IssueRef, LabelTaxonomy,
    Stage, WorkflowSummary,
};

use super::retry::{with_retry, RetryPolicy};

/// Inputs for one triage run, validated before any collaborator call
#[derive(Debug, Clone)]
pub struct TriageRequest {
    /// Issue number (must be positive)
    pub number: u64,

    /// Issue title
    pub title: String,

    /// Issue body (may be empty)
    pub body: String,

    /// Repository owner
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Access credential for the tracker
    pub credential: String,
}

impl TriageRequest {
    /// Validate required inputs
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.number == 0 {
            return Err(RequestError::MissingIssueNumber);
        }
        if self.title.trim().is_empty() {
            return Err(RequestError::MissingField("title"));
        }
        if self.owner.trim().is_empty() {
            return Err(RequestError::MissingField("owner"));
        }
        if self.repo.trim().is_empty() {
            return Err(RequestError::MissingField("repo"));
        }
        if self.credential.trim().is_empty() {
            return Err(RequestError::MissingField("credential"));
        }
        Ok(())
    }

    fn issue_ref(&self) -> IssueRef {
        IssueRef::new(self.owner.clone(), self.repo.clone(), self.number)
    }
}

/// A required input is missing or invalid
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("issue number must be a positive integer")]
    MissingIssueNumber,

    #[error("required input '{0}' is missing or empty")]
    MissingField(&'static str),
}

/// Label and comment-text settings for the workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageSettings {
    /// Retry policy for network-bound tracker calls
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Placeholder label removed once triage resolves
    #[serde(default = "default_pending_label")]
    pub pending_label: String,

    /// Label applied when an issue is marked as a duplicate
    #[serde(default = "default_duplicate_label")]
    pub duplicate_label: String,

    /// Acknowledgment text used when comment generation fails
    #[serde(default = "default_fallback_comment")]
    pub fallback_comment: String,
}

fn default_pending_label() -> String {
    "pending-triage".to_string()
}

fn default_duplicate_label() -> String {
    "duplicate".to_string()
}

fn default_fallback_comment() -> String {
    "Thanks for the report! A maintainer will take a look shortly.".to_string()
}

impl Default for TriageSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            pending_label: default_pending_label(),
            duplicate_label: default_duplicate_label(),
            fallback_comment: default_fallback_comment(),
        }
    }
}

/// The triage workflow engine
pub struct TriageOrchestrator<'a> {
    duplicates: &'a dyn DuplicateDetector,
    classifier: &'a dyn IssueClassifier,
    tracker: &'a dyn IssueTracker,
    taxonomy: &'a LabelTaxonomy,
    settings: TriageSettings,
}

impl<'a> TriageOrchestrator<'a> {
    /// Create an orchestrator over the given collaborators
    pub fn new(
        duplicates: &'a dyn DuplicateDetector,
        classifier: &'a dyn IssueClassifier,
        tracker: &'a dyn IssueTracker,
        taxonomy: &'a LabelTaxonomy,
        settings: TriageSettings,
    ) -> Self {
        Self {
            duplicates,
            classifier,
            tracker,
            taxonomy,
            settings,
        }
    }

    /// Run the full pipeline exactly once for one issue.
    ///
    /// Always returns a finalized summary: stage failures are recorded and
    /// the pipeline advances; only missing inputs stop it before any
    /// collaborator is invoked.
    #[instrument(skip(self, request), fields(issue = request.number, repo = %request.repo))]
    pub async fn run(&self, request: &TriageRequest) -> WorkflowSummary {
        let mut summary = WorkflowSummary::new();
        info!(run_id = %summary.run_id, "Starting triage run");

        if let Err(e) = request.validate() {
            error!(error = %e, "Invalid triage request");
            let number = (request.number > 0).then_some(request.number);
            summary.log_error(Stage::Initialization, e, number);
            summary.finalize();
            return summary;
        }

        // Top-level guard: anything escaping the stages is still reported
        if let Err(e) = self.triage(request, &mut summary).await {
            error!(error = %e, "Triage pipeline failed");
            summary.log_error(Stage::Main, e, Some(request.number));
        }

        summary.finalize();
        summary
    }

    /// Execute the stages behind the top-level guard
    async fn triage(&self, request: &TriageRequest, summary: &mut WorkflowSummary) -> Result<()> {
        let issue_ref = request.issue_ref();
        let issue = Issue::new(issue_ref.clone(), &request.title, &request.body);

        // Detector failure must not block triage; treat as no duplicates
        let candidates = match self.duplicates.detect(&issue).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Duplicate detection failed, continuing without candidates");
                summary.log_error(Stage::DuplicateDetection, e, Some(issue_ref.number));
                Vec::new()
            }
        };

        if !candidates.is_empty() {
            info!(count = candidates.len(), "Duplicate candidates found");
            if self.handle_duplicate(&issue_ref, &candidates, summary).await {
                // Notice posted: classification and labeling are skipped
                return Ok(());
            }
        }

        self.classify_and_label(&issue, summary).await;
        Ok(())
    }

    /// Duplicate path: post the notice and swap in the duplicate label.
    ///
    /// Returns true only when the notice actually posted; a failed post
    /// falls through to the classification path.
    async fn handle_duplicate(
        &self,
        issue_ref: &IssueRef,
        candidates: &[DuplicateCandidate],
        summary: &mut WorkflowSummary,
    ) -> bool {
        let notice = duplicate_notice(candidates);
        let number = issue_ref.number;

        let tracker = self.tracker;
        let notice_text = notice.as_str();
        let posted = with_retry(&self.settings.retry, "duplicate comment", move || {
            tracker.post_comment(issue_ref, notice_text)
        })
        .await;

        match posted {
            Ok(true) => {}
            Ok(false) => {
                summary.log_error(
                    Stage::DuplicateComment,
                    "duplicate notice was not posted",
                    Some(number),
                );
                return false;
            }
            Err(e) => {
                summary.log_error(Stage::DuplicateComment, e, Some(number));
                return false;
            }
        }

        // Replace the placeholder with the duplicate label
        let dup_label = std::slice::from_ref(&self.settings.duplicate_label);
        let pending = self.settings.pending_label.as_str();
        let relabeled = with_retry(&self.settings.retry, "duplicate label", move || async move {
            tracker.add_labels(issue_ref, dup_label).await?;
            tracker.remove_label(issue_ref, pending).await
        })
        .await;

        if let Err(e) = relabeled {
            summary.log_error(Stage::DuplicateLabel, e, Some(number));
        }

        true
    }

    /// Classification path: classify, acknowledge, and apply labels
    async fn classify_and_label(&self, issue: &Issue, summary: &mut WorkflowSummary) {
        let number = issue.issue_ref.number;

        let outcome = match self.classifier.classify(issue, self.taxonomy).await {
            Ok(outcome) => outcome,
            Err(e) => ClassificationOutcome::Failed {
                reason: e.to_string(),
            },
        };

        let classification = match &outcome {
            ClassificationOutcome::Classified(c) => {
                if let Some(tokens) = c.tokens_used {
                    summary.record_tokens(tokens);
                }
                Some(c)
            }
            ClassificationOutcome::Failed { reason } => {
                warn!(reason = %reason, "Classification failed, falling back to manual triage");
                summary.log_error(Stage::Classification, reason, Some(number));
                None
            }
        };

        self.acknowledge(issue, classification, summary).await;

        let labels = classification
            .map(|c| self.taxonomy.filter(c))
            .unwrap_or_default();

        if labels.is_empty() {
            info!("No labels to apply, leaving issue for manual triage");
            return;
        }

        let tracker = self.tracker;
        let issue_ref = &issue.issue_ref;
        let to_apply = labels.as_slice();
        let pending = self.settings.pending_label.as_str();
        let assigned = with_retry(&self.settings.retry, "label assignment", move || async move {
            tracker.add_labels(issue_ref, to_apply).await?;
            tracker.remove_label(issue_ref, pending).await
        })
        .await;

        match assigned {
            Ok(()) => info!(labels = ?labels, "Labels applied"),
            Err(e) => summary.log_error(Stage::LabelAssignment, e, Some(number)),
        }
    }

    /// Post an acknowledgment comment, generated or fallback.
    ///
    /// The user always receives an acknowledgment: generation failures are
    /// recorded and replaced with the fixed fallback text.
    async fn acknowledge(
        &self,
        issue: &Issue,
        classification: Option<&Classification>,
        summary: &mut WorkflowSummary,
    ) {
        let number = issue.issue_ref.number;

        let text = match classification {
            Some(c) => match self.classifier.acknowledgment(issue, c).await {
                Ok(text) => text,
                Err(e) => {
                    summary.log_error(
                        Stage::Acknowledgment,
                        format!("comment generation failed: {}", e),
                        Some(number),
                    );
                    self.settings.fallback_comment.clone()
                }
            },
            None => self.settings.fallback_comment.clone(),
        };

        let tracker = self.tracker;
        let issue_ref = &issue.issue_ref;
        let comment = text.as_str();
        let posted = with_retry(&self.settings.retry, "acknowledgment comment", move || {
            tracker.post_comment(issue_ref, comment)
        })
        .await;

        match posted {
            Ok(true) => {}
            Ok(false) => summary.log_error(
                Stage::Acknowledgment,
                "acknowledgment comment was not posted",
                Some(number),
            ),
            Err(e) => summary.log_error(Stage::Acknowledgment, e, Some(number)),
        }
    }
}

/// Render the duplicate-notice comment body
fn duplicate_notice(candidates: &[DuplicateCandidate]) -> String {
    let mut body =
        String::from("This issue looks like a duplicate of the following existing issue(s):\n");

    for candidate in candidates {
        body.push_str(&format!("- #{} {}\n", candidate.number, candidate.title));
    }

    body.push_str(
        "\nIf none of these match your problem, please leave a comment and we will take another look.",
    );
    body
}
