//! Workflow summary and structured error log.
//!
//! One summary exists per run. The orchestrator owns it exclusively;
//! stages only ever append errors, never read prior entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline stage names used for error attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Input validation before any collaborator call (fatal)
    Initialization,

    /// Duplicate candidate lookup
    DuplicateDetection,

    /// Posting the duplicate-notice comment
    DuplicateComment,

    /// Replacing pending-triage with the duplicate label
    DuplicateLabel,

    /// Model classification of the issue
    Classification,

    /// Applying taxonomy labels
    LabelAssignment,

    /// Generating/posting the acknowledgment comment
    Acknowledgment,

    /// Catch-all for anything escaping the orchestrator's guard
    Main,
}

impl Stage {
    /// Stage name as it appears in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialization => "initialization",
            Self::DuplicateDetection => "duplicate_detection",
            Self::DuplicateComment => "duplicate_comment",
            Self::DuplicateLabel => "duplicate_label",
            Self::Classification => "classification",
            Self::LabelAssignment => "label_assignment",
            Self::Acknowledgment => "acknowledgment",
            Self::Main => "main",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded stage failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowError {
    /// Stage the failure occurred in
    pub stage: Stage,

    /// Normalized failure detail (NO secrets)
    pub detail: String,

    /// Issue the failure relates to, when known
    pub issue_number: Option<u64>,

    /// When the failure was recorded
    pub timestamp: DateTime<Utc>,
}

/// Aggregate outcome of one triage run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSummary {
    /// Unique identifier for this run
    pub run_id: Uuid,

    /// Overall outcome; false as soon as any error is recorded
    pub success: bool,

    /// Issues processed in this run (always 1 for a single-issue run)
    pub total_processed: u32,

    /// Issues triaged without any recorded error
    pub success_count: u32,

    /// Issues that recorded at least one error
    pub failure_count: u32,

    /// Issues skipped before any stage ran
    pub skipped_count: u32,

    /// Failures in chronological order; entries are never removed
    pub errors: Vec<WorkflowError>,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finalized
    pub completed_at: Option<DateTime<Utc>>,

    /// Model tokens consumed across the run (if reported)
    pub model_tokens_used: Option<u64>,
}

impl WorkflowSummary {
    /// Create a summary with zeroed counters for a fresh run
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            success: false,
            total_processed: 1,
            success_count: 0,
            failure_count: 0,
            skipped_count: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
            model_tokens_used: None,
        }
    }

    /// Append one structured error entry.
    ///
    /// Never fails; any cause shape is normalized to its display form.
    pub fn log_error(
        &mut self,
        stage: Stage,
        cause: impl std::fmt::Display,
        issue_number: Option<u64>,
    ) {
        self.errors.push(WorkflowError {
            stage,
            detail: cause.to_string(),
            issue_number,
            timestamp: Utc::now(),
        });
    }

    /// Record model token usage, accumulating across calls
    pub fn record_tokens(&mut self, tokens: u64) {
        *self.model_tokens_used.get_or_insert(0) += tokens;
    }

    /// Finalize the run outcome.
    ///
    /// Any recorded error flips the run to failure, even when every stage
    /// completed its fallback behavior. Idempotent after the first call.
    pub fn finalize(&mut self) {
        if self.completed_at.is_some() {
            return;
        }

        if self.errors.is_empty() {
            self.success = true;
            self.success_count = 1;
        } else {
            self.success = false;
            self.failure_count = 1;
        }
        self.completed_at = Some(Utc::now());
    }

    /// Process exit code derived from the outcome
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }

    /// Render the human-readable report
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("Triage run {}\n", self.run_id));
        out.push_str(&format!(
            "  outcome: {}\n",
            if self.success { "success" } else { "failure" }
        ));
        out.push_str(&format!(
            "  processed: {} (ok: {}, failed: {}, skipped: {})\n",
            self.total_processed, self.success_count, self.failure_count, self.skipped_count
        ));

        if self.errors.is_empty() {
            out.push_str("  errors: none\n");
        } else {
            out.push_str(&format!("  errors: {}\n", self.errors.len()));
            for error in &self.errors {
                match error.issue_number {
                    Some(n) => {
                        out.push_str(&format!("    [{}] #{}: {}\n", error.stage, n, error.detail))
                    }
                    None => out.push_str(&format!("    [{}] {}\n", error.stage, error.detail)),
                }
            }
        }

        if let Some(tokens) = self.model_tokens_used {
            out.push_str(&format!("  model tokens used: {}\n", tokens));
        }

        out
    }
}

impl Default for WorkflowSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorkflowSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
