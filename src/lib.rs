//! issue-triage - failure-tolerant triage for incoming GitHub issues
//!
//! Decides whether a new issue duplicates an existing one, classifies it
//! into a label taxonomy via a model service, posts an acknowledgment
//! comment, and applies labels. Every stage is isolated: a failing
//! collaborator is logged and the pipeline advances, so each run always
//! produces a terminal summary.
//!
//! # Architecture
//!
//! - All external capabilities sit behind async traits in `adapters`
//! - The orchestrator owns the per-run summary; stages only append errors
//! - Any recorded stage error flips the run outcome to failure
//!
//! # Modules
//!
//! - `adapters`: collaborator traits + GitHub and model-service clients
//! - `core`: orchestration logic (Orchestrator, Retry)
//! - `domain`: data structures (Issue, Classification, Taxonomy, Summary)
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Triage one issue (title/body fetched from the tracker)
//! issue-triage triage --number 42 --owner octo --repo widgets
//!
//! # Inspect the taxonomy and resolved configuration
//! issue-triage labels
//! issue-triage config
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{DuplicateDetector, GitHubClient, IssueClassifier, IssueTracker, ModelClient};
pub use core::{RetryPolicy, TriageOrchestrator, TriageRequest, TriageSettings};
pub use domain::{
    Classification, ClassificationOutcome, DuplicateCandidate, Issue, IssueRef, LabelTaxonomy,
    Stage, WorkflowError, WorkflowSummary,
};
