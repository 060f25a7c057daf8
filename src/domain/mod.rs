//! Domain types for the triage orchestrator.
//!
//! This module contains the core data structures:
//! - Issue: the unit of triage, plus duplicate candidates
//! - Classification: model output as a tagged result
//! - Taxonomy: the fixed set of valid labels
//! - Summary: per-run outcome aggregate and error log

pub mod classification;
pub mod issue;
pub mod summary;
pub mod taxonomy;

// Re-export commonly used types
pub use classification::{Classification, ClassificationOutcome};
pub use issue::{DuplicateCandidate, Issue, IssueRef};
pub use summary::{Stage, WorkflowError, WorkflowSummary};
pub use taxonomy::{LabelSpec, LabelTaxonomy};
