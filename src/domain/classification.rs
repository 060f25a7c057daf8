//! Classification payloads returned by the model service.
//!
//! The service reports failures in-band alongside otherwise-valid fields,
//! so the outcome is modeled as a tagged result: consumers can never read
//! label data out of a failed classification.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A successful classification of one issue against the label taxonomy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Recommended labels, in the order the model ranked them (may be empty)
    pub labels: Vec<String>,

    /// Per-label confidence in `[0.0, 1.0]`
    #[serde(default)]
    pub confidence: HashMap<String, f64>,

    /// Free-text reasoning from the model
    #[serde(default)]
    pub reasoning: String,

    /// Tokens consumed by the model call (if reported)
    #[serde(default)]
    pub tokens_used: Option<u64>,
}

impl Classification {
    /// Confidence for a label, defaulting to zero when the model
    /// recommended it without a score
    pub fn confidence_for(&self, label: &str) -> f64 {
        self.confidence.get(label).copied().unwrap_or(0.0)
    }
}

/// Result of a classification attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    /// The model produced a usable classification
    Classified(Classification),

    /// The model responded but flagged the attempt as failed
    Failed {
        /// Reason reported by the service
        reason: String,
    },
}

impl ClassificationOutcome {
    /// Returns the classification if this outcome is usable
    pub fn classification(&self) -> Option<&Classification> {
        match self {
            Self::Classified(c) => Some(c),
            Self::Failed { .. } => None,
        }
    }
}
