//! Issue identity and duplicate-candidate types.
//!
//! Issues are owned by the external tracker; the orchestrator only reads
//! title/body and mutates labels/comments through tracker calls.

use serde::{Deserialize, Serialize};

/// Address of an issue within an owner/repository pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueRef {
    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Issue number
    pub number: u64,
}

impl IssueRef {
    /// Create a new issue reference
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }
}

impl std::fmt::Display for IssueRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// An issue as seen by the triage pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Where the issue lives
    pub issue_ref: IssueRef,

    /// Issue title
    pub title: String,

    /// Issue body (may be empty)
    #[serde(default)]
    pub body: String,

    /// Labels currently applied
    #[serde(default)]
    pub labels: Vec<String>,

    /// Tracker state ("open", "closed")
    #[serde(default)]
    pub state: String,
}

impl Issue {
    /// Create an issue from the fields the pipeline needs
    pub fn new(issue_ref: IssueRef, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            issue_ref,
            title: title.into(),
            body: body.into(),
            labels: Vec::new(),
            state: "open".to_string(),
        }
    }
}

/// An existing issue judged similar to the one being triaged.
///
/// The similarity signal is produced by the duplicate detector and is
/// opaque to the orchestrator; a non-empty candidate list is what makes
/// the issue count as a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    /// Number of the candidate issue (same repository)
    pub number: u64,

    /// Title of the candidate issue
    pub title: String,

    /// Similarity score reported by the detector
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_ref_display() {
        let issue_ref = IssueRef::new("octo", "widgets", 42);
        assert_eq!(issue_ref.to_string(), "octo/widgets#42");
    }

    #[test]
    fn test_issue_defaults() {
        let issue = Issue::new(IssueRef::new("octo", "widgets", 1), "Crash", "");
        assert!(issue.labels.is_empty());
        assert_eq!(issue.state, "open");
    }
}
