//! Label taxonomy definitions and loading.
//!
//! The taxonomy is defined in YAML, loaded once at process start, and
//! read-only for the duration of a run. Recommended labels are validated
//! against it before anything is applied to the tracker.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::classification::Classification;

/// The fixed set of valid labels and their semantics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelTaxonomy {
    /// Canonical label name -> metadata
    pub labels: BTreeMap<String, LabelSpec>,
}

/// Metadata for a single taxonomy label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSpec {
    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Mutual-exclusion group: at most one label per group may be applied
    #[serde(default)]
    pub group: Option<String>,
}

impl LabelTaxonomy {
    /// Load a taxonomy from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read taxonomy file: {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse a taxonomy from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        let taxonomy: Self =
            serde_yaml::from_str(content).context("Failed to parse taxonomy YAML")?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// Validate the taxonomy definition
    pub fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            anyhow::bail!("Taxonomy must define at least one label");
        }

        for name in self.labels.keys() {
            if name.trim().is_empty() {
                anyhow::bail!("Taxonomy contains an empty label name");
            }
        }

        Ok(())
    }

    /// Check whether a label exists in the taxonomy
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }

    /// Filter a classification's recommended labels down to the set that
    /// may actually be applied.
    ///
    /// Unknown labels are dropped. Within a mutual-exclusion group only the
    /// highest-confidence recommendation survives; ties keep the label the
    /// model ranked first. Recommendation order is otherwise preserved.
    pub fn filter(&self, classification: &Classification) -> Vec<String> {
        let mut kept: Vec<String> = Vec::new();

        for label in &classification.labels {
            let Some(spec) = self.labels.get(label) else {
                continue;
            };

            if kept.contains(label) {
                continue;
            }

            if let Some(ref group) = spec.group {
                // Existing group member: keep whichever scores higher
                let rival = kept.iter().position(|k| {
                    self.labels
                        .get(k)
                        .and_then(|s| s.group.as_ref())
                        .is_some_and(|g| g == group)
                });

                if let Some(idx) = rival {
                    if classification.confidence_for(label)
                        > classification.confidence_for(&kept[idx])
                    {
                        kept[idx] = label.clone();
                    }
                    continue;
                }
            }

            kept.push(label.clone());
        }

        kept
    }
}
