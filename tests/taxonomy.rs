//! Label Taxonomy Integration Tests
//!
//! YAML loading and recommendation filtering against the taxonomy.

use std::collections::HashMap;

use issue_triage::domain::{Classification, LabelTaxonomy};

const TAXONOMY_YAML: &str = r#"
labels:
  bug:
    description: Something is broken
  feature:
    description: New functionality
  docs:
    description: Documentation only
  p1:
    description: High priority
    group: priority
  p2:
    description: Normal priority
    group: priority
  p3:
    description: Low priority
    group: priority
"#;

fn classification(labels: &[&str], confidence: &[(&str, f64)]) -> Classification {
    Classification {
        labels: labels.iter().map(|l| l.to_string()).collect(),
        confidence: confidence
            .iter()
            .map(|(l, c)| (l.to_string(), *c))
            .collect::<HashMap<_, _>>(),
        reasoning: String::new(),
        tokens_used: None,
    }
}

#[test]
fn test_yaml_loading() {
    let taxonomy = LabelTaxonomy::from_yaml(TAXONOMY_YAML).unwrap();

    assert_eq!(taxonomy.labels.len(), 6);
    assert!(taxonomy.contains("docs"));
    assert_eq!(
        taxonomy.labels.get("p1").unwrap().group.as_deref(),
        Some("priority")
    );
}

#[test]
fn test_malformed_yaml_is_rejected() {
    assert!(LabelTaxonomy::from_yaml("labels: [not, a, map]").is_err());
    assert!(LabelTaxonomy::from_yaml("").is_err());
}

#[test]
fn test_filter_preserves_recommendation_order() {
    let taxonomy = LabelTaxonomy::from_yaml(TAXONOMY_YAML).unwrap();
    let c = classification(&["docs", "bug", "feature"], &[]);

    assert_eq!(taxonomy.filter(&c), vec!["docs", "bug", "feature"]);
}

#[test]
fn test_filter_empty_recommendations() {
    let taxonomy = LabelTaxonomy::from_yaml(TAXONOMY_YAML).unwrap();
    let c = classification(&[], &[]);

    assert!(taxonomy.filter(&c).is_empty());
}

#[test]
fn test_filter_deduplicates() {
    let taxonomy = LabelTaxonomy::from_yaml(TAXONOMY_YAML).unwrap();
    let c = classification(&["bug", "bug", "docs"], &[]);

    assert_eq!(taxonomy.filter(&c), vec!["bug", "docs"]);
}

#[test]
fn test_filter_resolves_three_way_group_conflict() {
    let taxonomy = LabelTaxonomy::from_yaml(TAXONOMY_YAML).unwrap();
    let c = classification(
        &["p3", "p1", "p2"],
        &[("p1", 0.3), ("p2", 0.8), ("p3", 0.5)],
    );

    // Only the highest-confidence priority label survives
    assert_eq!(taxonomy.filter(&c), vec!["p2"]);
}
