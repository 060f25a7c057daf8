//! Configuration for the triage pipeline.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (TRIAGE_MODEL_ENDPOINT, TRIAGE_TAXONOMY)
//! 2. Config file (.triage/config.yaml)
//! 3. Defaults (~/.triage)
//!
//! Config file discovery:
//! - Searches current directory and parents for .triage/config.yaml
//! - Paths in the config file are relative to the config file's directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::TriageSettings;
use crate::domain::LabelTaxonomy;

/// Default model service endpoint
const DEFAULT_MODEL_ENDPOINT: &str = "http://localhost:9000";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub model: Option<ModelConfig>,
    /// Taxonomy path, relative to the config file's directory
    #[serde(default)]
    pub taxonomy: Option<String>,
    #[serde(default)]
    pub triage: Option<TriageSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub endpoint: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Model service endpoint
    pub model_endpoint: String,
    /// Absolute path to the taxonomy YAML
    pub taxonomy_path: PathBuf,
    /// Workflow settings (retry policy, label names, fallback text)
    pub triage: TriageSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Load the label taxonomy from the resolved path
    pub fn load_taxonomy(&self) -> Result<LabelTaxonomy> {
        LabelTaxonomy::from_file(&self.taxonomy_path)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".triage").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_taxonomy = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".triage")
        .join("taxonomy.yaml");

    let config_file = find_config_file();

    let (model_endpoint, taxonomy_path, triage) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;
        let config_dir = config_path.parent().unwrap_or(Path::new("."));

        let model_endpoint = std::env::var("TRIAGE_MODEL_ENDPOINT")
            .ok()
            .or_else(|| config.model.as_ref().and_then(|m| m.endpoint.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL_ENDPOINT.to_string());

        let taxonomy_path = if let Ok(env_path) = std::env::var("TRIAGE_TAXONOMY") {
            PathBuf::from(env_path)
        } else if let Some(ref taxonomy) = config.taxonomy {
            resolve_path(config_dir, taxonomy)
        } else {
            default_taxonomy
        };

        (model_endpoint, taxonomy_path, config.triage.unwrap_or_default())
    } else {
        // No config file - use env vars or defaults
        let model_endpoint = std::env::var("TRIAGE_MODEL_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_MODEL_ENDPOINT.to_string());

        let taxonomy_path = std::env::var("TRIAGE_TAXONOMY")
            .map(PathBuf::from)
            .unwrap_or(default_taxonomy);

        (model_endpoint, taxonomy_path, TriageSettings::default())
    };

    Ok(ResolvedConfig {
        model_endpoint,
        taxonomy_path,
        triage,
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_parsing() {
        let yaml = r#"
version: "1.0"
model:
  endpoint: http://triage-model:9000
taxonomy: ./taxonomy.yaml
triage:
  pending_label: needs-triage
  retry:
    max_attempts: 5
"#;
        let config: ConfigFile = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.version, "1.0");
        assert_eq!(
            config.model.unwrap().endpoint,
            Some("http://triage-model:9000".to_string())
        );
        assert_eq!(config.taxonomy, Some("./taxonomy.yaml".to_string()));

        let triage = config.triage.unwrap();
        assert_eq!(triage.pending_label, "needs-triage");
        assert_eq!(triage.retry.max_attempts, 5);
        // Unset retry fields keep their defaults
        assert_eq!(triage.retry.initial_delay_ms, 1000);
    }

    #[test]
    fn test_config_file_from_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let triage_dir = temp.path().join(".triage");
        std::fs::create_dir_all(&triage_dir).unwrap();

        let config_path = triage_dir.join("config.yaml");
        std::fs::write(
            &config_path,
            r#"
version: "1.0"
taxonomy: ./taxonomy.yaml
"#,
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(
            resolve_path(&triage_dir, config.taxonomy.as_deref().unwrap()),
            triage_dir.join("./taxonomy.yaml")
        );
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project/.triage");

        assert_eq!(
            resolve_path(&base, "./taxonomy.yaml"),
            PathBuf::from("/home/user/project/.triage/./taxonomy.yaml")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/taxonomy.yaml"),
            PathBuf::from("/absolute/taxonomy.yaml")
        );
    }
}
