//! Engine configuration.
//!
//! Deserializable settings block the hosting layer hands to the registry.
//! Every field has a default so a partial (or absent) config section works.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default catalog source path
const DEFAULT_CATALOG_PATH: &str = "data/equipments.csv";
/// Default embedding model
const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";
/// Default model download timeout in seconds
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Default number of neighbors returned by an enrichment query.
pub const DEFAULT_TOP_K: usize = 3;

/// Configuration for the enrichment engine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Path to the four-column equipment catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Whether the catalog CSV carries a header row to skip
    #[serde(default = "default_true")]
    pub catalog_has_headers: bool,

    /// Model name for embeddings (e.g., "all-MiniLM-L6-v2")
    #[serde(default = "default_model")]
    pub model: String,

    /// Directory to cache downloaded model files
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Timeout for model download in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            catalog_has_headers: true,
            model: DEFAULT_MODEL.to_string(),
            cache_dir: default_cache_dir(),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOG_PATH)
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".cache")
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.model, "all-MiniLM-L6-v2");
        assert_eq!(settings.catalog_path, PathBuf::from("data/equipments.csv"));
        assert!(settings.catalog_has_headers);
        assert_eq!(settings.download_timeout_secs, 300);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{"model": "bge-small-en-v1.5"}"#).unwrap();
        assert_eq!(settings.model, "bge-small-en-v1.5");
        assert_eq!(settings.catalog_path, PathBuf::from("data/equipments.csv"));
        assert!(settings.catalog_has_headers);
    }

    #[test]
    fn test_empty_config_deserializes() {
        let settings: EngineSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.model, "all-MiniLM-L6-v2");
    }
}
