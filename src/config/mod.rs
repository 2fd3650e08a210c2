//! Configuration management for Winston
//!
//! Loads the TOML configuration, applies `WINSTON_*` environment overrides and
//! validates the result. The knowledge base registry lives here as well since
//! it is built straight from the `[[knowledge_bases]]` tables.

use crate::error::{Result, WinstonError};
use crate::retrieval::ScoringStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod registry;
mod validator;

pub use registry::{KbEntry, KbRegistry};
pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub corpus: CorpusConfig,
    pub retrieval: RetrievalConfig,
    #[serde(default = "default_knowledge_bases")]
    pub knowledge_bases: Vec<KnowledgeBaseConfig>,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Where the per-KB corpus files live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding `<kb>-chunks.json` and `<kb>-seo.json`
    pub data_dir: PathBuf,
}

/// Retrieval defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// KB used when a request names none
    pub default_kb: String,
    /// Result count for boosted retrieval
    pub top_k: usize,
    /// Candidate count inspected by the confidence gate
    pub top_n: usize,
}

/// One registered knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub strategy: ScoringStrategy,
}

impl KnowledgeBaseConfig {
    pub fn new(id: impl Into<String>, title: Option<&str>, strategy: ScoringStrategy) -> Self {
        Self {
            id: id.into(),
            title: title.map(str::to_string),
            strategy,
        }
    }
}

fn default_knowledge_bases() -> Vec<KnowledgeBaseConfig> {
    vec![
        KnowledgeBaseConfig::new("default", Some("Winston"), ScoringStrategy::NormalizedThreshold),
        KnowledgeBaseConfig::new("werule", Some("WERULE"), ScoringStrategy::Boosted),
        KnowledgeBaseConfig::new(
            "winstonchat",
            Some("Winston"),
            ScoringStrategy::NormalizedThreshold,
        ),
        KnowledgeBaseConfig::new("william", Some("William"), ScoringStrategy::NormalizedThreshold),
    ]
}

/// Keyword lists for the guide/assistant mode classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub guide_keywords: Vec<String>,
    pub assistant_keywords: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        let words = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            guide_keywords: words(&[
                "portfolio",
                "work",
                "project",
                "experience",
                "skills",
                "about",
                "william",
                "campbell",
            ]),
            assistant_keywords: words(&[
                "build", "create", "develop", "strategy", "product", "feature", "advice", "help",
            ]),
        }
    }
}

/// Settings for turning an XML export or sitemap into a chunk corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub max_pages: usize,
    /// Chunk window in characters
    pub chunk_size: usize,
    /// Pages with less extracted text than this are skipped
    pub min_page_chars: usize,
    pub allow_paths: Vec<String>,
    pub deny_paths: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        let paths = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            max_pages: 50,
            chunk_size: 1000,
            min_page_chars: 100,
            allow_paths: paths(&[
                "/work",
                "/projects",
                "/case",
                "/case-study",
                "/portfolio",
                "/product",
                "/about",
                "/",
                "/services",
                "/expertise",
                "/experience",
            ]),
            deny_paths: paths(&[
                "/tag",
                "/tags",
                "/category",
                "/categories",
                "/author",
                "/feed",
                "/rss",
                "/wp-json",
                "/privacy",
                "/terms",
                "/search",
                "/admin",
                "/wp-admin",
            ]),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WinstonError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| WinstonError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| WinstonError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: WINSTON_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::vars());
    }

    /// Apply `WINSTON_*` overrides from an arbitrary key/value source
    pub fn apply_overrides<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix("WINSTON_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "CORPUS__DATA_DIR" => {
                self.corpus.data_dir = PathBuf::from(value);
            }
            "RETRIEVAL__DEFAULT_KB" => {
                self.retrieval.default_kb = value.trim().to_lowercase();
            }
            "RETRIEVAL__TOP_K" => {
                self.retrieval.top_k = parse_usize(path, value)?;
            }
            "RETRIEVAL__TOP_N" => {
                self.retrieval.top_n = parse_usize(path, value)?;
            }
            "INGEST__MAX_PAGES" => {
                self.ingest.max_pages = parse_usize(path, value)?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Build the knowledge base registry from this configuration
    pub fn registry(&self) -> KbRegistry {
        KbRegistry::from_config(self)
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WinstonError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("winston").join("config.toml"))
    }
}

fn parse_usize(path: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| WinstonError::InvalidConfigValue {
            path: path.to_string(),
            message: format!("Cannot parse '{}' as a count", value),
        })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: "1.0.0".to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            corpus: CorpusConfig {
                data_dir: PathBuf::from("client-data"),
            },
            retrieval: RetrievalConfig {
                default_kb: "default".to_string(),
                top_k: 6,
                top_n: 5,
            },
            knowledge_bases: default_knowledge_bases(),
            chat: ChatConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}
