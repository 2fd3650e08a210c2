use crate::config::Config;
use crate::error::{Result, ValidationError, WinstonError};
use std::collections::HashSet;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_corpus(config, &mut errors);
        Self::validate_retrieval(config, &mut errors);
        Self::validate_knowledge_bases(config, &mut errors);
        Self::validate_chat(config, &mut errors);
        Self::validate_ingest(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(WinstonError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != "1.0.0" {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_corpus(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.corpus.data_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "corpus.data_dir",
                "Data directory cannot be empty",
            ));
        }
    }

    fn validate_retrieval(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.retrieval.top_k == 0 {
            errors.push(ValidationError::new(
                "retrieval.top_k",
                "top_k must be greater than 0",
            ));
        }

        if config.retrieval.top_n == 0 {
            errors.push(ValidationError::new(
                "retrieval.top_n",
                "top_n must be greater than 0",
            ));
        }

        let default_kb = config.retrieval.default_kb.trim().to_lowercase();
        let registered = config
            .knowledge_bases
            .iter()
            .any(|kb| kb.id.trim().to_lowercase() == default_kb);
        if !registered {
            errors.push(ValidationError::new(
                "retrieval.default_kb",
                format!(
                    "Default knowledge base '{}' is not registered",
                    config.retrieval.default_kb
                ),
            ));
        }
    }

    fn validate_knowledge_bases(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.knowledge_bases.is_empty() {
            errors.push(ValidationError::new(
                "knowledge_bases",
                "At least one knowledge base must be registered",
            ));
        }

        let mut seen = HashSet::new();
        for (idx, kb) in config.knowledge_bases.iter().enumerate() {
            let id = kb.id.trim().to_lowercase();
            if id.is_empty() {
                errors.push(ValidationError::new(
                    format!("knowledge_bases[{}].id", idx),
                    "Knowledge base id cannot be empty",
                ));
                continue;
            }
            // ids become file name prefixes
            if id.contains(['/', '\\']) || id.contains("..") {
                errors.push(ValidationError::new(
                    format!("knowledge_bases[{}].id", idx),
                    format!("Knowledge base id '{}' contains path characters", kb.id),
                ));
            }
            if !seen.insert(id) {
                errors.push(ValidationError::new(
                    format!("knowledge_bases[{}].id", idx),
                    format!("Duplicate knowledge base id '{}'", kb.id),
                ));
            }
        }
    }

    fn validate_chat(config: &Config, errors: &mut Vec<ValidationError>) {
        let lists = [
            ("chat.guide_keywords", &config.chat.guide_keywords),
            ("chat.assistant_keywords", &config.chat.assistant_keywords),
        ];
        for (path, keywords) in lists {
            if keywords.iter().any(|k| k.trim().is_empty()) {
                errors.push(ValidationError::new(path, "Keywords cannot be empty"));
            }
        }
    }

    fn validate_ingest(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.ingest.chunk_size == 0 {
            errors.push(ValidationError::new(
                "ingest.chunk_size",
                "Chunk size must be greater than 0",
            ));
        }

        if config.ingest.max_pages == 0 {
            errors.push(ValidationError::new(
                "ingest.max_pages",
                "max_pages must be greater than 0",
            ));
        }

        for (path, list) in [
            ("ingest.allow_paths", &config.ingest.allow_paths),
            ("ingest.deny_paths", &config.ingest.deny_paths),
        ] {
            if let Some(bad) = list.iter().find(|p| !p.starts_with('/')) {
                errors.push(ValidationError::new(
                    path,
                    format!("Path prefix '{}' must start with '/'", bad),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KnowledgeBaseConfig;
    use crate::retrieval::ScoringStrategy;
    use std::path::PathBuf;

    fn error_paths(config: &Config) -> Vec<String> {
        match ConfigValidator::validate(config) {
            Err(WinstonError::ConfigValidation { errors }) => {
                errors.into_iter().map(|e| e.path).collect()
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_empty_data_dir() {
        let mut config = Config::default();
        config.corpus.data_dir = PathBuf::new();
        assert_eq!(error_paths(&config), vec!["corpus.data_dir"]);
    }

    #[test]
    fn test_zero_counts() {
        let mut config = Config::default();
        config.retrieval.top_k = 0;
        config.retrieval.top_n = 0;
        assert_eq!(
            error_paths(&config),
            vec!["retrieval.top_k", "retrieval.top_n"]
        );
    }

    #[test]
    fn test_default_kb_must_be_registered() {
        let mut config = Config::default();
        config.retrieval.default_kb = "ghost".to_string();
        assert_eq!(error_paths(&config), vec!["retrieval.default_kb"]);
    }

    #[test]
    fn test_default_kb_match_is_case_insensitive() {
        let mut config = Config::default();
        config.retrieval.default_kb = "WeRule".to_string();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_duplicate_kb_ids() {
        let mut config = Config::default();
        config.knowledge_bases.push(KnowledgeBaseConfig::new(
            "WERULE",
            None,
            ScoringStrategy::Boosted,
        ));
        assert_eq!(error_paths(&config), vec!["knowledge_bases[4].id"]);
    }

    #[test]
    fn test_path_like_kb_id() {
        let mut config = Config::default();
        config.knowledge_bases.push(KnowledgeBaseConfig::new(
            "../etc",
            None,
            ScoringStrategy::Boosted,
        ));
        assert_eq!(error_paths(&config), vec!["knowledge_bases[4].id"]);
    }

    #[test]
    fn test_bad_ingest_settings() {
        let mut config = Config::default();
        config.ingest.chunk_size = 0;
        config.ingest.deny_paths.push("feed".to_string());
        assert_eq!(
            error_paths(&config),
            vec!["ingest.chunk_size", "ingest.deny_paths"]
        );
    }
}
