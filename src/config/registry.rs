//! Registry of known knowledge bases
//!
//! Ids are case-insensitive. A request that names no KB gets the configured
//! default; a request naming an unregistered KB is rejected.

use crate::config::Config;
use crate::error::{Result, WinstonError};
use crate::retrieval::ScoringStrategy;

/// A registered knowledge base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KbEntry {
    /// Lower-cased id, also the corpus file prefix
    pub id: String,
    pub title: String,
    pub strategy: ScoringStrategy,
}

#[derive(Debug, Clone)]
pub struct KbRegistry {
    entries: Vec<KbEntry>,
    default_id: String,
}

impl KbRegistry {
    pub fn new(entries: Vec<KbEntry>, default_id: impl Into<String>) -> Self {
        Self {
            entries,
            default_id: normalize_id(&default_id.into()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let entries = config
            .knowledge_bases
            .iter()
            .map(|kb| {
                let id = normalize_id(&kb.id);
                KbEntry {
                    title: kb.title.clone().unwrap_or_else(|| id.to_uppercase()),
                    id,
                    strategy: kb.strategy,
                }
            })
            .collect();

        Self::new(entries, config.retrieval.default_kb.clone())
    }

    /// Resolve a requested KB id to its registry entry
    pub fn resolve(&self, requested: Option<&str>) -> Result<&KbEntry> {
        let id = requested
            .map(normalize_id)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.default_id.clone());

        self.get(&id)
            .ok_or_else(|| WinstonError::UnknownKnowledgeBase {
                id,
                known: self.ids(),
            })
    }

    pub fn get(&self, id: &str) -> Option<&KbEntry> {
        let id = normalize_id(id);
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn entries(&self) -> &[KbEntry] {
        &self.entries
    }
}

pub(crate) fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}
