//! Retrieval entry points used by the chat handler

use crate::config::{Config, KbEntry, KbRegistry};
use crate::corpus::CorpusStore;
use crate::error::Result;
use crate::retrieval::{
    filter_confident, format_context, is_confident, rank, rank_normalized, tokenize, ScoredChunk,
    ScoringStrategy,
};
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a confidence-gated retrieval
#[derive(Debug, Clone, Serialize)]
pub struct ConfidenceReport {
    pub kb: String,
    /// Top-N by normalized overlap, before gating
    pub results: Vec<ScoredChunk>,
    pub confident: bool,
}

impl ConfidenceReport {
    pub fn confident_results(&self) -> Vec<ScoredChunk> {
        filter_confident(&self.results)
    }

    /// Context block built from the confident subset only
    pub fn context(&self) -> String {
        format_context(&self.confident_results())
    }
}

/// Outcome of a retrieval using the KB's configured strategy
#[derive(Debug, Clone, Serialize)]
pub struct Retrieval {
    pub kb: String,
    pub strategy: ScoringStrategy,
    pub results: Vec<ScoredChunk>,
    pub confident: bool,
}

impl Retrieval {
    /// Results that may be cited
    ///
    /// Boosted retrieval keeps its fallback list even when nothing matched;
    /// threshold retrieval keeps only results that passed the gate.
    pub fn citable(&self) -> Vec<ScoredChunk> {
        match self.strategy {
            ScoringStrategy::Boosted => self.results.clone(),
            ScoringStrategy::NormalizedThreshold => filter_confident(&self.results),
        }
    }

    pub fn context(&self) -> String {
        format_context(&self.citable())
    }
}

/// Owns the KB registry and corpus cache; shared across requests
pub struct RetrievalService {
    registry: KbRegistry,
    store: Arc<CorpusStore>,
    top_k: usize,
    top_n: usize,
}

impl RetrievalService {
    pub fn new(config: &Config, store: Arc<CorpusStore>) -> Self {
        Self {
            registry: config.registry(),
            store,
            top_k: config.retrieval.top_k,
            top_n: config.retrieval.top_n,
        }
    }

    /// Build a service with a fresh corpus cache over `corpus.data_dir`
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(CorpusStore::new(config.corpus.data_dir.clone()));
        Self::new(config, store)
    }

    pub fn registry(&self) -> &KbRegistry {
        &self.registry
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    pub fn default_top_k(&self) -> usize {
        self.top_k
    }

    pub fn default_top_n(&self) -> usize {
        self.top_n
    }

    /// Resolve a requested KB id against the registry
    pub fn resolve<'k>(&self, kb: impl Into<Option<&'k str>>) -> Result<&KbEntry> {
        self.registry.resolve(kb.into())
    }

    /// Boosted keyword retrieval, at most `top_k` results
    pub fn retrieve<'k>(
        &self,
        kb: impl Into<Option<&'k str>>,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let entry = self.resolve(kb)?;
        let knowledge_base = self.store.knowledge_base(&entry.id);
        let query_tokens = tokenize(query);

        let results = rank(
            &knowledge_base.chunks,
            &query_tokens,
            knowledge_base.seo.as_ref(),
            top_k,
        );

        tracing::debug!(
            kb = %entry.id,
            query = %query,
            candidates = knowledge_base.len(),
            returned = results.len(),
            top = ?results.iter().map(|r| (r.url(), r.score)).collect::<Vec<_>>(),
            "Boosted retrieval"
        );

        Ok(results)
    }

    /// Normalized-overlap retrieval of the top `top_n`, with the gate applied
    pub fn retrieve_with_confidence<'k>(
        &self,
        kb: impl Into<Option<&'k str>>,
        query: &str,
        top_n: usize,
    ) -> Result<ConfidenceReport> {
        let entry = self.resolve(kb)?;
        let knowledge_base = self.store.knowledge_base(&entry.id);
        let query_tokens = tokenize(query);

        let results = rank_normalized(&knowledge_base.chunks, &query_tokens, top_n);
        let confident = is_confident(&results);

        tracing::debug!(
            kb = %entry.id,
            query = %query,
            candidates = knowledge_base.len(),
            confident_count = filter_confident(&results).len(),
            confident,
            "Confidence-gated retrieval"
        );

        Ok(ConfidenceReport {
            kb: entry.id.clone(),
            results,
            confident,
        })
    }

    /// Retrieve with whichever strategy the KB is registered under
    pub fn search<'k>(&self, kb: impl Into<Option<&'k str>>, query: &str) -> Result<Retrieval> {
        self.search_with_limit(kb, query, None)
    }

    /// Like [`search`](Self::search); `top_n` replaces the configured
    /// candidate count on the threshold path. Boosted KBs keep `top_k`.
    pub fn search_with_limit<'k>(
        &self,
        kb: impl Into<Option<&'k str>>,
        query: &str,
        top_n: Option<usize>,
    ) -> Result<Retrieval> {
        let entry = self.resolve(kb)?.clone();

        match entry.strategy {
            ScoringStrategy::Boosted => {
                let results = self.retrieve(entry.id.as_str(), query, self.top_k)?;
                let confident = results.iter().any(|r| r.score > 0.0);
                Ok(Retrieval {
                    kb: entry.id,
                    strategy: entry.strategy,
                    results,
                    confident,
                })
            }
            ScoringStrategy::NormalizedThreshold => {
                let top_n = top_n.unwrap_or(self.top_n);
                let report = self.retrieve_with_confidence(entry.id.as_str(), query, top_n)?;
                Ok(Retrieval {
                    kb: report.kb,
                    strategy: entry.strategy,
                    results: report.results,
                    confident: report.confident,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Chunk, KnowledgeBase};
    use crate::error::WinstonError;
    use crate::retrieval::NO_CONTEXT;
    use tempfile::TempDir;

    fn service(temp: &TempDir) -> RetrievalService {
        let mut config = Config::default();
        config.corpus.data_dir = temp.path().to_path_buf();
        let service = RetrievalService::from_config(&config);

        service.store().insert(KnowledgeBase::new(
            "william",
            vec![
                Chunk::new("https://x.com/work/a", "product strategy roadmap"),
                Chunk::new("https://x.com/about", "William builds web apps"),
            ],
            None,
        ));
        service
    }

    #[test]
    fn test_retrieve_scenario() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        let results = service.retrieve("william", "product strategy", 5).unwrap();
        assert_eq!(results[0].url(), "https://x.com/work/a");
        assert!(results[0].score >= 2.0);
    }

    #[test]
    fn test_unknown_kb_is_rejected_everywhere() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        assert!(matches!(
            service.retrieve("nope", "q", 5),
            Err(WinstonError::UnknownKnowledgeBase { .. })
        ));
        assert!(matches!(
            service.retrieve_with_confidence("nope", "q", 5),
            Err(WinstonError::UnknownKnowledgeBase { .. })
        ));
        assert!(matches!(
            service.search("nope", "q"),
            Err(WinstonError::UnknownKnowledgeBase { .. })
        ));
    }

    #[test]
    fn test_registered_kb_without_files_is_empty() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        let results = service.retrieve("winstonchat", "anything", 5).unwrap();
        assert!(results.is_empty());

        let report = service
            .retrieve_with_confidence("winstonchat", "anything", 5)
            .unwrap();
        assert!(!report.confident);
        assert_eq!(report.context(), NO_CONTEXT);
    }

    #[test]
    fn test_confidence_report() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        let report = service
            .retrieve_with_confidence(Some("WILLIAM"), "what is product strategy", 5)
            .unwrap();
        assert_eq!(report.kb, "william");
        assert!(report.confident);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.confident_results().len(), 1);
        assert!(report.context().starts_with("[1] A — https://x.com/work/a\n"));
    }

    #[test]
    fn test_search_dispatches_on_strategy() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        service.store().insert(KnowledgeBase::new(
            "werule",
            vec![Chunk::new("https://we-rule.com/", "community for founders")],
            None,
        ));

        let boosted = service.search("werule", "pricing").unwrap();
        assert_eq!(boosted.strategy, ScoringStrategy::Boosted);
        assert!(!boosted.confident);
        assert_eq!(boosted.citable().len(), 1);

        let gated = service.search("william", "pricing").unwrap();
        assert_eq!(gated.strategy, ScoringStrategy::NormalizedThreshold);
        assert!(!gated.confident);
        assert_eq!(gated.context(), NO_CONTEXT);
    }

    #[test]
    fn test_search_top_n_override() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        let all = service.search("william", "product roadmap").unwrap();
        assert_eq!(all.results.len(), 2);

        let limited = service
            .search_with_limit("william", "product roadmap", Some(1))
            .unwrap();
        assert_eq!(limited.results.len(), 1);
        assert_eq!(limited.results[0].url(), "https://x.com/work/a");
        assert!(limited.confident);
    }

    #[test]
    fn test_default_kb_used_when_absent() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        let report = service.retrieve_with_confidence(None, "anything", 5).unwrap();
        assert_eq!(report.kb, "default");
    }
}
