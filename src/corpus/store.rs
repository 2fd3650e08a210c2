//! Lazy, memoised corpus loading
//!
//! Loading never fails: a missing file is an empty corpus (or no boost
//! config), unreadable or malformed JSON is logged and treated the same way,
//! and individual bad chunk records are dropped.

use crate::corpus::{Chunk, KnowledgeBase, SeoConfig};
use ahash::{HashMap, HashMapExt};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Cache of loaded knowledge bases, keyed by lower-cased id
pub struct CorpusStore {
    data_dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<KnowledgeBase>>>,
}

impl CorpusStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn chunks_path(&self, kb_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}-chunks.json", kb_id))
    }

    pub fn seo_path(&self, kb_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}-seo.json", kb_id))
    }

    /// Get a knowledge base, loading it from disk on first use
    pub fn knowledge_base(&self, kb_id: &str) -> Arc<KnowledgeBase> {
        let id = kb_id.trim().to_lowercase();

        if let Some(kb) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Arc::clone(kb);
        }

        // Loaded outside the lock; a concurrent load of the same id reads the
        // same files, so whichever lands first is kept.
        let loaded = Arc::new(KnowledgeBase::new(
            id.clone(),
            load_chunks(&self.chunks_path(&id)),
            load_seo(&self.seo_path(&id)),
        ));

        tracing::debug!(
            kb = %id,
            chunks = loaded.len(),
            seo = loaded.seo.is_some(),
            "Loaded knowledge base"
        );

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(id).or_insert(loaded))
    }

    /// Put an in-memory knowledge base in the cache, replacing any loaded copy
    pub fn insert(&self, kb: KnowledgeBase) -> Arc<KnowledgeBase> {
        let id = kb.id.trim().to_lowercase();
        let kb = Arc::new(KnowledgeBase { id: id.clone(), ..kb });
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&kb));
        kb
    }

    /// Drop a cached knowledge base so the next access reloads it
    pub fn invalidate(&self, kb_id: &str) -> bool {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kb_id.trim().to_lowercase())
            .is_some()
    }

    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Ids currently cached, sorted
    pub fn cached_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

/// Read a chunk file; missing or malformed files yield an empty list
pub fn load_chunks(path: &Path) -> Vec<Chunk> {
    if !path.exists() {
        tracing::debug!("No chunks file at {}", path.display());
        return Vec::new();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => parse_chunks(&content, &path.display().to_string()),
        Err(e) => {
            tracing::warn!("Failed to read chunks file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Parse a JSON array of `{url, text}` records, dropping invalid ones
pub fn parse_chunks(content: &str, source: &str) -> Vec<Chunk> {
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Malformed chunks JSON in {}: {}", source, e);
            return Vec::new();
        }
    };

    let serde_json::Value::Array(records) = value else {
        tracing::warn!("Chunks data in {} is not an array", source);
        return Vec::new();
    };

    let total = records.len();
    let chunks: Vec<Chunk> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value::<Chunk>(record).ok())
        .filter(|chunk| !chunk.url.trim().is_empty())
        .collect();

    if chunks.len() < total {
        tracing::warn!(
            "Dropped {} invalid chunk record(s) from {}",
            total - chunks.len(),
            source
        );
    }

    chunks
}

/// Read a boost config file; missing or malformed files yield `None`
pub fn load_seo(path: &Path) -> Option<SeoConfig> {
    if !path.exists() {
        return None;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read SEO config {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(seo) => Some(seo),
        Err(e) => {
            tracing::warn!("Malformed SEO config {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_parse_drops_bad_records() {
        let json = r#"[
            {"url": "https://x.com/a", "text": "alpha"},
            {"url": "", "text": "blank url"},
            {"text": "no url"},
            {"url": "https://x.com/b"},
            {"url": "https://x.com/c", "text": 42},
            {"url": "https://x.com/d", "text": "delta", "title": "Delta page"}
        ]"#;

        let chunks = parse_chunks(json, "inline");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].url, "https://x.com/a");
        assert_eq!(chunks[1].title.as_deref(), Some("Delta page"));
    }

    #[test]
    fn test_parse_non_array_and_garbage() {
        assert!(parse_chunks(r#"{"url": "x", "text": "y"}"#, "inline").is_empty());
        assert!(parse_chunks("not json", "inline").is_empty());
    }

    #[test]
    fn test_missing_files_degrade() {
        let temp = TempDir::new().unwrap();
        let store = CorpusStore::new(temp.path());

        let kb = store.knowledge_base("ghost-kb");
        assert!(kb.is_empty());
        assert!(kb.seo.is_none());
    }

    #[test]
    fn test_malformed_seo_is_none() {
        let temp = TempDir::new().unwrap();
        write(&temp, "acme-seo.json", "{ broken");
        assert!(load_seo(&temp.path().join("acme-seo.json")).is_none());
    }

    #[test]
    fn test_load_is_memoised_until_invalidated() {
        let temp = TempDir::new().unwrap();
        write(&temp, "acme-chunks.json", r#"[{"url": "https://acme.com/a", "text": "one"}]"#);
        let store = CorpusStore::new(temp.path());

        let first = store.knowledge_base("ACME");
        assert_eq!(first.len(), 1);

        write(
            &temp,
            "acme-chunks.json",
            r#"[{"url": "https://acme.com/a", "text": "one"}, {"url": "https://acme.com/b", "text": "two"}]"#,
        );

        let second = store.knowledge_base("acme");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.cached_ids(), vec!["acme"]);

        assert!(store.invalidate("acme"));
        assert_eq!(store.knowledge_base("acme").len(), 2);
    }

    #[test]
    fn test_insert_replaces_cached_copy() {
        let temp = TempDir::new().unwrap();
        let store = CorpusStore::new(temp.path());
        store.knowledge_base("demo");

        store.insert(KnowledgeBase::new(
            "Demo",
            vec![Chunk::new("https://demo.com", "hello")],
            None,
        ));

        assert_eq!(store.knowledge_base("demo").len(), 1);
        store.clear();
        assert!(store.cached_ids().is_empty());
    }
}
