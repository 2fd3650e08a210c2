//! Per-client text corpora
//!
//! A knowledge base is a list of chunks (`<kb>-chunks.json`) plus an optional
//! boost configuration (`<kb>-seo.json`). Both are read once per id and kept
//! read-only behind an `Arc` for the life of the store.

mod seo;
mod store;

pub use seo::{Intent, Pillar, PriorityPage, SeoConfig};
pub use store::{load_chunks, load_seo, parse_chunks, CorpusStore};

use serde::{Deserialize, Serialize};

/// A unit of retrievable content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Citation target, never empty
    pub url: String,

    pub text: String,

    /// Display title; derived from the url when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Chunk {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A loaded knowledge base
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    pub id: String,
    pub chunks: Vec<Chunk>,
    pub seo: Option<SeoConfig>,
}

impl KnowledgeBase {
    pub fn new(id: impl Into<String>, chunks: Vec<Chunk>, seo: Option<SeoConfig>) -> Self {
        Self {
            id: id.into(),
            chunks,
            seo,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }
}
