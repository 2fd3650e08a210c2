//! Keyword retrieval with confidence gating
//!
//! Query text is tokenized, every chunk of the selected knowledge base is
//! scored, the ranked list is cut to size and, on the gated path, checked
//! against [`MIN_SCORE`] before being rendered into a context block.

mod confidence;
mod format;
mod ranker;
mod scored;
pub mod scoring;
mod service;
mod tokenizer;

pub use confidence::{filter_confident, is_confident, MIN_SCORE};
pub use format::{derive_title, format_context, NO_CONTEXT};
pub use ranker::{rank, rank_normalized};
pub use scored::ScoredChunk;
pub use scoring::{normalized_overlap, score, BoostedScorer};
pub use service::{ConfidenceReport, Retrieval, RetrievalService};
pub use tokenizer::tokenize;

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a knowledge base's chunks are scored and judged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Overlap plus SEO boosts; ranked, never gated by threshold
    Boosted,
    /// Normalized overlap gated by [`MIN_SCORE`]
    #[default]
    NormalizedThreshold,
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringStrategy::Boosted => write!(f, "boosted"),
            ScoringStrategy::NormalizedThreshold => write!(f, "normalized_threshold"),
        }
    }
}
