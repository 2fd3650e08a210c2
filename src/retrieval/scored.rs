//! Scored chunk structure

use crate::corpus::Chunk;
use crate::retrieval::ScoringStrategy;
use serde::Serialize;

/// A chunk with the relevance score one retrieval call gave it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    #[serde(flatten)]
    pub chunk: Chunk,

    /// Relevance score, always >= 0
    pub score: f32,

    /// Which scoring mode produced `score`
    pub strategy: ScoringStrategy,
}

impl ScoredChunk {
    pub fn new(chunk: Chunk, score: f32, strategy: ScoringStrategy) -> Self {
        Self {
            chunk,
            score,
            strategy,
        }
    }

    /// A chunk scored by literal overlap plus boosts
    pub fn boosted(chunk: Chunk, score: f32) -> Self {
        Self::new(chunk, score, ScoringStrategy::Boosted)
    }

    /// A chunk scored by normalized overlap in `[0, 1]`
    pub fn normalized(chunk: Chunk, score: f32) -> Self {
        Self::new(chunk, score, ScoringStrategy::NormalizedThreshold)
    }

    pub fn url(&self) -> &str {
        &self.chunk.url
    }

    pub fn text(&self) -> &str {
        &self.chunk.text
    }

    /// Get a short preview of the text (first N characters)
    pub fn preview(&self, max_chars: usize) -> String {
        let text = &self.chunk.text;
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.clone(),
        }
    }
}
