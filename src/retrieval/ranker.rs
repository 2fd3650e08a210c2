//! Ranking of scored chunks
//!
//! Sorting is stable: equal scores keep corpus order.

use crate::corpus::{Chunk, SeoConfig};
use crate::retrieval::scoring::{normalized_overlap, BoostedScorer};
use crate::retrieval::ScoredChunk;
use std::cmp::Ordering;

/// Boosted ranking, at most `k` results.
///
/// Chunks scoring above zero are preferred. When none do, the top of the
/// whole zero-scored corpus is returned instead so the caller still has
/// priority content to cite.
pub fn rank(
    chunks: &[Chunk],
    query_tokens: &[String],
    seo: Option<&SeoConfig>,
    k: usize,
) -> Vec<ScoredChunk> {
    let scorer = BoostedScorer::new(query_tokens, seo);
    let scored: Vec<ScoredChunk> = chunks
        .iter()
        .map(|chunk| ScoredChunk::boosted(chunk.clone(), scorer.score(chunk)))
        .collect();

    let has_positive = scored.iter().any(|s| s.score > 0.0);
    let candidates: Vec<ScoredChunk> = if has_positive {
        scored.into_iter().filter(|s| s.score > 0.0).collect()
    } else {
        scored
    };

    top_k(candidates, k)
}

/// Normalized-overlap ranking, at most `n` results, no positive filter.
pub fn rank_normalized(chunks: &[Chunk], query_tokens: &[String], n: usize) -> Vec<ScoredChunk> {
    let scored = chunks
        .iter()
        .map(|chunk| {
            ScoredChunk::normalized(chunk.clone(), normalized_overlap(query_tokens, &chunk.text))
        })
        .collect();

    top_k(scored, n)
}

fn top_k(mut scored: Vec<ScoredChunk>, k: usize) -> Vec<ScoredChunk> {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}
