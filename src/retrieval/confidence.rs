//! Confidence gate over normalized-overlap results
//!
//! Boosted scores are unbounded and never compared against [`MIN_SCORE`];
//! entries produced by the boosted ranker are not admitted.

use crate::retrieval::{ScoredChunk, ScoringStrategy};

/// Minimum normalized score for a result to ground an answer
pub const MIN_SCORE: f32 = 0.22;

fn meets_threshold(result: &ScoredChunk) -> bool {
    result.strategy == ScoringStrategy::NormalizedThreshold && result.score >= MIN_SCORE
}

/// True iff at least one result meets [`MIN_SCORE`]
pub fn is_confident(results: &[ScoredChunk]) -> bool {
    results.iter().any(meets_threshold)
}

/// Results meeting [`MIN_SCORE`], in their original order
pub fn filter_confident(results: &[ScoredChunk]) -> Vec<ScoredChunk> {
    results.iter().filter(|r| meets_threshold(r)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Chunk;

    fn normalized(url: &str, score: f32) -> ScoredChunk {
        ScoredChunk::normalized(Chunk::new(url, "text"), score)
    }

    #[test]
    fn test_threshold_boundary() {
        assert!(is_confident(&[normalized("a", 0.22)]));
        assert!(!is_confident(&[normalized("a", 0.2199)]));
    }

    #[test]
    fn test_empty_is_not_confident() {
        assert!(!is_confident(&[]));
        assert!(filter_confident(&[]).is_empty());
    }

    #[test]
    fn test_filter_keeps_order() {
        let results = vec![
            normalized("a", 0.9),
            normalized("b", 0.5),
            normalized("c", 0.1),
            normalized("d", 0.0),
        ];

        let kept = filter_confident(&results);
        let urls: Vec<&str> = kept.iter().map(|s| s.url()).collect();
        assert_eq!(urls, vec!["a", "b"]);
    }

    #[test]
    fn test_boosted_scores_are_not_admitted() {
        let boosted = ScoredChunk::boosted(Chunk::new("a", "text"), 7.0);
        assert!(!is_confident(&[boosted.clone()]));
        assert!(filter_confident(&[boosted]).is_empty());
    }
}
