//! Relevance scoring
//!
//! Two independent modes:
//! - boosted: literal overlap plus priority-page, pillar and intent boosts
//!   from the KB's [`SeoConfig`]; unbounded above, used for ranking
//! - normalized: share of query tokens found in the chunk, in `[0, 1]`,
//!   ignores boosts; the only score the confidence gate accepts

use crate::corpus::{Chunk, Intent, SeoConfig};

/// Maximum total pillar contribution per chunk
pub const PILLAR_CAP: f32 = 5.0;

/// Bonus for a chunk under one of the detected intent's target prefixes
pub const INTENT_URL_BOOST: f32 = 3.0;

/// Bonus for a chunk whose text mentions the detected intent's name
pub const INTENT_TEXT_BOOST: f32 = 0.5;

/// Normalized mode ignores tokens this short or shorter
const MIN_NORMALIZED_TOKEN_LEN: usize = 2;

/// One point per query token contained (as a substring) in the text.
pub fn base_overlap(query_tokens: &[String], text_lower: &str) -> f32 {
    query_tokens
        .iter()
        .filter(|token| text_lower.contains(token.as_str()))
        .count() as f32
}

/// Weight of the first priority page whose url is a literal prefix of `url`.
pub fn priority_boost(url: &str, seo: Option<&SeoConfig>) -> f32 {
    seo.and_then(|seo| {
        seo.priority_pages
            .iter()
            .find(|page| url.starts_with(page.url.as_str()))
    })
    .map(|page| page.weight.max(0.0))
    .unwrap_or(0.0)
}

/// One point per pillar keyword found in the text or among the query tokens.
/// Empty keywords never count as a hit.
pub fn pillar_boost(query_tokens: &[String], text_lower: &str, seo: Option<&SeoConfig>) -> f32 {
    let Some(seo) = seo else {
        return 0.0;
    };

    let hits = seo
        .pillars
        .iter()
        .flat_map(|pillar| pillar.keywords.iter())
        .map(|keyword| keyword.to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .filter(|keyword| text_lower.contains(keyword.as_str()) || query_tokens.contains(keyword))
        .count() as f32;

    hits.min(PILLAR_CAP)
}

/// First intent, in declaration order, with a keyword among the query tokens.
pub fn detect_intent<'a>(query_tokens: &[String], seo: Option<&'a SeoConfig>) -> Option<&'a Intent> {
    seo?.intents.iter().find(|intent| {
        intent
            .keywords
            .iter()
            .map(|keyword| keyword.to_lowercase())
            .any(|keyword| !keyword.is_empty() && query_tokens.contains(&keyword))
    })
}

pub fn intent_boost(intent: Option<&Intent>, url: &str, text_lower: &str) -> f32 {
    let Some(intent) = intent else {
        return 0.0;
    };

    let url_boost = if intent
        .target_url_prefixes
        .iter()
        .any(|prefix| url.starts_with(prefix.as_str()))
    {
        INTENT_URL_BOOST
    } else {
        0.0
    };

    // name is matched as declared, against the lower-cased text
    let name = intent.name.as_str();
    let text_boost = if !name.is_empty() && text_lower.contains(name) {
        INTENT_TEXT_BOOST
    } else {
        0.0
    };

    url_boost + text_boost
}

/// Per-query boosted scorer; intent detection runs once per query.
#[derive(Debug, Clone, Copy)]
pub struct BoostedScorer<'a> {
    query_tokens: &'a [String],
    seo: Option<&'a SeoConfig>,
    intent: Option<&'a Intent>,
}

impl<'a> BoostedScorer<'a> {
    pub fn new(query_tokens: &'a [String], seo: Option<&'a SeoConfig>) -> Self {
        Self {
            query_tokens,
            seo,
            intent: detect_intent(query_tokens, seo),
        }
    }

    pub fn intent(&self) -> Option<&'a Intent> {
        self.intent
    }

    pub fn score(&self, chunk: &Chunk) -> f32 {
        let text_lower = chunk.text.to_lowercase();

        base_overlap(self.query_tokens, &text_lower)
            + priority_boost(&chunk.url, self.seo)
            + pillar_boost(self.query_tokens, &text_lower, self.seo)
            + intent_boost(self.intent, &chunk.url, &text_lower)
    }
}

/// Boosted score of one chunk against a tokenized query.
pub fn score(query_tokens: &[String], chunk: &Chunk, seo: Option<&SeoConfig>) -> f32 {
    BoostedScorer::new(query_tokens, seo).score(chunk)
}

/// Share of query tokens (longer than two characters) contained in `text`.
///
/// Divides by the full token count, short tokens included, and clamps to 1.
pub fn normalized_overlap(query_tokens: &[String], text: &str) -> f32 {
    if query_tokens.is_empty() {
        return 0.0;
    }

    let text_lower = text.to_lowercase();
    let hits = query_tokens
        .iter()
        .filter(|token| token.chars().count() > MIN_NORMALIZED_TOKEN_LEN)
        .filter(|token| text_lower.contains(token.as_str()))
        .count();

    (hits as f32 / query_tokens.len() as f32).min(1.0)
}
