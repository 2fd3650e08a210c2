//! Hand-off between retrieval and the chat handler
//!
//! Picks the persona for a message and packages what retrieval found. When
//! the result is not confident the context is the no-context sentinel and
//! the handler answers without grounding.

use crate::config::ChatConfig;
use crate::error::Result;
use crate::retrieval::{RetrievalService, ScoringStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Persona the chat handler answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Site guide, answers about the site's own content
    Guide,
    /// General assistant
    Assistant,
}

impl ChatMode {
    /// Keyword vote over the message; ties go to the guide
    pub fn classify(message: &str, config: &ChatConfig) -> Self {
        let message = message.to_lowercase();
        let votes = |keywords: &[String]| {
            keywords
                .iter()
                .filter(|k| message.contains(k.to_lowercase().as_str()))
                .count()
        };

        if votes(&config.guide_keywords) >= votes(&config.assistant_keywords) {
            ChatMode::Guide
        } else {
            ChatMode::Assistant
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatMode::Guide => write!(f, "guide"),
            ChatMode::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "guide" => Ok(ChatMode::Guide),
            "assistant" => Ok(ChatMode::Assistant),
            other => Err(format!("unknown chat mode '{}'", other)),
        }
    }
}

/// What the generation step receives for one user message
#[derive(Debug, Clone, Serialize)]
pub struct Grounding {
    pub kb: String,
    pub mode: ChatMode,
    pub strategy: ScoringStrategy,
    pub confident: bool,
    /// Numbered context block, or the no-context sentinel
    pub context: String,
    /// Urls in the order they are numbered in `context`
    pub citations: Vec<String>,
}

impl Grounding {
    /// Retrieve for `message` from `kb` and decide how to answer it.
    ///
    /// `top_n` overrides the configured candidate count for threshold KBs.
    pub fn prepare<'k>(
        service: &RetrievalService,
        chat: &ChatConfig,
        kb: impl Into<Option<&'k str>>,
        message: &str,
        explicit_mode: Option<ChatMode>,
        top_n: Option<usize>,
    ) -> Result<Self> {
        let mode = explicit_mode.unwrap_or_else(|| ChatMode::classify(message, chat));
        let retrieval = service.search_with_limit(kb, message, top_n)?;

        let (context, citations) = if retrieval.confident {
            let citable = retrieval.citable();
            (
                retrieval.context(),
                citable.iter().map(|r| r.url().to_string()).collect(),
            )
        } else {
            (crate::retrieval::NO_CONTEXT.to_string(), Vec::new())
        };

        tracing::info!(
            kb = %retrieval.kb,
            mode = %mode,
            confident = retrieval.confident,
            citations = citations.len(),
            "Prepared grounding"
        );

        Ok(Self {
            kb: retrieval.kb,
            mode,
            strategy: retrieval.strategy,
            confident: retrieval.confident,
            context,
            citations,
        })
    }

    /// True when the handler should answer without retrieved context
    pub fn should_fall_back(&self) -> bool {
        !self.confident
    }
}
