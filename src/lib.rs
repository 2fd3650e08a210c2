//! Winston - Grounded answers for an embeddable website chat assistant
//!
//! Scores a small per-client text corpus against a visitor's question by
//! keyword overlap, decides whether the best matches are trustworthy enough
//! to ground an answer, and renders them as a numbered, citable context block.
//! When nothing is confident the chat handler falls back to an ungrounded
//! assistant persona.

pub mod chat;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod ingest;
pub mod retrieval;

pub use error::{Result, WinstonError};
