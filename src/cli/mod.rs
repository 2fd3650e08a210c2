//! CLI command definitions and parsing
use crate::chat::ChatMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "winston",
    version,
    author = "neur0map",
    about = "Keyword retrieval with confidence gating for an embeddable chat assistant",
    long_about = "Winston answers visitor questions from a small per-client text corpus. It scores \
                  corpus chunks by keyword overlap (optionally boosted by SEO configuration), decides \
                  whether the best matches are trustworthy enough to ground an answer, and renders \
                  them as a numbered, citable context block."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/winston/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank a knowledge base's chunks against a query (boosted scoring)
    Query {
        /// Search query text
        query: String,

        /// Knowledge base id (defaults to the configured default)
        #[arg(short, long)]
        kb: Option<String>,

        /// Maximum number of results to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show what a chat message would be grounded with
    Ask {
        /// Visitor message
        message: String,

        /// Knowledge base id (defaults to the configured default)
        #[arg(short, long)]
        kb: Option<String>,

        /// Candidates checked by the confidence gate (defaults to retrieval.top_n)
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Answer persona; classified from the message when omitted
        #[arg(short, long)]
        mode: Option<ChatMode>,

        /// Show the grounding record in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Build a chunk corpus from a WordPress export or sitemap
    Ingest {
        /// Path or http(s) url of the XML file
        source: String,

        /// Write to <data_dir>/<kb>-chunks.json
        #[arg(short, long, conflicts_with = "output")]
        kb: Option<String>,

        /// Explicit output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of pages to ingest
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// List registered knowledge bases
    Kbs,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
