//! Corpus ingestion from a WordPress export or a sitemap
//!
//! Produces the `<kb>-chunks.json` file the corpus store reads. WXR items
//! carry their HTML inline; sitemap pages are fetched over HTTP.

mod chunker;
mod html;
mod xml;

pub use chunker::chunk_text;
pub use html::PageExtractor;
pub use xml::{WxrItem, XmlDocument, XmlReader};

use crate::config::IngestConfig;
use crate::corpus::Chunk;
use crate::error::{Result, WinstonError};
use anyhow::Context;
use std::path::Path;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of one ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Page urls that contributed chunks, in order
    pub pages: Vec<String>,
    pub chunks: Vec<Chunk>,
    /// Pages dropped for too little text, a bad url or a failed fetch
    pub skipped: usize,
}

pub struct Ingestor {
    config: IngestConfig,
    reader: XmlReader,
    extractor: PageExtractor,
    client: reqwest::Client,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("winston-ingest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            config,
            reader: XmlReader::new()?,
            extractor: PageExtractor::new()?,
            client,
        })
    }

    /// Ingest a local file path or an http(s) url
    pub async fn ingest(&self, source: &str) -> Result<IngestReport> {
        let xml = self.read_source(source).await?;

        match self.reader.parse(&xml)? {
            XmlDocument::Wxr { base, items } => Ok(self.ingest_wxr(base.as_deref(), &items)),
            XmlDocument::Sitemap { urls } => Ok(self.ingest_sitemap(&urls).await),
        }
    }

    /// Turn WXR items into chunks; no network access
    pub fn ingest_wxr(&self, base: Option<&str>, items: &[WxrItem]) -> IngestReport {
        let mut report = IngestReport::default();

        for item in items {
            if report.pages.len() >= self.config.max_pages {
                break;
            }

            let Some(url) = item.link.as_deref().and_then(|link| resolve_link(link, base)) else {
                report.skipped += 1;
                continue;
            };

            let text = self.extractor.to_text(&item.html);
            if text.chars().count() <= self.config.min_page_chars {
                tracing::debug!("Skipping {}: too little text", url);
                report.skipped += 1;
                continue;
            }

            tracing::info!("✓ {}", url);
            report
                .chunks
                .extend(chunk_text(&text, &url, self.config.chunk_size));
            report.pages.push(url);
        }

        report
    }

    /// Fetch the sitemap pages that pass the path filter and chunk them
    pub async fn ingest_sitemap(&self, urls: &[String]) -> IngestReport {
        let selected: Vec<&String> = urls
            .iter()
            .filter(|url| {
                should_include(url, &self.config.allow_paths, &self.config.deny_paths)
            })
            .take(self.config.max_pages)
            .collect();

        tracing::info!("Processing {} pages...", selected.len());

        let mut report = IngestReport {
            skipped: urls.len() - selected.len(),
            ..IngestReport::default()
        };

        for url in selected {
            let html = match self.fetch(url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Failed to fetch {}: {}", url, e);
                    report.skipped += 1;
                    continue;
                }
            };

            let text = self.extractor.to_text(&html);
            if text.chars().count() <= self.config.min_page_chars {
                report.skipped += 1;
                continue;
            }

            let canonical = self.extractor.canonical_url(&html, url);
            tracing::info!("✓ {}", canonical);
            report
                .chunks
                .extend(chunk_text(&text, &canonical, self.config.chunk_size));
            report.pages.push(canonical);
        }

        report
    }

    async fn read_source(&self, source: &str) -> Result<String> {
        if is_http_url(source) {
            return self.fetch(source).await;
        }

        std::fs::read_to_string(source).map_err(|e| WinstonError::Io {
            source: e,
            context: format!("Failed to read ingest source: {}", source),
        })
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WinstonError::Ingest(format!(
                "Failed to fetch {}: {}",
                url, status
            )));
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;
        Ok(body)
    }
}

/// Path filter for sitemap urls: deny prefixes win, then allow prefixes,
/// otherwise only the home page and `/about*` pass.
pub fn should_include(url: &str, allow_paths: &[String], deny_paths: &[String]) -> bool {
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };
    let path = parsed.path().to_lowercase();

    if deny_paths.iter().any(|d| path.starts_with(d.as_str())) {
        return false;
    }
    if allow_paths.iter().any(|a| path.starts_with(a.as_str())) {
        return true;
    }
    path == "/" || path.starts_with("/about")
}

/// Write chunks as pretty-printed JSON, creating parent directories
pub fn write_chunks(path: &Path, chunks: &[Chunk]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| WinstonError::Io {
            source: e,
            context: format!("Failed to create output directory: {:?}", parent),
        })?;
    }

    let json = serde_json::to_string_pretty(chunks).map_err(|e| WinstonError::Json {
        source: e,
        context: "Failed to serialize chunks".to_string(),
    })?;

    std::fs::write(path, json).map_err(|e| WinstonError::Io {
        source: e,
        context: format!("Failed to write chunks file: {:?}", path),
    })
}

fn is_http_url(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn resolve_link(link: &str, base: Option<&str>) -> Option<String> {
    match url::Url::parse(link) {
        Ok(url) => Some(url.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = url::Url::parse(base?).ok()?;
            base.join(link).ok().map(|u| u.to_string())
        }
        Err(_) => None,
    }
}
