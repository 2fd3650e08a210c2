//! HTML to plain text

use crate::error::{Result, WinstonError};
use regex::Regex;

/// Pre-compiled patterns for page text extraction
#[derive(Debug, Clone)]
pub struct PageExtractor {
    script: Regex,
    style: Regex,
    tag: Regex,
    whitespace: Regex,
    canonical: Regex,
}

impl PageExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            script: compile("script", r"(?is)<script[^>]*>.*?</script>")?,
            style: compile("style", r"(?is)<style[^>]*>.*?</style>")?,
            tag: compile("tag", r"<[^>]+>")?,
            whitespace: compile("whitespace", r"\s+")?,
            canonical: compile(
                "canonical",
                r#"(?i)<link[^>]*rel=["']canonical["'][^>]*href=["']([^"']+)["'][^>]*>"#,
            )?,
        })
    }

    /// Strip scripts, styles and tags, then collapse whitespace
    pub fn to_text(&self, html: &str) -> String {
        let text = self.script.replace_all(html, "");
        let text = self.style.replace_all(&text, "");
        let text = self.tag.replace_all(&text, " ");
        let text = decode_entities(&text);
        self.whitespace.replace_all(&text, " ").trim().to_string()
    }

    /// `<link rel="canonical">` target resolved against `page_url`, or `page_url`
    pub fn canonical_url(&self, html: &str, page_url: &str) -> String {
        self.canonical
            .captures(html)
            .and_then(|caps| caps.get(1))
            .and_then(|href| {
                url::Url::parse(page_url)
                    .and_then(|base| base.join(href.as_str()))
                    .ok()
            })
            .map(|u| u.to_string())
            .unwrap_or_else(|| page_url.to_string())
    }
}

pub(crate) fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| WinstonError::Config(format!("Invalid {} pattern: {}", name, e)))
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#8217;", "'")
        .replace("&amp;", "&")
}
