//! Minimal readers for WordPress WXR exports and XML sitemaps
//!
//! Only the handful of elements ingestion needs are extracted.

use crate::error::{Result, WinstonError};
use crate::ingest::html::compile;
use regex::Regex;

/// One `<item>` of a WXR export
#[derive(Debug, Clone, PartialEq)]
pub struct WxrItem {
    pub link: Option<String>,
    /// Raw HTML from `<content:encoded>`
    pub html: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlDocument {
    Wxr {
        /// Channel `<link>`, used to resolve relative item links
        base: Option<String>,
        items: Vec<WxrItem>,
    },
    Sitemap {
        urls: Vec<String>,
    },
}

/// Pre-compiled element patterns
#[derive(Debug, Clone)]
pub struct XmlReader {
    url_block: Regex,
    loc: Regex,
    channel: Regex,
    link: Regex,
    item: Regex,
    content: Regex,
}

impl XmlReader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            url_block: compile("sitemap url", r"(?is)<url>(.*?)</url>")?,
            loc: compile("sitemap loc", r"(?is)<loc>\s*([^<]+?)\s*</loc>")?,
            channel: compile("channel", r"(?is)<channel>(.*?)</channel>")?,
            link: compile("link", r"(?is)<link>\s*([^<]+?)\s*</link>")?,
            item: compile("item", r"(?is)<item>(.*?)</item>")?,
            content: compile(
                "content",
                r"(?is)<content:encoded>\s*(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?\s*</content:encoded>",
            )?,
        })
    }

    /// Recognise and read a sitemap or a WXR export
    pub fn parse(&self, xml: &str) -> Result<XmlDocument> {
        if xml.contains("<urlset") {
            let urls: Vec<String> = self
                .url_block
                .captures_iter(xml)
                .filter_map(|block| {
                    let block = block.get(1)?.as_str();
                    self.loc.captures(block)?.get(1).map(|m| m.as_str().to_string())
                })
                .collect();

            if urls.is_empty() {
                return Err(WinstonError::Ingest("Sitemap contains no <loc> urls".to_string()));
            }
            return Ok(XmlDocument::Sitemap { urls });
        }

        let channel = self
            .channel
            .captures(xml)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| {
                WinstonError::Ingest("No WXR or sitemap content found in XML".to_string())
            })?;

        // The channel's own <link> precedes its first item
        let header = channel.split("<item>").next().unwrap_or_default();
        let base = self.first_link(header);

        let items: Vec<WxrItem> = self
            .item
            .captures_iter(channel)
            .filter_map(|caps| caps.get(1))
            .map(|item| {
                let item = item.as_str();
                WxrItem {
                    link: self.first_link(item),
                    html: self
                        .content
                        .captures(item)
                        .and_then(|caps| caps.get(1))
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default(),
                }
            })
            .collect();

        if items.is_empty() {
            return Err(WinstonError::Ingest("WXR channel contains no items".to_string()));
        }

        Ok(XmlDocument::Wxr { base, items })
    }

    fn first_link(&self, xml: &str) -> Option<String> {
        self.link
            .captures(xml)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sitemap() {
        let xml = r#"<?xml version="1.0"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc>https://x.com/</loc><lastmod>2024-01-01</lastmod></url>
              <url><loc> https://x.com/work/atlas </loc></url>
              <url><lastmod>2024-01-01</lastmod></url>
            </urlset>"#;

        let reader = XmlReader::new().unwrap();
        assert_eq!(
            reader.parse(xml).unwrap(),
            XmlDocument::Sitemap {
                urls: vec!["https://x.com/".to_string(), "https://x.com/work/atlas".to_string()]
            }
        );
    }

    #[test]
    fn test_parse_wxr() {
        let xml = r#"<rss><channel>
              <title>Site</title>
              <link>https://we-rule.com</link>
              <item>
                <link>https://we-rule.com/about/</link>
                <content:encoded><![CDATA[<p>About us</p>]]></content:encoded>
              </item>
              <item>
                <link>/events/</link>
                <content:encoded>plain body</content:encoded>
              </item>
            </channel></rss>"#;

        let reader = XmlReader::new().unwrap();
        let XmlDocument::Wxr { base, items } = reader.parse(xml).unwrap() else {
            panic!("expected WXR document");
        };

        assert_eq!(base.as_deref(), Some("https://we-rule.com"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].link.as_deref(), Some("https://we-rule.com/about/"));
        assert_eq!(items[0].html, "<p>About us</p>");
        assert_eq!(items[1].html, "plain body");
    }

    #[test]
    fn test_unrecognised_xml() {
        let reader = XmlReader::new().unwrap();
        assert!(matches!(
            reader.parse("<feed></feed>"),
            Err(WinstonError::Ingest(_))
        ));
        assert!(reader.parse("<urlset></urlset>").is_err());
    }
}
