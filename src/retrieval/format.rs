//! Context block handed to the generation step

use crate::retrieval::ScoredChunk;

/// Returned when there is nothing to cite
pub const NO_CONTEXT: &str = "No relevant context found.";

/// Render results as numbered, citable entries:
///
/// ```text
/// [1] Title — https://site.com/title
/// chunk text
///
/// [2] ...
/// ```
pub fn format_context(results: &[ScoredChunk]) -> String {
    if results.is_empty() {
        return NO_CONTEXT.to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(idx, result)| {
            let title = result
                .chunk
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| derive_title(&result.chunk.url));
            format!(
                "[{}] {} — {}\n{}",
                idx + 1,
                title,
                result.chunk.url,
                result.chunk.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fallback title for urls without a path segment
const DEFAULT_TITLE: &str = "Page";

/// Title from the last non-empty path segment of a url: hyphens become
/// spaces and the first letter is capitalised. The host never counts as a
/// segment; urls without one are titled "Page".
pub fn derive_title(url: &str) -> String {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map(str::to_string),
        Err(_) => url
            .split('/')
            .rev()
            .find(|s| !s.is_empty())
            .map(str::to_string),
    };

    let Some(segment) = segment else {
        return DEFAULT_TITLE.to_string();
    };

    let spaced = segment.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => DEFAULT_TITLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Chunk;

    #[test]
    fn test_empty_is_sentinel() {
        assert_eq!(format_context(&[]), "No relevant context found.");
    }

    #[test]
    fn test_numbered_entries() {
        let results = vec![
            ScoredChunk::normalized(
                Chunk::new("https://x.com/work/product-strategy", "Roadmaps and OKRs."),
                1.0,
            ),
            ScoredChunk::normalized(
                Chunk::new("https://x.com/about", "Who we are.").with_title("About us"),
                0.5,
            ),
        ];

        assert_eq!(
            format_context(&results),
            "[1] Product strategy — https://x.com/work/product-strategy\nRoadmaps and OKRs.\n\n\
             [2] About us — https://x.com/about\nWho we are."
        );
    }

    #[test]
    fn test_derive_title() {
        assert_eq!(derive_title("https://x.com/case-study/"), "Case study");
        assert_eq!(derive_title("https://x.com/work/voice-assistant?ref=nav"), "Voice assistant");
        assert_eq!(derive_title("about"), "About");
    }

    #[test]
    fn test_derive_title_without_path_segment() {
        assert_eq!(derive_title("https://x.com/"), "Page");
        assert_eq!(derive_title("https://x.com"), "Page");
        assert_eq!(derive_title(""), "Page");
        assert_eq!(derive_title("///"), "Page");
    }

    #[test]
    fn test_blank_title_falls_back_to_url() {
        let results = vec![ScoredChunk::boosted(
            Chunk::new("https://x.com/services", "Design.").with_title("  "),
            2.0,
        )];
        assert!(format_context(&results).starts_with("[1] Services — "));
    }
}
