//! Fixed-size text chunking with word-boundary breaks

use crate::corpus::Chunk;

/// Split page text into chunks of at most `chunk_size` characters.
///
/// When more text follows a window, the window is cut at its last space if
/// that space lies past 80% of the window; otherwise it is cut hard.
pub fn chunk_text(text: &str, url: &str, chunk_size: usize) -> Vec<Chunk> {
    if chunk_size == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let min_break = chunk_size * 4 / 5;
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let mut window = &chars[start..end];

        if end < chars.len() {
            match window.iter().rposition(|c| *c == ' ') {
                Some(space) if space > min_break => {
                    window = &window[..space];
                    start += space + 1;
                }
                _ => start = end,
            }
        } else {
            start = end;
        }

        let piece: String = window.iter().collect();
        let piece = piece.trim();
        if !piece.is_empty() {
            chunks.push(Chunk::new(url, piece));
        }
    }

    chunks
}
