/// Lower-case `text` and split it on runs of characters outside `[A-Za-z0-9_]`.
///
/// Accepts `&str` or `Option<&str>`; `None` and empty input give no tokens.
pub fn tokenize<'a>(text: impl Into<Option<&'a str>>) -> Vec<String> {
    let Some(text) = text.into() else {
        return Vec::new();
    };

    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn test_empty_and_none() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(None).is_empty());
        assert!(tokenize("  ,.!? ").is_empty());
    }

    #[test]
    fn test_keeps_digits_and_underscores() {
        assert_eq!(
            tokenize("snake_case v2 -- API_KEY"),
            vec!["snake_case", "v2", "api_key"]
        );
    }

    #[test]
    fn test_non_ascii_letters_are_separators() {
        assert_eq!(tokenize("café-au-lait"), vec!["caf", "au", "lait"]);
    }

    #[test]
    fn test_keeps_duplicates_in_order() {
        assert_eq!(tokenize("go Go GO"), vec!["go", "go", "go"]);
    }
}
