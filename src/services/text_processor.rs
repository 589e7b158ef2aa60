// Text Processing Service
// Tokenization, sentence splitting and whitespace cleanup shared by detection and humanization

use regex::Regex;
use std::sync::OnceLock;

fn sentence_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").unwrap())
}

fn sentence_fragment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn space_before_punct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+([.,;:!?])").unwrap())
}

/// Lower-case the text and split on whitespace. Punctuation stays on the tokens.
pub fn split_words_lower(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect()
}

/// Split on runs of `.`, `!`, `?`, dropping the punctuation and empty fragments.
pub fn split_sentence_fragments(text: &str) -> Vec<&str> {
    sentence_fragment_re()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split after sentence punctuation followed by whitespace, keeping the punctuation
/// attached to the sentence it ends.
///
/// Always yields at least one element; empty input gives `[""]`.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    // Rust regex has no lookbehind; cut after the punctuation byte of each break
    for m in sentence_break_re().find_iter(text) {
        let end = m.start() + 1;
        sentences.push(text[start..end].to_string());
        start = m.end();
    }
    sentences.push(text[start..].to_string());
    sentences
}

/// Collapse whitespace runs to one space and drop whitespace before `.,;:!?`.
pub fn normalize_spacing(text: &str) -> String {
    let collapsed = whitespace_re().replace_all(text, " ");
    space_before_punct_re().replace_all(&collapsed, "$1").to_string()
}

/// Non-overlapping substring occurrences.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_keeps_punctuation() {
        let sentences = split_sentences("It is sunny. Is it? Yes!  Great");
        assert_eq!(sentences, vec!["It is sunny.", "Is it?", "Yes!", "Great"]);
    }

    #[test]
    fn test_split_sentences_leaves_nul_bytes_alone() {
        let sentences = split_sentences("a\0b is here. Next one");
        assert_eq!(sentences, vec!["a\0b is here.", "Next one"]);
    }

    #[test]
    fn test_split_sentences_empty() {
        assert_eq!(split_sentences(""), vec![String::new()]);
    }

    #[test]
    fn test_split_sentence_fragments_drops_empty() {
        let fragments = split_sentence_fragments("One two... Three?! ");
        assert_eq!(fragments, vec!["One two", "Three"]);
        assert!(split_sentence_fragments("...").is_empty());
    }

    #[test]
    fn test_normalize_spacing() {
        assert_eq!(normalize_spacing("Hello  , world ."), "Hello, world.");
        assert_eq!(normalize_spacing("a\n\tb ;c"), "a b;c");
    }

    #[test]
    fn test_count_occurrences_non_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("don't won't", "n't"), 2);
        assert_eq!(count_occurrences("text", ""), 0);
    }

    #[test]
    fn test_split_words_lower() {
        assert_eq!(split_words_lower("Hello  World, hi"), vec!["hello", "world,", "hi"]);
    }
}
