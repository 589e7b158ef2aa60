// Feature Extractor
// Derives the statistical features the score synthesizer consumes.
// Total over any input: every ratio divides by at least 1.

use std::collections::HashMap;

use crate::models::FeatureSet;
use crate::services::text_processor::{count_occurrences, split_sentence_fragments, split_words_lower};

/// Single-token fillers match whole tokens only, so the multi-word entries never fire.
const FILLER_WORDS: &[&str] = &[
    "well", "actually", "basically", "honestly", "like", "you know", "I mean", "sort of", "kind of",
];

const TRANSITION_PHRASES: &[&str] = &[
    "however",
    "moreover",
    "nevertheless",
    "in addition",
    "on the other hand",
    "for instance",
];

const CONTRACTION_MARKS: &[&str] = &["'s", "'re", "'ve", "'ll", "'d", "n't"];

fn floor_one(n: usize) -> f64 {
    n.max(1) as f64
}

pub fn extract_features(text: &str) -> FeatureSet {
    let words = split_words_lower(text);
    let word_count = words.len();

    let sentences = split_sentence_fragments(text);
    let sentence_count = sentences.len();

    let mut word_freq: HashMap<&str, usize> = HashMap::new();
    for w in &words {
        *word_freq.entry(w.as_str()).or_insert(0) += 1;
    }
    let unique_word_count = word_freq.len();
    let vocabulary_diversity = unique_word_count as f64 / floor_one(word_count);

    let sentence_lengths: Vec<usize> = sentences
        .iter()
        .map(|s| s.split_whitespace().count())
        .collect();
    let avg_sentence_length =
        sentence_lengths.iter().sum::<usize>() as f64 / floor_one(sentence_lengths.len());
    let sentence_length_std = if sentence_lengths.len() > 1 {
        let variance = sentence_lengths
            .iter()
            .map(|&len| (len as f64 - avg_sentence_length).powi(2))
            .sum::<f64>()
            / sentence_lengths.len() as f64;
        variance.sqrt()
    } else {
        0.0
    };

    let common_word_ratio =
        word_freq.values().filter(|&&c| c > 2).count() as f64 / floor_one(unique_word_count);

    let filler_count: usize = FILLER_WORDS
        .iter()
        .map(|filler| words.iter().filter(|w| w.as_str() == *filler).count())
        .sum();
    let filler_ratio = filler_count as f64 / floor_one(word_count);

    let lowered = text.to_lowercase();
    let transition_count: usize = TRANSITION_PHRASES
        .iter()
        .map(|phrase| count_occurrences(&lowered, phrase))
        .sum();
    let transition_ratio = transition_count as f64 / floor_one(sentence_count);

    let repetition_ratio = repeated_bigram_ratio(&words);

    let contraction_count: usize = CONTRACTION_MARKS
        .iter()
        .map(|mark| count_occurrences(text, mark))
        .sum();
    let contraction_ratio = contraction_count as f64 / floor_one(word_count);

    FeatureSet {
        word_count,
        sentence_count,
        unique_word_count,
        vocabulary_diversity,
        avg_sentence_length,
        sentence_length_std,
        common_word_ratio,
        filler_ratio,
        transition_ratio,
        repetition_ratio,
        contraction_ratio,
    }
}

/// Distinct adjacent bigrams seen more than once, over all distinct bigrams.
fn repeated_bigram_ratio(words: &[String]) -> f64 {
    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    for pair in words.windows(2) {
        *counts.entry((pair[0].as_str(), pair[1].as_str())).or_insert(0) += 1;
    }
    let repeated = counts.values().filter(|&&c| c > 1).count();
    repeated as f64 / floor_one(counts.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_text_is_total() {
        let f = extract_features("");
        assert_eq!(f.word_count, 0);
        assert_eq!(f.sentence_count, 0);
        assert!(approx(f.vocabulary_diversity, 0.0));
        assert!(approx(f.avg_sentence_length, 0.0));
        assert!(approx(f.sentence_length_std, 0.0));
        assert!(approx(f.repetition_ratio, 0.0));
    }

    #[test]
    fn test_single_word() {
        let f = extract_features("Hello");
        assert_eq!(f.word_count, 1);
        assert_eq!(f.sentence_count, 1);
        assert!(approx(f.vocabulary_diversity, 1.0));
        assert!(approx(f.avg_sentence_length, 1.0));
    }

    #[test]
    fn test_population_std_dev() {
        // lengths 2 and 4: mean 3, population std 1
        let f = extract_features("One two. Three four five six.");
        assert_eq!(f.sentence_count, 2);
        assert!(approx(f.avg_sentence_length, 3.0));
        assert!(approx(f.sentence_length_std, 1.0));
    }

    #[test]
    fn test_common_word_ratio_counts_words_seen_more_than_twice() {
        // "the" x3 out of distinct {the, cat, dog, bird}
        let f = extract_features("the cat the dog the bird");
        assert_eq!(f.unique_word_count, 4);
        assert!(approx(f.common_word_ratio, 0.25));
    }

    #[test]
    fn test_filler_tokens_match_exactly() {
        let f = extract_features("well I like it, actually. Well, kind of");
        // "well", "like", "actually." has a trailing dot so it does not match
        assert_eq!(f.word_count, 8);
        assert!(approx(f.filler_ratio, 2.0 / 8.0));
    }

    #[test]
    fn test_transition_ratio_uses_sentence_count() {
        let f = extract_features("However it rained. Moreover, in addition, it snowed.");
        assert_eq!(f.sentence_count, 2);
        assert!(approx(f.transition_ratio, 1.5));
    }

    #[test]
    fn test_repetition_ratio() {
        // bigrams: (a b) x2, (b a) x1 -> 1 of 2 distinct repeated
        let f = extract_features("a b a b");
        assert!(approx(f.repetition_ratio, 0.5));
    }

    #[test]
    fn test_contraction_ratio_is_case_sensitive_on_original_text() {
        let f = extract_features("It's fine. We don't know. They'll see");
        assert_eq!(f.word_count, 7);
        assert!(approx(f.contraction_ratio, 3.0 / 7.0));
    }
}
