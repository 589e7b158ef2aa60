// Score Synthesizer
// Turns a FeatureSet into a bounded AI score and a classification band.
// Adjustments are summed from a neutral baseline; none depends on another.

use crate::models::{Classification, FeatureSet, ScoreAnalysis, ScoreResult, TextMetrics};

pub const LOCAL_METHOD: &str = "enhanced_local_analysis";

const BASELINE_SCORE: i32 = 50;
const LIKELY_AI_ABOVE: i32 = 75;
const POSSIBLY_AI_ABOVE: i32 = 40;
const SHORT_TEXT_WORDS: usize = 50;
const SHORT_TEXT_RANGE: (i32, i32) = (40, 60);
const SCORE_RANGE: (i32, i32) = (1, 99);

fn vocabulary_adjustment(diversity: f64) -> i32 {
    if diversity > 0.7 {
        -15
    } else if diversity > 0.5 {
        -8
    } else if diversity < 0.3 {
        10
    } else {
        0
    }
}

fn variation_adjustment(std_dev: f64, sentence_count: usize) -> i32 {
    if std_dev > 8.0 {
        -10
    } else if std_dev < 3.0 && sentence_count > 5 {
        12
    } else {
        0
    }
}

fn repetition_adjustment(ratio: f64) -> i32 {
    if ratio > 0.2 {
        12
    } else if ratio < 0.05 {
        -5
    } else {
        0
    }
}

fn contraction_adjustment(ratio: f64, word_count: usize) -> i32 {
    if ratio > 0.02 {
        -10
    } else if ratio < 0.005 && word_count > 200 {
        8
    } else {
        0
    }
}

fn common_word_adjustment(ratio: f64) -> i32 {
    if ratio > 0.7 {
        10
    } else if ratio < 0.4 {
        -8
    } else {
        0
    }
}

/// Raw AI score before clamping.
pub fn raw_score(f: &FeatureSet) -> i32 {
    let mut score = BASELINE_SCORE;
    score += vocabulary_adjustment(f.vocabulary_diversity);
    score += variation_adjustment(f.sentence_length_std, f.sentence_count);
    if f.filler_ratio > 0.01 {
        score -= 8;
    }
    if f.transition_ratio > 0.1 {
        score -= 7;
    }
    score += repetition_adjustment(f.repetition_ratio);
    score += contraction_adjustment(f.contraction_ratio, f.word_count);
    score += common_word_adjustment(f.common_word_ratio);
    score
}

/// Final AI score: short texts are held near neutral, everything lands in [1, 99].
pub fn synthesize_score(f: &FeatureSet) -> i32 {
    let mut score = raw_score(f);
    if f.word_count < SHORT_TEXT_WORDS {
        score = score.clamp(SHORT_TEXT_RANGE.0, SHORT_TEXT_RANGE.1);
    }
    score.clamp(SCORE_RANGE.0, SCORE_RANGE.1)
}

/// Band for a final score. `max_ai_score` is the lowest boundary.
pub fn classify(ai_score: i32, max_ai_score: i32) -> Classification {
    if ai_score > LIKELY_AI_ABOVE {
        Classification::LikelyAi
    } else if ai_score > POSSIBLY_AI_ABOVE {
        Classification::PossiblyAi
    } else if ai_score > max_ai_score {
        Classification::SlightlyAi
    } else {
        Classification::LikelyHuman
    }
}

fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn display_metrics(f: &FeatureSet) -> TextMetrics {
    TextMetrics {
        vocabulary_diversity: Some(percent(f.vocabulary_diversity)),
        avg_sentence_length: Some(one_decimal(f.avg_sentence_length)),
        sentence_length_variation: Some(one_decimal(f.sentence_length_std)),
        word_count: f.word_count,
        sentence_count: Some(f.sentence_count),
        repetition_index: Some(percent(f.repetition_ratio)),
        contraction_usage: Some(percent(f.contraction_ratio)),
        filler_word_usage: Some(percent(f.filler_ratio)),
    }
}

/// Build the full result for an already-bounded score.
pub fn build_result(ai_score: i32, max_ai_score: i32, method: &str, text_metrics: TextMetrics) -> ScoreResult {
    ScoreResult {
        ai_score,
        human_score: 100 - ai_score,
        analysis: ScoreAnalysis {
            overall_classification: classify(ai_score, max_ai_score),
            method: method.to_string(),
            text_metrics,
        },
    }
}

pub fn score_features(f: &FeatureSet, max_ai_score: i32) -> ScoreResult {
    build_result(synthesize_score(f), max_ai_score, LOCAL_METHOD, display_metrics(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_features(word_count: usize) -> FeatureSet {
        // Every feature sits inside its "no adjustment" band.
        FeatureSet {
            word_count,
            sentence_count: 4,
            unique_word_count: word_count / 2,
            vocabulary_diversity: 0.4,
            avg_sentence_length: 10.0,
            sentence_length_std: 5.0,
            common_word_ratio: 0.5,
            filler_ratio: 0.0,
            transition_ratio: 0.0,
            repetition_ratio: 0.1,
            contraction_ratio: 0.01,
        }
    }

    #[test]
    fn test_neutral_features_stay_at_baseline() {
        assert_eq!(raw_score(&neutral_features(120)), 50);
    }

    #[test]
    fn test_all_human_signals() {
        let f = FeatureSet {
            vocabulary_diversity: 0.8,
            sentence_length_std: 9.0,
            filler_ratio: 0.02,
            transition_ratio: 0.2,
            repetition_ratio: 0.01,
            contraction_ratio: 0.05,
            common_word_ratio: 0.1,
            ..neutral_features(300)
        };
        // 50 - 15 - 10 - 8 - 7 - 5 - 10 - 8
        assert_eq!(raw_score(&f), -13);
        assert_eq!(synthesize_score(&f), 1);
    }

    #[test]
    fn test_all_ai_signals() {
        let f = FeatureSet {
            vocabulary_diversity: 0.2,
            sentence_length_std: 1.0,
            sentence_count: 10,
            repetition_ratio: 0.5,
            contraction_ratio: 0.0,
            common_word_ratio: 0.9,
            ..neutral_features(300)
        };
        // 50 + 10 + 12 + 12 + 8 + 10
        assert_eq!(raw_score(&f), 102);
        assert_eq!(synthesize_score(&f), 99);
    }

    #[test]
    fn test_low_variation_needs_more_than_five_sentences() {
        let f = FeatureSet {
            sentence_length_std: 1.0,
            sentence_count: 5,
            ..neutral_features(120)
        };
        assert_eq!(raw_score(&f), 50);
    }

    #[test]
    fn test_missing_contractions_only_count_for_long_texts() {
        let f = FeatureSet {
            contraction_ratio: 0.0,
            ..neutral_features(200)
        };
        assert_eq!(raw_score(&f), 50);
        let f = FeatureSet {
            contraction_ratio: 0.0,
            ..neutral_features(201)
        };
        assert_eq!(raw_score(&f), 58);
    }

    #[test]
    fn test_diversity_boundary() {
        let at = FeatureSet {
            vocabulary_diversity: 0.7,
            ..neutral_features(120)
        };
        assert_eq!(raw_score(&at), 42);
    }

    #[test]
    fn test_short_text_clamped_to_neutral_band() {
        let f = FeatureSet {
            vocabulary_diversity: 0.9,
            filler_ratio: 0.2,
            contraction_ratio: 0.2,
            ..neutral_features(10)
        };
        assert!(raw_score(&f) < 40);
        assert_eq!(synthesize_score(&f), 40);
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify(76, 10), Classification::LikelyAi);
        assert_eq!(classify(75, 10), Classification::PossiblyAi);
        assert_eq!(classify(41, 10), Classification::PossiblyAi);
        assert_eq!(classify(40, 10), Classification::SlightlyAi);
        assert_eq!(classify(11, 10), Classification::SlightlyAi);
        assert_eq!(classify(10, 10), Classification::LikelyHuman);
        assert_eq!(classify(1, 10), Classification::LikelyHuman);
    }

    #[test]
    fn test_classification_uses_configured_threshold() {
        assert_eq!(classify(15, 20), Classification::LikelyHuman);
        assert_eq!(classify(15, 10), Classification::SlightlyAi);
    }

    #[test]
    fn test_display_metrics_rounding() {
        let f = FeatureSet {
            vocabulary_diversity: 0.456,
            avg_sentence_length: 12.345,
            sentence_length_std: 3.26,
            ..neutral_features(120)
        };
        let m = display_metrics(&f);
        assert_eq!(m.vocabulary_diversity, Some(46));
        assert_eq!(m.avg_sentence_length, Some(12.3));
        assert_eq!(m.sentence_length_variation, Some(3.3));
        assert_eq!(m.contraction_usage, Some(1));
    }
}
