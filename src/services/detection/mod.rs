// Detection Module
// Heuristic AI-likeness scoring organized into:
// - features: statistical feature extraction
// - scoring: score synthesis and classification bands
// - strategy: local / remote detector strategies

pub mod features;
pub mod scoring;
pub mod strategy;

pub use features::extract_features;
pub use scoring::{classify, score_features, synthesize_score, LOCAL_METHOD};
pub use strategy::{detector_from_config, Detector, LocalDetector, RemoteDetector};

use crate::models::ScoreResult;
use crate::services::config_store::DEFAULT_MAX_AI_SCORE;

/// Score a text with the default threshold. Total: never fails.
pub fn score(text: &str) -> ScoreResult {
    score_with_threshold(text, DEFAULT_MAX_AI_SCORE)
}

pub fn score_with_threshold(text: &str, max_ai_score: i32) -> ScoreResult {
    score_features(&extract_features(text), max_ai_score)
}
