// News Humanizer Data Models
// Wire shapes shared by the services and the api layer

use serde::{Deserialize, Serialize};

// ============ Detection ============

/// Statistical features derived from a single text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FeatureSet {
    pub word_count: usize,
    pub sentence_count: usize,
    pub unique_word_count: usize,
    pub vocabulary_diversity: f64,
    pub avg_sentence_length: f64,
    pub sentence_length_std: f64,
    pub common_word_ratio: f64,
    pub filler_ratio: f64,
    pub transition_ratio: f64,
    pub repetition_ratio: f64,
    pub contraction_ratio: f64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    LikelyAi,
    PossiblyAi,
    SlightlyAi,
    LikelyHuman,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LikelyAi => "likely_ai",
            Self::PossiblyAi => "possibly_ai",
            Self::SlightlyAi => "slightly_ai",
            Self::LikelyHuman => "likely_human",
        }
    }
}

/// Display subset of the features. Remote detectors only report `word_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_diversity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_sentence_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_length_variation: Option<f64>,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contraction_usage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filler_word_usage: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAnalysis {
    pub overall_classification: Classification,
    pub method: String,
    pub text_metrics: TextMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub ai_score: i32,
    pub human_score: i32,
    pub analysis: ScoreAnalysis,
}

impl ScoreResult {
    pub fn classification(&self) -> Classification {
        self.analysis.overall_classification
    }
}

// ============ Humanization ============

/// Outcome of a rewrite. Callers must check the variant before reading text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RewriteResult {
    Success {
        humanized_text: String,
        message: String,
    },
    Error {
        error: String,
    },
}

impl RewriteResult {
    pub fn success(humanized_text: String, message: impl Into<String>) -> Self {
        Self::Success {
            humanized_text,
            message: message.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn humanized_text(&self) -> Option<&str> {
        match self {
            Self::Success { humanized_text, .. } => Some(humanized_text),
            Self::Error { .. } => None,
        }
    }
}

// ============ Articles ============

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: ArticleSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Article {
    /// Body text handed to the generator: description, else content.
    pub fn body(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.content.as_deref().filter(|s| !s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBatch {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_results: i64,
    #[serde(default)]
    pub articles: Vec<Article>,
}

// ============ Generation ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedArticle {
    pub generated_text: String,
}
