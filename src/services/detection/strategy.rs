// Detection strategies
// Local heuristic scoring is always available; the remote detector falls back to it on any failure.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::{ScoreResult, TextMetrics};
use crate::services::config_store::{DetectionConfig, StrategyKind};
use crate::services::providers::{ProviderClient, ProviderError};

use super::features::extract_features;
use super::scoring::{build_result, score_features};

pub const REMOTE_METHOD: &str = "gptzero";

#[async_trait]
pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Never fails; a populated result comes back for any input.
    async fn detect(&self, text: &str) -> ScoreResult;
}

#[derive(Debug, Clone, Copy)]
pub struct LocalDetector {
    max_ai_score: i32,
}

impl LocalDetector {
    pub fn new(max_ai_score: i32) -> Self {
        Self { max_ai_score }
    }

    pub fn score(&self, text: &str) -> ScoreResult {
        score_features(&extract_features(text), self.max_ai_score)
    }
}

#[async_trait]
impl Detector for LocalDetector {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn detect(&self, text: &str) -> ScoreResult {
        self.score(text)
    }
}

pub struct RemoteDetector {
    client: Arc<ProviderClient>,
    url: String,
    api_key: Option<String>,
    local: LocalDetector,
}

impl RemoteDetector {
    pub fn new(client: Arc<ProviderClient>, config: &DetectionConfig) -> Self {
        Self {
            client,
            url: config.remote_url.clone(),
            api_key: config.remote_api_key.clone(),
            local: LocalDetector::new(config.max_ai_score),
        }
    }

    async fn detect_remote(&self, text: &str) -> Result<ScoreResult, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("GPTZero"))?;
        let prob = self.client.call_gptzero(&self.url, api_key, text).await?;
        let ai_score = ((prob * 100.0).round() as i32).clamp(1, 99);
        let metrics = TextMetrics {
            word_count: text.split_whitespace().count(),
            ..Default::default()
        };
        Ok(build_result(ai_score, self.local.max_ai_score, REMOTE_METHOD, metrics))
    }
}

#[async_trait]
impl Detector for RemoteDetector {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn detect(&self, text: &str) -> ScoreResult {
        match self.detect_remote(text).await {
            Ok(result) => {
                info!("[DETECT] remote ai_score={}", result.ai_score);
                result
            }
            Err(e) => {
                warn!("[DETECT] remote detector failed, using local analysis: {}", e);
                self.local.score(text)
            }
        }
    }
}

pub fn detector_from_config(config: &DetectionConfig, client: Arc<ProviderClient>) -> Arc<dyn Detector> {
    match config.strategy {
        StrategyKind::Local => Arc::new(LocalDetector::new(config.max_ai_score)),
        StrategyKind::Remote => Arc::new(RemoteDetector::new(client, config)),
    }
}
