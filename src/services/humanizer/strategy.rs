// Humanization strategies
// The local rewriter is always available; the remote humanizer falls back to it on any failure.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::RewriteResult;
use crate::services::config_store::{HumanizerConfig, StrategyKind};
use crate::services::providers::{ProviderClient, ProviderError};

use super::random::{RandomSource, SeededRandom};
use super::rewriter::Rewriter;

pub const LOCAL_SUCCESS_MESSAGE: &str = "Text successfully humanized using local processing";
pub const REMOTE_SUCCESS_MESSAGE: &str = "Text successfully humanized";
const REMOTE_TONE: &str = "professional";

#[async_trait]
pub trait Humanizer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn humanize(&self, text: &str) -> RewriteResult {
        self.humanize_pass(text, 0).await
    }

    /// One pass of a multi-pass loop. Seeded humanizers draw a different sequence per pass.
    async fn humanize_pass(&self, text: &str, pass: u32) -> RewriteResult;
}

#[derive(Debug, Clone, Default)]
pub struct LocalHumanizer {
    config: HumanizerConfig,
}

impl LocalHumanizer {
    pub fn new(config: HumanizerConfig) -> Self {
        Self { config }
    }

    /// Rewrite with a fresh random source (seeded when the config carries a seed).
    pub fn rewrite(&self, text: &str) -> RewriteResult {
        self.rewrite_pass(text, 0)
    }

    /// As `rewrite`, with the configured seed offset by `pass`.
    pub fn rewrite_pass(&self, text: &str, pass: u32) -> RewriteResult {
        let seed = self.config.seed.map(|s| s.wrapping_add(u64::from(pass)));
        let mut rng = SeededRandom::from_optional_seed(seed);
        self.rewrite_with(text, &mut rng)
    }

    pub fn rewrite_with<R: RandomSource + ?Sized>(&self, text: &str, rng: &mut R) -> RewriteResult {
        match Rewriter::new(&self.config) {
            Ok(rewriter) => RewriteResult::success(rewriter.rewrite(text, rng), LOCAL_SUCCESS_MESSAGE),
            Err(e) => {
                warn!("[HUMANIZE] local humanization failed: {}", e);
                RewriteResult::error(format!("Local humanization failed: {}", e))
            }
        }
    }
}

#[async_trait]
impl Humanizer for LocalHumanizer {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn humanize_pass(&self, text: &str, pass: u32) -> RewriteResult {
        self.rewrite_pass(text, pass)
    }
}

pub struct RemoteHumanizer {
    client: Arc<ProviderClient>,
    url: String,
    api_key: Option<String>,
    local: LocalHumanizer,
}

impl RemoteHumanizer {
    pub fn new(client: Arc<ProviderClient>, config: &HumanizerConfig) -> Self {
        Self {
            client,
            url: config.remote_url.clone(),
            api_key: config.remote_api_key.clone(),
            local: LocalHumanizer::new(config.clone()),
        }
    }

    async fn humanize_remote(&self, text: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("Humanizer"))?;
        self.client.call_humanizer(&self.url, api_key, text, REMOTE_TONE).await
    }
}

#[async_trait]
impl Humanizer for RemoteHumanizer {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn humanize_pass(&self, text: &str, pass: u32) -> RewriteResult {
        match self.humanize_remote(text).await {
            Ok(humanized) => {
                info!("[HUMANIZE] remote humanizer returned {} chars", humanized.len());
                RewriteResult::success(humanized, REMOTE_SUCCESS_MESSAGE)
            }
            Err(e) => {
                warn!("[HUMANIZE] remote humanizer failed, using local rewriter: {}", e);
                self.local.rewrite_pass(text, pass)
            }
        }
    }
}

pub fn humanizer_from_config(config: &HumanizerConfig, client: Arc<ProviderClient>) -> Arc<dyn Humanizer> {
    match config.strategy {
        StrategyKind::Local => Arc::new(LocalHumanizer::new(config.clone())),
        StrategyKind::Remote => Arc::new(RemoteHumanizer::new(client, config)),
    }
}
