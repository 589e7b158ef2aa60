// Orchestration layer
// Request-shaped entry points over the services. Transport-agnostic: each failure
// carries the HTTP-style status and JSON body a front end should return.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{ArticleBatch, GeneratedArticle, RewriteResult, ScoreResult};
use crate::services::articles::{normalize_websites, NewsClient, WebsitesInput};
use crate::services::config_store::AppConfig;
use crate::services::detection::{detector_from_config, Detector};
use crate::services::exporter::{create_docx, sanitize_filename, ExportError, DOCX_MIME};
use crate::services::generator::ArticleGenerator;
use crate::services::humanizer::{humanizer_from_config, Humanizer};
use crate::services::providers::{ProviderClient, ProviderError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Upstream(#[from] ProviderError),
    #[error("{0}")]
    Export(#[from] ExportError),
    #[error("{0}")]
    Humanize(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::Export(_) | Self::Humanize(_) => 400,
            Self::Upstream(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// JSON body for the client; the `error` key is authoritative.
    pub fn body(&self) -> serde_json::Value {
        match self {
            Self::Humanize(msg) => serde_json::json!({ "status": "error", "error": msg }),
            other => serde_json::json!({ "error": other.to_string() }),
        }
    }
}

fn require_text(text: Option<String>) -> Result<String, ApiError> {
    text.filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing text content".to_string()))
}

// ============ Requests / Responses ============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub websites: Option<WebsitesInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanizeResponse {
    pub status: String,
    pub humanized_text: String,
    pub ai_score: i32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleTextResponse {
    pub text: String,
    pub success: bool,
}

#[derive(Debug, Clone)]
pub struct DocxDownload {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanizeReport {
    pub humanized_text: String,
    pub initial_score: i32,
    pub final_score: i32,
    pub passes: u32,
    pub accepted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub title: String,
    pub source: Option<String>,
    pub generated_text: String,
    pub humanize: HumanizeReport,
    pub filename: String,
}

// ============ State ============

/// Collaborators wired from one configuration at startup.
pub struct AppState {
    pub config: AppConfig,
    pub news: NewsClient,
    pub generator: ArticleGenerator,
    pub detector: Arc<dyn Detector>,
    pub humanizer: Arc<dyn Humanizer>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Result<Self, ApiError> {
        let client = Arc::new(ProviderClient::from_config(&config)?);
        let news = NewsClient::new(client.clone(), config.news.clone());
        let generator = ArticleGenerator::new(client.clone(), config.generator.clone());
        let detector = detector_from_config(&config.detection, client.clone());
        let humanizer = humanizer_from_config(&config.humanizer, client);
        info!(
            detector = detector.name(),
            humanizer = humanizer.name(),
            max_ai_score = config.detection.max_ai_score,
            "[API] state initialized"
        );
        Ok(Self {
            config,
            news,
            generator,
            detector,
            humanizer,
        })
    }

    pub fn max_ai_score(&self) -> i32 {
        self.config.detection.max_ai_score
    }
}

// ============ Handlers ============

pub async fn get_articles(state: &AppState) -> Result<ArticleBatch, ApiError> {
    let request_id = Uuid::new_v4();
    info!(%request_id, "[API] get_articles");
    Ok(state.news.fetch_latest_articles(None).await?)
}

pub async fn search_articles(state: &AppState, req: SearchRequest) -> Result<ArticleBatch, ApiError> {
    let request_id = Uuid::new_v4();
    let websites = req
        .websites
        .filter(|w| !w.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No websites provided".to_string()))?;

    let valid = normalize_websites(websites);
    if valid.is_empty() {
        return Err(ApiError::BadRequest(
            "No valid websites provided. Please provide domain names like 'example.com'".to_string(),
        ));
    }
    info!(%request_id, domains = valid.len(), "[API] search_articles");
    Ok(state.news.fetch_latest_articles(Some(&valid)).await?)
}

pub async fn generate_article(state: &AppState, req: GenerateRequest) -> Result<GeneratedArticle, ApiError> {
    let request_id = Uuid::new_v4();
    let (title, content) = match (req.title, req.description) {
        (Some(t), Some(c)) if !t.trim().is_empty() && !c.trim().is_empty() => (t, c),
        _ => return Err(ApiError::BadRequest("Missing title or content".to_string())),
    };
    info!(%request_id, title = %title, "[API] generate_article");
    Ok(state.generator.generate_seo_article(&title, &content).await?)
}

pub async fn detect_ai(state: &AppState, req: TextRequest) -> Result<ScoreResult, ApiError> {
    let request_id = Uuid::new_v4();
    let text = require_text(req.text)?;
    let result = state.detector.detect(&text).await;
    info!(
        %request_id,
        ai_score = result.ai_score,
        classification = result.classification().as_str(),
        "[API] detect_ai"
    );
    Ok(result)
}

/// Rewrite once and report the score of the rewritten text.
pub async fn humanize_article(state: &AppState, req: TextRequest) -> Result<HumanizeResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let text = require_text(req.text)?;

    match state.humanizer.humanize(&text).await {
        RewriteResult::Success { humanized_text, .. } => {
            let detection = state.detector.detect(&humanized_text).await;
            info!(%request_id, ai_score = detection.ai_score, "[API] humanize_article");
            Ok(HumanizeResponse {
                status: "success".to_string(),
                message: format!(
                    "Content successfully humanized! AI detection score: {}%",
                    detection.ai_score
                ),
                humanized_text,
                ai_score: detection.ai_score,
            })
        }
        RewriteResult::Error { error } => {
            warn!(%request_id, "[API] humanize_article failed: {}", error);
            Err(ApiError::Humanize(error))
        }
    }
}

pub fn get_article_text(req: TextRequest) -> Result<ArticleTextResponse, ApiError> {
    let text = require_text(req.text)?;
    Ok(ArticleTextResponse { text, success: true })
}

pub fn download_docx(req: DownloadRequest) -> Result<DocxDownload, ApiError> {
    let request_id = Uuid::new_v4();
    let text = require_text(req.text)?;
    let filename = sanitize_filename(req.filename.as_deref());
    let bytes = create_docx(&text).map_err(|e| {
        warn!(%request_id, "[API] docx export failed: {}", e);
        ApiError::from(e)
    })?;
    info!(%request_id, bytes = bytes.len(), filename = %filename, "[API] download_docx");
    Ok(DocxDownload {
        filename,
        content_type: DOCX_MIME,
        bytes,
    })
}

/// Humanize until the score is at or below the acceptance threshold or passes run out.
pub async fn humanize_until_accepted(state: &AppState, text: &str) -> Result<HumanizeReport, ApiError> {
    let max_ai_score = state.max_ai_score();
    let max_passes = state.config.humanizer.max_passes;

    let initial_score = state.detector.detect(text).await.ai_score;
    let mut current = text.to_string();
    let mut score = initial_score;
    let mut passes = 0;

    while score > max_ai_score && passes < max_passes {
        current = match state.humanizer.humanize_pass(&current, passes).await {
            RewriteResult::Success { humanized_text, .. } => humanized_text,
            RewriteResult::Error { error } => return Err(ApiError::Humanize(error)),
        };
        passes += 1;
        score = state.detector.detect(&current).await.ai_score;
        info!(pass = passes, ai_score = score, "[API] humanize pass");
    }

    Ok(HumanizeReport {
        humanized_text: current,
        initial_score,
        final_score: score,
        passes,
        accepted: score <= max_ai_score,
    })
}

/// Fetch -> generate -> humanize -> export, for the article at `index`.
pub async fn run_pipeline(
    state: &AppState,
    websites: Option<WebsitesInput>,
    index: usize,
    filename: Option<&str>,
) -> Result<(PipelineReport, DocxDownload), ApiError> {
    let batch = match websites {
        Some(w) => search_articles(state, SearchRequest { websites: Some(w) }).await?,
        None => get_articles(state).await?,
    };

    let article = batch
        .articles
        .into_iter()
        .filter(|a| a.title.is_some() && a.body().is_some())
        .nth(index)
        .ok_or_else(|| ApiError::BadRequest(format!("No usable article at index {}", index)))?;
    let title = article.title.clone().unwrap_or_default();
    let body = article.body().unwrap_or_default().to_string();

    let generated = generate_article(
        state,
        GenerateRequest {
            title: Some(title.clone()),
            description: Some(body),
        },
    )
    .await?;

    let humanize = humanize_until_accepted(state, &generated.generated_text).await?;
    if !humanize.accepted {
        warn!(
            final_score = humanize.final_score,
            max_ai_score = state.max_ai_score(),
            "[API] pipeline finished above the acceptance threshold"
        );
    }

    let download = download_docx(DownloadRequest {
        text: Some(humanize.humanized_text.clone()),
        filename: filename.map(str::to_string),
    })?;

    let report = PipelineReport {
        title,
        source: article.source.name.clone(),
        generated_text: generated.generated_text,
        humanize,
        filename: download.filename.clone(),
    };
    Ok((report, download))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::config_store::StrategyKind;

    fn state() -> AppState {
        let mut config = AppConfig::default();
        config.humanizer.seed = Some(9);
        AppState::from_config(config).unwrap()
    }

    #[test]
    fn test_missing_text_is_bad_request() {
        let err = get_article_text(TextRequest { text: None }).unwrap_err();
        assert_eq!(err.status(), 400);
        assert_eq!(err.body()["error"], "Missing text content");
    }

    #[tokio::test]
    async fn test_whitespace_text_is_scored() {
        let state = state();
        let err = detect_ai(&state, TextRequest { text: Some(String::new()) }).await.unwrap_err();
        assert_eq!(err.status(), 400);

        let result = detect_ai(
            &state,
            TextRequest {
                text: Some("   ".to_string()),
            },
        )
        .await
        .unwrap();
        assert!((40..=60).contains(&result.ai_score));
        assert_eq!(result.analysis.text_metrics.word_count, 0);
    }

    #[test]
    fn test_get_article_text_echoes() {
        let resp = get_article_text(TextRequest {
            text: Some("Body".to_string()),
        })
        .unwrap();
        assert_eq!(resp.text, "Body");
        assert!(resp.success);
    }

    #[test]
    fn test_download_docx_defaults() {
        let download = download_docx(DownloadRequest {
            text: Some("Exported text.".to_string()),
            filename: None,
        })
        .unwrap();
        assert_eq!(download.filename, "article.docx");
        assert_eq!(download.content_type, DOCX_MIME);
        assert!(!download.bytes.is_empty());
    }

    #[test]
    fn test_export_error_maps_to_client_error() {
        let err = ApiError::from(ExportError::Pack("disk full".to_string()));
        assert_eq!(err.status(), 400);
        assert_eq!(err.body()["error"], "Error creating document: disk full");
    }

    #[test]
    fn test_upstream_error_status() {
        let err = ApiError::from(ProviderError::MissingApiKey("News"));
        assert_eq!(err.status(), 502);
        assert_eq!(err.body()["error"], "News API key is not configured.");
    }

    #[tokio::test]
    async fn test_search_validation() {
        let state = state();
        let err = search_articles(&state, SearchRequest::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "No websites provided");

        let err = search_articles(
            &state,
            SearchRequest {
                websites: Some(WebsitesInput::Csv("localhost, intranet".to_string())),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(err.to_string().starts_with("No valid websites provided"));
    }

    #[tokio::test]
    async fn test_generate_requires_title_and_content() {
        let state = state();
        let err = generate_article(
            &state,
            GenerateRequest {
                title: Some("Title".to_string()),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing title or content");
    }

    #[tokio::test]
    async fn test_humanize_article_reports_rescore() {
        let state = state();
        let text = "It is a long day for the market. Traders do not expect relief. They are watching the bank closely.";
        let resp = humanize_article(
            &state,
            TextRequest {
                text: Some(text.to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status, "success");
        assert!((1..=99).contains(&resp.ai_score));
        assert!(resp.message.ends_with(&format!("{}%", resp.ai_score)));
    }

    #[tokio::test]
    async fn test_humanize_failure_is_400_with_status() {
        let mut config = AppConfig::default();
        config.humanizer.probabilities.question = 2.0;
        config.humanizer.strategy = StrategyKind::Local;
        let state = AppState::from_config(config).unwrap();
        let err = humanize_article(
            &state,
            TextRequest {
                text: Some("Some long enough text here.".to_string()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), 400);
        assert_eq!(err.body()["status"], "error");
    }

    #[tokio::test]
    async fn test_humanize_loop_stops_when_passes_run_out() {
        let mut config = AppConfig::default();
        config.humanizer.seed = Some(1);
        config.humanizer.max_passes = 2;
        let state = AppState::from_config(config).unwrap();
        // short text is held in [40, 60], never accepted at threshold 10
        let report = humanize_until_accepted(&state, "It is a short text.").await.unwrap();
        assert_eq!(report.passes, 2);
        assert!(!report.accepted);
        assert!((40..=60).contains(&report.final_score));
    }

    struct PassRecorder(std::sync::Mutex<Vec<u32>>);

    #[async_trait::async_trait]
    impl Humanizer for PassRecorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        async fn humanize_pass(&self, text: &str, pass: u32) -> RewriteResult {
            self.0.lock().unwrap().push(pass);
            RewriteResult::success(text.to_string(), "ok")
        }
    }

    #[tokio::test]
    async fn test_humanize_loop_numbers_each_pass() {
        let mut state = state();
        let recorder = Arc::new(PassRecorder(std::sync::Mutex::new(Vec::new())));
        state.humanizer = recorder.clone();
        let report = humanize_until_accepted(&state, "It is a short text.").await.unwrap();
        assert_eq!(report.passes, 3);
        assert_eq!(*recorder.0.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_humanize_loop_skips_when_already_accepted() {
        let mut config = AppConfig::default();
        config.detection.max_ai_score = 99;
        let state = AppState::from_config(config).unwrap();
        let report = humanize_until_accepted(&state, "It is a short text.").await.unwrap();
        assert_eq!(report.passes, 0);
        assert!(report.accepted);
        assert_eq!(report.humanized_text, "It is a short text.");
    }
}
