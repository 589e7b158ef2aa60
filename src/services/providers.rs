// External API Provider Service
// Low-level HTTP calls to NewsAPI, Gemini, and the optional remote detector / humanizer

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::models::ArticleBatch;
use crate::services::config_store::AppConfig;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network Error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Missing content in response")]
    MissingContent,
    #[error("JSON parse error: {0}")]
    JsonError(String),
    #[error("{0} API key is not configured.")]
    MissingApiKey(&'static str),
    #[error("Remote service rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResult {
    pub content: String,
    pub latency_ms: i64,
}

pub struct ProviderClient {
    client: Client,
}

impl Default for ProviderClient {
    fn default() -> Self {
        Self::new(60)
    }
}

impl ProviderClient {
    pub fn new(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    pub fn with_proxy(proxy_url: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        let proxy = reqwest::Proxy::all(proxy_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .proxy(proxy)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        match config.proxy.as_ref().and_then(|p| p.active_url()) {
            Some(url) => Self::with_proxy(url, config.timeout_secs),
            None => Ok(Self::new(config.timeout_secs)),
        }
    }

    /// NewsAPI `everything` search restricted to the given comma-joined domains.
    pub async fn get_news(
        &self,
        url: &str,
        api_key: &str,
        domains: &str,
        language: &str,
        page_size: u32,
    ) -> Result<ArticleBatch, ProviderError> {
        let page_size = page_size.to_string();
        let response = self
            .client
            .get(url)
            .query(&[
                ("domains", domains),
                ("language", language),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        response
            .json::<ArticleBatch>()
            .await
            .map_err(|e| ProviderError::JsonError(e.to_string()))
    }

    /// Gemini `generateContent` with a single user prompt.
    pub async fn call_gemini(
        &self,
        base_url: &str,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> Result<ChatResult, ProviderError> {
        #[derive(Deserialize)]
        struct GeminiResponse {
            candidates: Option<Vec<GeminiCandidate>>,
        }

        #[derive(Deserialize)]
        struct GeminiCandidate {
            content: Option<GeminiContent>,
        }

        #[derive(Deserialize)]
        struct GeminiContent {
            #[serde(default)]
            parts: Vec<GeminiPart>,
        }

        #[derive(Deserialize)]
        struct GeminiPart {
            text: Option<String>,
        }

        let url = format!("{}/models/{}:generateContent", base_url.trim_end_matches('/'), model);
        let request = serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}]
        });

        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let latency_ms = start.elapsed().as_millis() as i64;
        let response = ensure_success(response).await?;

        let data: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::JsonError(e.to_string()))?;

        // Multi-part answers are concatenated in order
        let content: String = data
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ProviderError::MissingContent);
        }

        Ok(ChatResult { content, latency_ms })
    }

    /// GPTZero-style detector. Returns the completely-generated probability in [0, 1].
    pub async fn call_gptzero(&self, url: &str, api_key: &str, text: &str) -> Result<f64, ProviderError> {
        let response = self
            .client
            .post(url)
            .header("x-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "document": text }))
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::JsonError(e.to_string()))?;

        Ok(parse_generated_probability(&data))
    }

    /// Ghost-AI-style humanizer. Only a `status: success` answer counts.
    pub async fn call_humanizer(
        &self,
        url: &str,
        api_key: &str,
        text: &str,
        tone: &str,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "text": text, "tone": tone }))
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::JsonError(e.to_string()))?;

        parse_humanizer_response(&data)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::ApiError {
        status: status.as_u16(),
        message: extract_error_message(&body),
    })
}

/// Prefer the `message` field of a JSON error body, else the raw body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v["message"]
                .as_str()
                .or_else(|| v["error"]["message"].as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}

/// `documents` may be an object or a one-element array; a missing value reads as 0.5.
fn parse_generated_probability(data: &serde_json::Value) -> f64 {
    let documents = &data["documents"];
    let doc = if documents.is_array() { &documents[0] } else { documents };
    doc["completely_generated_prob"]
        .as_f64()
        .unwrap_or(0.5)
        .clamp(0.0, 1.0)
}

fn parse_humanizer_response(data: &serde_json::Value) -> Result<String, ProviderError> {
    let status = data["status"].as_str().unwrap_or_default();
    if status != "success" {
        let reason = data["error"]
            .as_str()
            .or_else(|| data["message"].as_str())
            .unwrap_or("unexpected status");
        return Err(ProviderError::Rejected(reason.to_string()));
    }
    data["humanized_text"]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
        .ok_or(ProviderError::MissingContent)
}
