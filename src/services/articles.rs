// Article Source
// Fetches the latest articles for a set of news domains from NewsAPI

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::ArticleBatch;
use crate::services::config_store::NewsConfig;
use crate::services::providers::{ProviderClient, ProviderError};

/// Website list as sent by clients: a JSON list or a comma-separated string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WebsitesInput {
    List(Vec<String>),
    Csv(String),
}

impl WebsitesInput {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Csv(s) => s.trim().is_empty(),
        }
    }

    fn into_entries(self) -> Vec<String> {
        match self {
            Self::List(items) => items,
            Self::Csv(s) => s.split(',').map(|site| site.trim().to_string()).collect(),
        }
    }
}

/// Keep bare domain names and reduce `http(s)://` URLs to their host.
pub fn normalize_websites(input: WebsitesInput) -> Vec<String> {
    let mut valid = Vec::new();
    for site in input.into_entries() {
        if site.starts_with("http") {
            if let Some(host) = reqwest::Url::parse(&site)
                .ok()
                .and_then(|u| u.host_str().map(|h| h.to_string()))
            {
                valid.push(host);
            }
        } else if site.contains('.') {
            valid.push(site);
        }
    }
    valid
}

pub struct NewsClient {
    client: Arc<ProviderClient>,
    config: NewsConfig,
}

impl NewsClient {
    pub fn new(client: Arc<ProviderClient>, config: NewsConfig) -> Self {
        Self { client, config }
    }

    pub fn default_domains(&self) -> &[String] {
        &self.config.target_domains
    }

    /// Latest articles from `custom_domains`, or the configured defaults when none are given.
    pub async fn fetch_latest_articles(&self, custom_domains: Option<&[String]>) -> Result<ArticleBatch, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("News"))?;

        let domains = match custom_domains {
            Some(d) if !d.is_empty() => d,
            _ => self.default_domains(),
        };
        let domains_str = domains.join(",");
        info!("[NEWS] fetching articles for domains={}", domains_str);

        let batch = self
            .client
            .get_news(
                &self.config.base_url,
                api_key,
                &domains_str,
                &self.config.language,
                self.config.page_size,
            )
            .await?;

        if batch.status.as_deref() == Some("ok") && batch.total_results > 0 && batch.articles.is_empty() {
            warn!(
                "[NEWS] API reports {} articles but none were returned in the response",
                batch.total_results
            );
        }
        info!("[NEWS] received {} articles", batch.articles.len());
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_csv_and_urls() {
        let input = WebsitesInput::Csv("bbc.com, https://www.reuters.com/world, localhost, ".to_string());
        assert_eq!(normalize_websites(input), vec!["bbc.com", "www.reuters.com"]);
    }

    #[test]
    fn test_normalize_list_drops_invalid() {
        let input = WebsitesInput::List(vec!["cnn.com".to_string(), "http://".to_string(), "news".to_string()]);
        assert_eq!(normalize_websites(input), vec!["cnn.com"]);
    }

    #[test]
    fn test_websites_input_deserializes_both_shapes() {
        let list: WebsitesInput = serde_json::from_str(r#"["a.com","b.org"]"#).unwrap();
        assert!(matches!(list, WebsitesInput::List(ref v) if v.len() == 2));
        let csv: WebsitesInput = serde_json::from_str(r#""a.com,b.org""#).unwrap();
        assert_eq!(normalize_websites(csv), vec!["a.com", "b.org"]);
    }

    #[tokio::test]
    async fn test_missing_key_is_reported() {
        let news = NewsClient::new(Arc::new(ProviderClient::new(5)), NewsConfig::default());
        let err = news.fetch_latest_articles(None).await.unwrap_err();
        assert_eq!(err.to_string(), "News API key is not configured.");
    }
}
