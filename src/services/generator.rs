// Generative Rewrite Service
// Composes a fresh SEO article from a source title and body via Gemini

use std::sync::Arc;
use tracing::{info, warn};

use crate::models::GeneratedArticle;
use crate::services::config_store::GeneratorConfig;
use crate::services::providers::{ProviderClient, ProviderError};

pub fn build_seo_prompt(title: &str, content: &str, target_words: u32) -> String {
    format!(
        r#"Act as an expert content writer and SEO specialist.
Your task is to write a new, unique article based on the provided source material.

**Instructions:**
1.  **Length:** The final article must be approximately {target_words} words.
2.  **Tone:** Professional, informative, and engaging for a general audience.
3.  **SEO:** Naturally include relevant keywords from the source material. The title should be catchy and SEO-friendly.
4.  **Originality:** Do NOT copy sentences directly. Rewrite and rephrase all information to create a fresh perspective.
5.  **Structure:** Start with a compelling introduction, followed by 2-3 body paragraphs, and end with a concluding summary.

**Source Material:**
- **Original Title:** "{title}"
- **Original Content:** "{content}"

Now, please generate the new, SEO-optimized article."#
    )
}

pub struct ArticleGenerator {
    client: Arc<ProviderClient>,
    config: GeneratorConfig,
}

impl ArticleGenerator {
    pub fn new(client: Arc<ProviderClient>, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    pub async fn generate_seo_article(&self, title: &str, content: &str) -> Result<GeneratedArticle, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("Gemini"))?;

        let prompt = build_seo_prompt(title, content, self.config.target_words);
        match self
            .client
            .call_gemini(&self.config.base_url, &self.config.model, api_key, &prompt)
            .await
        {
            Ok(result) => {
                info!(
                    "[GENERATE] model={} words={} latency_ms={}",
                    self.config.model,
                    result.content.split_whitespace().count(),
                    result.latency_ms
                );
                Ok(GeneratedArticle {
                    generated_text: result.content,
                })
            }
            Err(e) => {
                warn!("[GENERATE] Gemini call failed: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_source_and_length() {
        let prompt = build_seo_prompt("Rates rise", "The bank raised rates.", 340);
        assert!(prompt.contains("approximately 340 words"));
        assert!(prompt.contains(r#"**Original Title:** "Rates rise""#));
        assert!(prompt.contains(r#"**Original Content:** "The bank raised rates.""#));
    }

    #[tokio::test]
    async fn test_missing_key_is_reported() {
        let generator = ArticleGenerator::new(Arc::new(ProviderClient::new(5)), GeneratorConfig::default());
        let err = generator.generate_seo_article("t", "c").await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini API key is not configured.");
    }
}
