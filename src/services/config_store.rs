// Configuration Storage Service
// Handles config file read/write, version backup and environment overrides

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::humanizer::phrases::{
    default_contractions, default_emphasis_words, default_fillers, default_transitions, PhraseRule,
};

/// Scores at or below this are treated as human-written.
pub const DEFAULT_MAX_AI_SCORE: i32 = 10;

const NEWS_DEFAULT_URL: &str = "https://newsapi.org/v2/everything";
const GEMINI_DEFAULT_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GPTZERO_DEFAULT_URL: &str = "https://api.gptzero.me/v2/predict/text";
const GHOST_AI_DEFAULT_URL: &str = "https://api.the-ghost-ai.com/v1/humanize";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to {action} config: {source}")]
    Io {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    fn io(action: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Self::Io { action, source }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub version: String,
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub humanizer: HumanizerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            proxy: None,
            timeout_secs: default_timeout(),
            news: NewsConfig::default(),
            generator: GeneratorConfig::default(),
            detection: DetectionConfig::default(),
            humanizer: HumanizerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    pub enabled: bool,
    pub url: Option<String>,
}

impl ProxyConfig {
    pub fn active_url(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_news_url")]
    pub base_url: String,
    #[serde(default = "default_domains")]
    pub target_domains: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_news_url(),
            target_domains: default_domains(),
            language: default_language(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_target_words")]
    pub target_words: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_url(),
            model: default_gemini_model(),
            target_words: default_target_words(),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionConfig {
    #[serde(default = "default_max_ai_score")]
    pub max_ai_score: i32,
    #[serde(default)]
    pub strategy: StrategyKind,
    #[serde(default = "default_gptzero_url")]
    pub remote_url: String,
    #[serde(default)]
    pub remote_api_key: Option<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_ai_score: DEFAULT_MAX_AI_SCORE,
            strategy: StrategyKind::Local,
            remote_url: default_gptzero_url(),
            remote_api_key: None,
        }
    }
}

/// Probability of each rewrite step firing for a sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteProbabilities {
    pub contraction: f64,
    pub transition: f64,
    pub filler: f64,
    pub question: f64,
    pub emphasis: f64,
}

impl Default for RewriteProbabilities {
    fn default() -> Self {
        Self {
            contraction: 0.7,
            transition: 0.2,
            filler: 0.15,
            question: 0.1,
            emphasis: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizerConfig {
    #[serde(default = "default_contractions")]
    pub contractions: Vec<PhraseRule>,
    #[serde(default = "default_transitions")]
    pub transitions: Vec<String>,
    #[serde(default = "default_fillers")]
    pub fillers: Vec<String>,
    #[serde(default = "default_emphasis_words")]
    pub emphasis_words: Vec<String>,
    #[serde(default)]
    pub probabilities: RewriteProbabilities,
    #[serde(default = "default_min_words")]
    pub min_sentence_words: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,
    #[serde(default)]
    pub strategy: StrategyKind,
    #[serde(default = "default_ghost_url")]
    pub remote_url: String,
    #[serde(default)]
    pub remote_api_key: Option<String>,
}

impl Default for HumanizerConfig {
    fn default() -> Self {
        Self {
            contractions: default_contractions(),
            transitions: default_transitions(),
            fillers: default_fillers(),
            emphasis_words: default_emphasis_words(),
            probabilities: RewriteProbabilities::default(),
            min_sentence_words: default_min_words(),
            seed: None,
            max_passes: default_max_passes(),
            strategy: StrategyKind::Local,
            remote_url: default_ghost_url(),
            remote_api_key: None,
        }
    }
}

fn default_timeout() -> u64 { 60 }
fn default_news_url() -> String { NEWS_DEFAULT_URL.to_string() }
fn default_language() -> String { "en".to_string() }
fn default_page_size() -> u32 { 40 }
fn default_gemini_url() -> String { GEMINI_DEFAULT_URL.to_string() }
fn default_gemini_model() -> String { "gemini-1.5-flash".to_string() }
fn default_target_words() -> u32 { 340 }
fn default_max_ai_score() -> i32 { DEFAULT_MAX_AI_SCORE }
fn default_gptzero_url() -> String { GPTZERO_DEFAULT_URL.to_string() }
fn default_ghost_url() -> String { GHOST_AI_DEFAULT_URL.to_string() }
fn default_min_words() -> usize { 3 }
fn default_max_passes() -> u32 { 3 }

fn default_domains() -> Vec<String> {
    [
        "timesofindia.indiatimes.com",
        "thehindu.com",
        "reuters.com",
        "bbc.com",
        "cnn.com",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// First non-empty value among the env vars, else the configured value.
fn resolve_secret(env_keys: &[&str], configured: Option<String>) -> Option<String> {
    for key in env_keys {
        if let Ok(val) = env::var(key) {
            let v = val.trim();
            if !v.is_empty() {
                return Some(v.to_string());
            }
        }
    }
    configured.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Layer environment variables over file values.
    pub fn with_env_overrides(mut self) -> Self {
        self.news.api_key = resolve_secret(&["NEWS_API_KEY", "NEWS_HUMANIZER_NEWS_API_KEY"], self.news.api_key);
        self.generator.api_key =
            resolve_secret(&["GEMINI_API_KEY", "NEWS_HUMANIZER_GEMINI_API_KEY"], self.generator.api_key);
        self.detection.remote_api_key = resolve_secret(&["GPTZERO_API_KEY"], self.detection.remote_api_key);
        self.humanizer.remote_api_key = resolve_secret(&["GHOST_AI_API_KEY"], self.humanizer.remote_api_key);

        if let Ok(url) = env::var("NEWS_API_URL") {
            if !url.trim().is_empty() {
                self.news.base_url = url.trim().to_string();
            }
        }
        if let Ok(url) = env::var("GEMINI_API_URL") {
            if !url.trim().is_empty() {
                self.generator.base_url = url.trim().to_string();
            }
        }
        self
    }
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("news-humanizer"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(ConfigError::io("create dir for"))
    }

    /// Load configuration from file; a missing file yields defaults.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).map_err(ConfigError::io("read"))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content).map_err(ConfigError::io("write"))
    }

    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(ConfigError::io("create backup dir for"))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(ConfigError::io("back up"))?;

        // Keep only last 10 backups
        self.cleanup_old_backups(&backup_dir, 10)
    }

    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(ConfigError::io("list backups of"))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Oldest first
        entries.sort_by_key(|e| {
            e.metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        });

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }
}

/// Store for an explicit config file, or the default location when there is one.
pub fn config_store_for(path: Option<&Path>) -> Option<ConfigStore> {
    match path {
        Some(p) => {
            let dir = p.parent().map(Path::to_path_buf).unwrap_or_default();
            let mut store = ConfigStore::new(dir);
            store.config_file = p.to_path_buf();
            Some(store)
        }
        None => ConfigStore::default_config_dir().map(ConfigStore::new),
    }
}

/// Load config from an explicit file, or the default location, then apply env overrides.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match config_store_for(path) {
        Some(store) => Ok(store.load()?.with_env_overrides()),
        None => Ok(AppConfig::default().with_env_overrides()),
    }
}

/// Write a default config file. An existing file is left alone unless `force`,
/// in which case it is backed up first. Returns whether a file was written.
pub fn init_config(store: &ConfigStore, force: bool) -> Result<bool, ConfigError> {
    if store.config_file().exists() && !force {
        return Ok(false);
    }
    store.save(&AppConfig::default())?;
    Ok(true)
}

/// Set the acceptance threshold in the stored file (env overrides are not persisted).
pub fn set_max_ai_score(store: &ConfigStore, max_ai_score: i32) -> Result<AppConfig, ConfigError> {
    let mut config = store.load()?;
    config.detection.max_ai_score = max_ai_score;
    store.save(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("news-humanizer-{}-{}", name, uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.detection.max_ai_score, 10);
        assert_eq!(config.detection.strategy, StrategyKind::Local);
        assert_eq!(config.news.page_size, 40);
        assert_eq!(config.news.target_domains.len(), 5);
        assert_eq!(config.humanizer.contractions.len(), 37);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{"version":"1.0","detection":{"maxAiScore":15},"humanizer":{"fillers":["truly"]}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.detection.max_ai_score, 15);
        assert_eq!(config.humanizer.fillers, vec!["truly".to_string()]);
        assert_eq!(config.humanizer.transitions.len(), 10);
        assert!((config.humanizer.probabilities.contraction - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_store_round_trip_with_backup() {
        let dir = temp_dir("store");
        let store = ConfigStore::new(dir.clone());
        assert_eq!(store.load().unwrap().version, "1.0");

        let mut config = AppConfig::default();
        config.generator.model = "gemini-test".to_string();
        store.save(&config).unwrap();
        store.save(&config).unwrap();

        assert_eq!(store.load().unwrap().generator.model, "gemini-test");
        assert!(dir.join("backups").read_dir().unwrap().count() >= 1);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_init_config_keeps_existing_file_unless_forced() {
        let dir = temp_dir("init");
        let path = dir.join("custom.json");
        let store = config_store_for(Some(&path)).unwrap();

        assert!(init_config(&store, false).unwrap());
        assert!(path.exists());

        set_max_ai_score(&store, 25).unwrap();
        assert!(!init_config(&store, false).unwrap());
        assert_eq!(load_config(Some(&path)).unwrap().detection.max_ai_score, 25);

        assert!(init_config(&store, true).unwrap());
        assert_eq!(store.load().unwrap().detection.max_ai_score, DEFAULT_MAX_AI_SCORE);
        assert!(dir.join("backups").read_dir().unwrap().count() >= 1);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_proxy_requires_enabled_flag() {
        let proxy = ProxyConfig {
            enabled: false,
            url: Some("http://127.0.0.1:8080".to_string()),
        };
        assert!(proxy.active_url().is_none());
    }
}
