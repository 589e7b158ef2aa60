// News Humanizer Core Services

pub mod articles;
pub mod config_store;
pub mod detection;
pub mod exporter;
pub mod generator;
pub mod humanizer;
pub mod providers;
pub mod text_processor;

pub use articles::{normalize_websites, NewsClient, WebsitesInput};
pub use config_store::{
    config_store_for, init_config, load_config, set_max_ai_score, AppConfig, ConfigError, ConfigStore,
    DEFAULT_MAX_AI_SCORE,
};
pub use exporter::{create_docx, ExportError, DOCX_MIME};
pub use generator::ArticleGenerator;
pub use providers::{ProviderClient, ProviderError};

// Core entry points
pub use detection::{score, score_with_threshold, Detector, LocalDetector};
pub use humanizer::{rewrite, Humanizer, LocalHumanizer};
