use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use news_humanizer_lib::api::{
    self, ApiError, AppState, DownloadRequest, GenerateRequest, SearchRequest, TextRequest,
};
use news_humanizer_lib::services::{
    config_store_for, init_config, load_config, set_max_ai_score, WebsitesInput,
};

#[derive(Parser)]
#[command(name = "news-humanizer", version, about = "Fetch, rewrite, score and humanize news articles")]
struct Cli {
    /// Path to a config.json (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct TextInput {
    /// Inline text
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Read text from a file (stdin when neither --text nor --file is given)
    #[arg(long)]
    file: Option<PathBuf>,
}

impl TextInput {
    fn read(self) -> Result<String> {
        if let Some(text) = self.text {
            return Ok(text);
        }
        if let Some(path) = self.file {
            return std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()));
        }
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Latest articles from the configured domains
    Articles,
    /// Latest articles from custom websites (comma-separated)
    Search { websites: String },
    /// Generate an SEO article from a title and body
    Generate {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Score text for AI-likeness
    Detect(TextInput),
    /// Rewrite text to lower its AI score
    Humanize {
        #[command(flatten)]
        input: TextInput,
        /// Seed the rewriter for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Export text as a .docx file
    Export {
        #[command(flatten)]
        input: TextInput,
        #[arg(long, default_value = "article.docx")]
        out: PathBuf,
    },
    /// Fetch, generate, humanize until accepted, and export one article
    Pipeline {
        /// Custom websites (comma-separated); configured domains otherwise
        #[arg(long)]
        websites: Option<String>,
        /// Which usable article to take from the batch
        #[arg(long, default_value_t = 0)]
        index: usize,
        #[arg(long, default_value = "article.docx")]
        out: PathBuf,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file (existing files are kept unless --force)
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Set the acceptance threshold for AI scores
    SetMaxScore { value: i32 },
    /// Print the effective configuration
    Show,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_api_error(err: ApiError) -> anyhow::Error {
    eprintln!("{}", err.body());
    anyhow::anyhow!("request failed with status {}: {}", err.status(), err)
}

#[tokio::main]
async fn main() -> Result<()> {
    news_humanizer_lib::init_logging();

    let cli = Cli::parse();
    if let Command::Config { action } = &cli.command {
        return run_config(cli.config.as_deref(), action);
    }

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Command::Humanize { seed: Some(seed), .. } = &cli.command {
        config.humanizer.seed = Some(*seed);
    }
    let state = AppState::from_config(config).map_err(report_api_error)?;

    match cli.command {
        Command::Articles => {
            let batch = api::get_articles(&state).await.map_err(report_api_error)?;
            print_json(&batch)
        }
        Command::Search { websites } => {
            let req = SearchRequest {
                websites: Some(WebsitesInput::Csv(websites)),
            };
            let batch = api::search_articles(&state, req).await.map_err(report_api_error)?;
            print_json(&batch)
        }
        Command::Generate { title, content } => {
            let req = GenerateRequest {
                title: Some(title),
                description: Some(content),
            };
            let generated = api::generate_article(&state, req).await.map_err(report_api_error)?;
            print_json(&generated)
        }
        Command::Detect(input) => {
            let req = TextRequest {
                text: Some(input.read()?),
            };
            let result = api::detect_ai(&state, req).await.map_err(report_api_error)?;
            print_json(&result)
        }
        Command::Humanize { input, .. } => {
            let req = TextRequest {
                text: Some(input.read()?),
            };
            let result = api::humanize_article(&state, req).await.map_err(report_api_error)?;
            print_json(&result)
        }
        Command::Export { input, out } => {
            let req = DownloadRequest {
                text: Some(input.read()?),
                filename: out.file_name().map(|n| n.to_string_lossy().to_string()),
            };
            let download = api::download_docx(req).map_err(report_api_error)?;
            write_download(&out, &download.bytes)?;
            println!("Wrote {} ({} bytes, {})", out.display(), download.bytes.len(), download.content_type);
            Ok(())
        }
        Command::Config { .. } => unreachable!("handled before state setup"),
        Command::Pipeline { websites, index, out } => {
            let websites = websites.map(WebsitesInput::Csv);
            let filename = out.file_name().map(|n| n.to_string_lossy().to_string());
            let (report, download) = api::run_pipeline(&state, websites, index, filename.as_deref())
                .await
                .map_err(report_api_error)?;
            write_download(&out, &download.bytes)?;
            print_json(&report)
        }
    }
}

fn run_config(path: Option<&Path>, action: &ConfigAction) -> Result<()> {
    let store = config_store_for(path).context("No config directory available; pass --config")?;
    match action {
        ConfigAction::Init { force } => {
            if init_config(&store, *force)? {
                println!("Wrote {}", store.config_file().display());
            } else {
                println!("{} already exists; use --force to overwrite", store.config_file().display());
            }
        }
        ConfigAction::SetMaxScore { value } => {
            if !(1..=99).contains(value) {
                bail!("max AI score must be within 1..=99, got {}", value);
            }
            set_max_ai_score(&store, *value)?;
            println!("maxAiScore set to {} in {}", value, store.config_file().display());
        }
        ConfigAction::Show => {
            let mut config = load_config(path)?;
            // never echo secrets
            config.news.api_key = config.news.api_key.map(|_| "***".to_string());
            config.generator.api_key = config.generator.api_key.map(|_| "***".to_string());
            config.detection.remote_api_key = config.detection.remote_api_key.map(|_| "***".to_string());
            config.humanizer.remote_api_key = config.humanizer.remote_api_key.map(|_| "***".to_string());
            print_json(&config)?;
        }
    }
    Ok(())
}

fn write_download(out: &Path, bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        bail!("Refusing to write an empty document");
    }
    std::fs::write(out, bytes).with_context(|| format!("Failed to write {}", out.display()))
}
