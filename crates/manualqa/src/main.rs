//! # manualqa CLI
//!
//! Command-line interface for the manualqa document Q&A engine.
//!
//! The index is in-memory, so each invocation is a session: documents given
//! with `--file` are indexed first, then the command runs against them.
//!
//! ## Commands
//!
//! - `manualqa index <FILE>...` - Index manuals and report their chunk counts
//! - `manualqa ask <QUESTION> --file <FILE>...` - Index manuals, then answer a question
//! - `manualqa config show|init|path` - Manage configuration
//!
//! ## Examples
//!
//! ```bash
//! export GEMINI_API_KEY=...
//!
//! # Check how a manual chunks up
//! manualqa index handbook.pdf
//!
//! # Ask a question grounded on two manuals
//! manualqa ask "How do I book the canteen?" --file handbook.pdf --file canteen.docx
//!
//! # JSON output
//! manualqa ask "..." --file handbook.pdf --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use manualqa::{Config, QaService};
use manualqa_gemini::{GeminiEmbedder, GeminiGenerator};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "manualqa")]
#[command(about = "Index manual documents and answer questions grounded on them")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/manualqa/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Index manuals and report the resulting chunk counts
    Index {
        /// Manual files to index (.pdf, .docx, .doc)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Answer a question grounded on the given manuals
    Ask {
        /// The question to answer
        question: String,

        /// Manual files to index before asking
        #[arg(short = 'F', long = "file")]
        files: Vec<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print sample configuration file
    Init,
    /// Show config file path
    Path,
}

/// Output structure for `index`.
#[derive(Serialize)]
struct IndexOutput {
    documents: Vec<manualqa_core::DocumentEntry>,
    total_chunks: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        config.logging.level.parse().unwrap_or(Level::INFO)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Index { files } => {
            let service = build_service(&config).await?;
            index_files(&service, &files).await?;

            let documents = service.list_indexed_documents().await;
            let total_chunks: u64 = documents.iter().map(|d| u64::from(d.chunk_count)).sum();

            match cli.format {
                OutputFormat::Json => {
                    let output = IndexOutput {
                        documents,
                        total_chunks,
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    println!("Indexed documents:");
                    for doc in &documents {
                        println!("  {} ({} chunks)", doc.filename, doc.chunk_count);
                    }
                    println!("Total chunks: {total_chunks}");
                }
            }
        }

        Commands::Ask { question, files } => {
            let service = build_service(&config).await?;
            index_files(&service, &files).await?;

            let answer = service
                .ask(&question)
                .await
                .context("Failed to answer question")?;

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&answer)?);
                }
                OutputFormat::Text => {
                    println!("{}", answer.answer);
                    if !answer.sources.is_empty() {
                        println!();
                        println!("Sources:");
                        for source in &answer.sources {
                            println!("  {} (chunk {})", source.filename, source.chunk_index);
                        }
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&config)
                            .context("Failed to serialize config")?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize config")?
                    );
                }
            },
            ConfigAction::Init => {
                println!("{}", Config::sample_toml());
            }
            ConfigAction::Path => {
                if let Some(path) = Config::config_path() {
                    println!("{}", path.display());
                } else {
                    println!("Could not determine config directory");
                }
            }
        },
    }

    Ok(())
}

/// Build an initialized service from config and the API key environment.
async fn build_service(config: &Config) -> Result<QaService> {
    let api_key = std::env::var("GEMINI_API_KEY")
        .or_else(|_| std::env::var("GOOGLE_API_KEY"))
        .context("GEMINI_API_KEY or GOOGLE_API_KEY must be set")?;

    let service = QaService::new(config.service_config())?;

    let embedder = GeminiEmbedder::new(&api_key).with_model(&config.embedding.model);
    let generator = GeminiGenerator::new(&api_key)
        .with_model(&config.generation.model)
        .with_sampling(
            config.generation.temperature,
            config.generation.max_output_tokens,
        );

    service
        .initialize_with(Arc::new(embedder), Arc::new(generator))
        .await;

    Ok(service)
}

/// Index each file under its own filename.
async fn index_files(service: &QaService, files: &[PathBuf]) -> Result<()> {
    for path in files {
        if !path.exists() {
            anyhow::bail!("File does not exist: {}", path.display());
        }

        let filename = filename_of(path)?;
        info!("Indexing {:?}", path);

        let chunks = service
            .index_document(path, &filename)
            .await
            .with_context(|| format!("Failed to index {}", path.display()))?;

        info!("Indexed {} ({} chunks)", filename, chunks);
    }

    Ok(())
}

/// The caller-facing filename of a path.
fn filename_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToString::to_string)
        .with_context(|| format!("Invalid filename: {}", path.display()))
}
