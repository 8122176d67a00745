//! Configuration handling for manualqa.

use directories::ProjectDirs;
use manualqa_core::{ChunkConfig, RetryConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::service::ServiceConfig;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Generation configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chunking-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters
    #[serde(default = "default_window")]
    pub window: usize,

    /// Overlap between windows in characters
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

fn default_window() -> usize {
    1000
}

fn default_overlap() -> usize {
    200
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            overlap: default_overlap(),
        }
    }
}

/// Embedding-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding model to use
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Attempts per request before a rate-limited call is abandoned
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait after a rate-limit response before retrying (seconds)
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,

    /// Minimum spacing between successful requests (milliseconds)
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

fn default_embedding_model() -> String {
    "embedding-001".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_secs() -> u64 {
    45
}

fn default_pacing_ms() -> u64 {
    1000
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
            pacing_ms: default_pacing_ms(),
        }
    }
}

/// Generation-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Generation model to use
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens in a generated answer
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_generation_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_generation_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// Query-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Chunks retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when no config file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Default config file path (`~/.config/manualqa/config.toml` on Linux).
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("MANUALQA_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.toml"));
        }

        ProjectDirs::from("", "", "manualqa").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// A sample config file with every key at its default.
    #[must_use]
    pub fn sample_toml() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# failed to render sample config"))
    }

    /// The service-level view of this configuration.
    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            chunking: ChunkConfig {
                window: self.chunking.window,
                overlap: self.chunking.overlap,
            },
            retry: RetryConfig {
                max_attempts: self.embedding.max_attempts,
                backoff: Duration::from_secs(self.embedding.backoff_secs),
                pacing: Duration::from_millis(self.embedding.pacing_ms),
            },
            top_k: self.query.top_k,
        }
    }
}

/// Failure to read or parse a config file.
#[derive(Debug)]
pub struct ConfigError {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "config {}: {}", self.path.display(), self.reason)
    }
}

impl std::error::Error for ConfigError {}
