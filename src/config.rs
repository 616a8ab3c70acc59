// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for askbase
//!
//! Loads configuration from .askbaserc.toml in current directory or ~/.config/askbase/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::embedding::DEFAULT_EMBEDDING_DIM;
use crate::matcher::{MatchPolicy, DEFAULT_EMPTY_ANSWER, DEFAULT_FALLBACK_ANSWER, DEFAULT_THRESHOLD};

/// Output format for results (mirrored from cli for library use)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOutputFormat {
    #[default]
    Text,
    Json,
}

/// Embedding provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    #[default]
    Builtin,
    Command,
    Dummy,
}

/// Embedding configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider type (builtin, command, dummy)
    pub provider: Option<EmbeddingProviderType>,
    /// Pretrained model identifier
    pub model: Option<String>,
    /// Command to execute for command provider
    pub command: Option<String>,
    /// Inference batch size for the builtin provider
    pub batch_size: Option<usize>,
    /// Input texts are truncated to this many characters
    pub max_chars: Option<usize>,
    /// L2-normalize provider output
    pub normalize: Option<bool>,
    /// Where model weights are downloaded to
    pub cache_dir: Option<PathBuf>,
    /// Vector size for the dummy provider
    pub dimension: Option<usize>,
}

impl EmbeddingConfig {
    /// Get provider type (defaults to Builtin)
    pub fn provider(&self) -> EmbeddingProviderType {
        self.provider.unwrap_or_default()
    }

    /// Get model identifier (defaults to "all-MiniLM-L6-v2")
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or("all-MiniLM-L6-v2")
    }

    /// Get command (defaults to "embedder")
    pub fn command(&self) -> &str {
        self.command.as_deref().unwrap_or("embedder")
    }

    /// Get batch size (defaults to 256)
    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(256)
    }

    /// Get max chars (defaults to 2000)
    pub fn max_chars(&self) -> usize {
        self.max_chars.unwrap_or(2000)
    }

    /// Get normalize (defaults to true)
    pub fn normalize(&self) -> bool {
        self.normalize.unwrap_or(true)
    }

    /// Get dummy vector dimension (defaults to 384)
    pub fn dimension(&self) -> usize {
        self.dimension.unwrap_or(DEFAULT_EMBEDDING_DIM)
    }
}

/// Matcher configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum score a match must strictly exceed
    pub threshold: Option<f32>,
    /// Answer when nothing clears the threshold
    pub fallback_answer: Option<String>,
    /// Answer when the catalog is empty
    pub empty_answer: Option<String>,
}

impl MatcherConfig {
    /// Get threshold (defaults to 0.4)
    pub fn threshold(&self) -> f32 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    /// Get fallback answer
    pub fn fallback_answer(&self) -> &str {
        self.fallback_answer
            .as_deref()
            .unwrap_or(DEFAULT_FALLBACK_ANSWER)
    }

    /// Get empty-catalog answer
    pub fn empty_answer(&self) -> &str {
        self.empty_answer.as_deref().unwrap_or(DEFAULT_EMPTY_ANSWER)
    }

    /// Build the match policy these settings describe
    pub fn policy(&self) -> MatchPolicy {
        MatchPolicy {
            threshold: self.threshold(),
            fallback_answer: self.fallback_answer().to_string(),
            empty_answer: self.empty_answer().to_string(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Explicit database path
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Get the configured database path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Configuration loaded from .askbaserc.toml or ~/.config/askbase/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format (text or json)
    pub default_format: Option<String>,

    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,

    /// Matcher configuration
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .askbaserc.toml in current directory
    /// 2. ~/.config/askbase/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(Path::new(".askbaserc.toml")) {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("askbase").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!("loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::warn!("failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get output format from config, parsing the string to ConfigOutputFormat
    pub fn output_format(&self) -> Option<ConfigOutputFormat> {
        self.default_format
            .as_ref()
            .and_then(|s| match s.to_lowercase().as_str() {
                "json" => Some(ConfigOutputFormat::Json),
                "text" => Some(ConfigOutputFormat::Text),
                _ => None,
            })
    }

    /// Get the embedding configuration
    pub fn embeddings(&self) -> &EmbeddingConfig {
        &self.embeddings
    }

    /// Get the matcher configuration
    pub fn matcher(&self) -> &MatcherConfig {
        &self.matcher
    }

    /// Get the storage configuration
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }
}
