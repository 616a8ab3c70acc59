// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding provider interface and implementations.
//!
//! The built-in provider wraps fastembed and defaults to
//! sentence-transformers/all-MiniLM-L6-v2, the model the catalog questions
//! are expected to be compared with.

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use serde_json::Value;
use std::borrow::Cow;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

use crate::config::{EmbeddingConfig, EmbeddingProviderType};
use crate::errors::{Error, Result};

/// Default embedding dimension for sentence-transformers/all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

const DEFAULT_FASTEMBED_BATCH_SIZE: usize = 256;
const MAX_FASTEMBED_BATCH_SIZE: usize = 1024;
const DEFAULT_FASTEMBED_MAX_CHARS: usize = 2000;

/// Settings for the built-in fastembed provider.
#[derive(Debug, Clone)]
pub struct EmbeddingProviderConfig {
    pub model: EmbeddingModel,
    pub batch_size: usize,
    pub max_chars: usize,
    pub normalize: bool,
    pub cache_dir: Option<PathBuf>,
}

impl EmbeddingProviderConfig {
    /// Build settings from the config file, letting `FASTEMBED_*`
    /// environment variables override individual values.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let model_name = env_string("FASTEMBED_MODEL")?.unwrap_or_else(|| config.model().to_string());
        let model = parse_model(&model_name)?;

        let mut batch_size = parse_usize_env("FASTEMBED_BATCH_SIZE", config.batch_size())?;
        if batch_size == 0 {
            batch_size = DEFAULT_FASTEMBED_BATCH_SIZE;
        }
        if batch_size > MAX_FASTEMBED_BATCH_SIZE {
            tracing::warn!(
                "batch size {} exceeds max {}; clamping",
                batch_size,
                MAX_FASTEMBED_BATCH_SIZE
            );
            batch_size = MAX_FASTEMBED_BATCH_SIZE;
        }

        let mut max_chars = parse_usize_env("FASTEMBED_MAX_CHARS", config.max_chars())?;
        if max_chars == 0 {
            max_chars = DEFAULT_FASTEMBED_MAX_CHARS;
        }

        let normalize = parse_bool_env("FASTEMBED_NORMALIZE", config.normalize())?;

        Ok(Self {
            model,
            batch_size,
            max_chars,
            normalize,
            cache_dir: config.cache_dir.clone(),
        })
    }
}

impl Default for EmbeddingProviderConfig {
    fn default() -> Self {
        Self {
            model: EmbeddingModel::AllMiniLML6V2,
            batch_size: DEFAULT_FASTEMBED_BATCH_SIZE,
            max_chars: DEFAULT_FASTEMBED_MAX_CHARS,
            normalize: true,
            cache_dir: None,
        }
    }
}

/// Handle to a loaded text-to-vector model.
///
/// Implementations must return exactly one vector per input text, in input
/// order, all of the same dimensionality.
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the model identifier.
    fn model_id(&self) -> &str;

    /// Generates embeddings for the given texts.
    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generates an embedding for a single text.
    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut result = self.embed_texts(&[text.to_string()])?;
        result
            .pop()
            .ok_or_else(|| Error::embedding("No embedding returned"))
    }
}

/// Load the provider selected by `config`.
///
/// This is the one-time blocking initialisation step; callers should treat
/// an error here as fatal.
pub fn load(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider() {
        EmbeddingProviderType::Builtin => {
            let settings = EmbeddingProviderConfig::from_config(config)?;
            let embedder = FastEmbedder::new(settings)?;
            tracing::info!("loaded embedding model {}", embedder.model_id());
            Ok(Arc::new(embedder))
        }
        EmbeddingProviderType::Command => Ok(Arc::new(CommandProvider::new(
            config.command().to_string(),
            config.model().to_string(),
        ))),
        EmbeddingProviderType::Dummy => Ok(Arc::new(DummyProvider::new(config.dimension()))),
    }
}

/// FastEmbed provider.
///
/// `TextEmbedding` needs exclusive access during inference, so calls are
/// serialised through a mutex.
pub struct FastEmbedder {
    embedder: Mutex<TextEmbedding>,
    config: EmbeddingProviderConfig,
    model_id: String,
}

impl FastEmbedder {
    pub fn new(config: EmbeddingProviderConfig) -> Result<Self> {
        let model = config.model.clone();
        let model_id = model.to_string();
        let mut init = InitOptions::new(model).with_show_download_progress(false);
        if let Some(dir) = &config.cache_dir {
            init = init.with_cache_dir(dir.clone());
        }
        let embedder = TextEmbedding::try_new(init)
            .map_err(|e| Error::model_load(format!("{}: {:#}", model_id, e)))?;

        Ok(Self {
            embedder: Mutex::new(embedder),
            config,
            model_id,
        })
    }
}

impl EmbeddingProvider for FastEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let prepared = truncate_texts(texts, self.config.max_chars);
        let mut embeddings = {
            let mut embedder = self
                .embedder
                .lock()
                .map_err(|_| Error::embedding("embedding model lock poisoned"))?;
            embedder
                .embed(&prepared, Some(self.config.batch_size))
                .map_err(|e| Error::embedding(format!("{:#}", e)))?
        };

        if self.config.normalize {
            for embedding in embeddings.iter_mut() {
                l2_normalize(embedding);
            }
        }

        Ok(embeddings)
    }
}

/// Command provider that shells out to an external process.
///
/// The command receives `{"model": ..., "texts": [...]}` on stdin and must
/// print a JSON array of vectors, or an object holding one under
/// `embeddings`, `vectors` or `data`.
pub struct CommandProvider {
    command: String,
    model: String,
}

impl CommandProvider {
    pub fn new(command: String, model: String) -> Self {
        Self { command, model }
    }

    fn run_command(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let payload = serde_json::json!({
            "model": self.model,
            "texts": texts,
        });

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::embedding(format!(
                    "failed to spawn embedding command `{}`: {}",
                    self.command, e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(payload.to_string().as_bytes()) {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::embedding(format!("failed to write payload: {}", e)));
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Error::embedding(format!("failed to read command output: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::embedding(format!(
                "embedding command failed (status {}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed: Value = serde_json::from_str(stdout.trim())
            .map_err(|e| Error::embedding(format!("command output is not JSON: {}", e)))?;

        parse_vectors(parsed)
    }
}

impl EmbeddingProvider for CommandProvider {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.run_command(texts)
    }
}

/// Dummy provider that returns zero vectors (for testing/offline use).
pub struct DummyProvider {
    model: String,
    dimension: usize,
}

impl DummyProvider {
    /// Creates a new dummy provider with specified dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            model: "dummy".to_string(),
            dimension,
        }
    }
}

impl EmbeddingProvider for DummyProvider {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.0; self.dimension]).collect())
    }
}

fn parse_vectors(parsed: Value) -> Result<Vec<Vec<f32>>> {
    let embeddings_value = match parsed {
        Value::Array(arr) => Value::Array(arr),
        Value::Object(mut obj) => ["embeddings", "vectors", "data"]
            .iter()
            .find_map(|key| obj.remove(*key))
            .ok_or_else(|| Error::embedding("command output missing 'embeddings' field"))?,
        _ => {
            return Err(Error::embedding(
                "command output must be a JSON array or object",
            ))
        }
    };

    embeddings_value
        .as_array()
        .ok_or_else(|| Error::embedding("embeddings must be a JSON array"))?
        .iter()
        .map(|row| {
            row.as_array()
                .ok_or_else(|| Error::embedding("embedding row must be an array"))?
                .iter()
                .map(|value| {
                    value
                        .as_f64()
                        .map(|v| v as f32)
                        .ok_or_else(|| Error::embedding("embedding value must be a number"))
                })
                .collect::<Result<Vec<f32>>>()
        })
        .collect()
}

fn truncate_texts<'a>(texts: &'a [String], max_chars: usize) -> Vec<Cow<'a, str>> {
    texts
        .iter()
        .map(|text| truncate_to_chars(text.as_str(), max_chars))
        .collect()
}

fn truncate_to_chars<'a>(input: &'a str, max_chars: usize) -> Cow<'a, str> {
    if max_chars == 0 {
        return Cow::Borrowed("");
    }

    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => Cow::Owned(input[..idx].to_string()),
        None => Cow::Borrowed(input),
    }
}

fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
}

/// Map a model identifier to a fastembed model.
pub fn parse_model(name: &str) -> Result<EmbeddingModel> {
    let value = name.trim();
    if value.is_empty() {
        return Ok(EmbeddingModel::AllMiniLML6V2);
    }

    let lowered = value.to_lowercase();
    let bare = lowered
        .strip_prefix("sentence-transformers/")
        .or_else(|| lowered.strip_prefix("baai/"))
        .unwrap_or(&lowered);

    match bare {
        "minilm" | "all-minilm-l6-v2" | "allminilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" | "allminilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        _ => Err(Error::model_load(format!(
            "unsupported embedding model '{}' (supported: all-MiniLM-L6-v2, all-MiniLM-L12-v2, bge-small-en-v1.5)",
            value
        ))),
    }
}

fn env_string(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(raw) => {
            let value = raw.trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        }
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::config(format!("failed to read {}: {}", name, err))),
    }
}

fn parse_usize_env(name: &str, default: usize) -> Result<usize> {
    match env_string(name)? {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| Error::config(format!("invalid {} value: {}", name, value))),
        None => Ok(default),
    }
}

fn parse_bool_env(name: &str, default: bool) -> Result<bool> {
    match env_string(name)? {
        Some(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(Error::config(format!("invalid {} value: {}", name, other))),
        },
        None => Ok(default),
    }
}
