// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query commands and the shared setup they need

pub mod ask;
pub mod chat;

use anyhow::{Context, Result};
use std::path::Path;

use askbase::config::Config;
use askbase::embedding;
use askbase::{KnowledgeStore, MatchPolicy, Matcher};

/// Open the catalog: explicit `--db`, then config `storage.path`, then the
/// nearest `.askbase` directory.
pub fn open_store(db: Option<&Path>, config: &Config) -> Result<KnowledgeStore> {
    let store = match db.or_else(|| config.storage().path()) {
        Some(path) => KnowledgeStore::open(path)
            .with_context(|| format!("Failed to open catalog: {}", path.display()))?,
        None => KnowledgeStore::open_default(std::env::current_dir()?)
            .context("Failed to open default catalog")?,
    };
    Ok(store)
}

/// Load the embedder once and wrap it in a matcher.
pub fn build_matcher(config: &Config, threshold: Option<f32>) -> Result<Matcher> {
    let mut policy: MatchPolicy = config.matcher().policy();
    if let Some(threshold) = threshold {
        policy = policy.with_threshold(threshold);
    }
    policy.validate()?;

    let embedder =
        embedding::load(config.embeddings()).context("Failed to load embedding model")?;
    tracing::debug!("match threshold {}", policy.threshold);

    Ok(Matcher::new(embedder, policy))
}
