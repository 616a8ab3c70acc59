// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding module - turns text into fixed-length vectors
//!
//! The provider is loaded once per process and shared by every match.

pub mod provider;

pub use provider::{
    load, parse_model, CommandProvider, DummyProvider, EmbeddingProvider,
    EmbeddingProviderConfig, FastEmbedder, DEFAULT_EMBEDDING_DIM,
};
