// SPDX-License-Identifier: MIT OR Apache-2.0

//! askbase - Local semantic question answering library
//!
//! Matches free-text questions against a stored Q&A catalog using sentence
//! embeddings. Shared modules for the askbase CLI tool.

pub mod config;
pub mod embedding;
pub mod errors;
pub mod knowledge;
pub mod matcher;
pub mod output;
pub mod utils;

pub use errors::{Error, Result};
pub use knowledge::{KnowledgeEntry, KnowledgeStore, NewEntry};
pub use matcher::{MatchOutcome, MatchPolicy, MatchResult, Matcher};
