// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// askbase - Local semantic question answering
///
/// Answers free-text questions from a stored catalog of question/answer
/// pairs by comparing sentence embeddings.
#[derive(Parser, Debug)]
#[command(name = "askbase")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Compact JSON output (no pretty formatting)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Catalog database path (defaults to .askbase/knowledge.sqlite)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Parse a finite match threshold
fn parse_threshold(raw: &str) -> Result<f32, String> {
    let value: f32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw))?;
    if !value.is_finite() {
        return Err(format!("threshold must be finite, got {}", raw));
    }
    Ok(value)
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a question from the catalog
    Ask {
        /// Question text
        query: String,

        /// Minimum score a match must exceed (overrides config)
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f32>,

        /// Show matched entry id and score
        #[arg(long)]
        explain: bool,
    },

    /// Answer questions read line by line from stdin
    Chat {
        /// Minimum score a match must exceed (overrides config)
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f32>,
    },

    /// Add a question/answer pair
    Add {
        question: String,
        answer: String,
    },

    /// List all question/answer pairs
    List,

    /// Show a single entry
    Show {
        id: i64,
    },

    /// Replace the question and answer of an entry
    Update {
        id: i64,
        question: String,
        answer: String,
    },

    /// Delete an entry
    Delete {
        id: i64,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_must_be_finite() {
        assert_eq!(parse_threshold("0.55"), Ok(0.55));
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("inf").is_err());
        assert!(parse_threshold("-infinity").is_err());
        assert!(parse_threshold("high").is_err());
    }
}
