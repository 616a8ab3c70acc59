// SPDX-License-Identifier: MIT OR Apache-2.0

//! Answer a single question

use anyhow::{Context, Result};
use std::path::Path;

use askbase::config::Config;
use askbase::output::{
    colorize_answer, colorize_fallback, colorize_id, colorize_score, print_json, use_colors,
};
use askbase::{MatchOutcome, MatchResult};

use super::{build_matcher, open_store};
use crate::cli::OutputFormat;

/// Run the ask command
pub fn run(
    query: &str,
    threshold: Option<f32>,
    explain: bool,
    db: Option<&Path>,
    config: &Config,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    let store = open_store(db, config)?;
    let matcher = build_matcher(config, threshold)?;

    let candidates = store.list_all().context("Failed to read catalog")?;
    let result = matcher
        .answer(query, &candidates)
        .context("Failed to answer question")?;

    match format {
        OutputFormat::Json => print_json(&result, compact)?,
        OutputFormat::Text => print_text(&result, explain),
    }

    Ok(())
}

/// Render a match result for humans
pub fn print_text(result: &MatchResult, explain: bool) {
    let use_color = use_colors();
    let outcome = result.outcome();
    match outcome {
        MatchOutcome::Matched => println!("{}", colorize_answer(&result.answer, use_color)),
        MatchOutcome::BelowThreshold | MatchOutcome::NoCandidates => {
            println!("{}", colorize_fallback(&result.answer, use_color))
        }
    }

    if explain {
        let entry = result
            .matched_entry_id
            .map(|id| colorize_id(id, use_color))
            .unwrap_or_else(|| "none".to_string());
        let score = result
            .score
            .map(|s| colorize_score(s, use_color))
            .unwrap_or_else(|| "n/a".to_string());
        let outcome = match outcome {
            MatchOutcome::Matched => "matched",
            MatchOutcome::BelowThreshold => "below threshold",
            MatchOutcome::NoCandidates => "empty catalog",
        };
        println!("  entry: {}  score: {}  ({})", entry, score, outcome);
    }
}
