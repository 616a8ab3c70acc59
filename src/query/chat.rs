// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive question loop over stdin

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;

use askbase::config::Config;
use askbase::output::print_json;

use super::ask::print_text;
use super::{build_matcher, open_store};
use crate::cli::OutputFormat;

/// Run the chat command
///
/// The model is loaded once; the catalog is re-read for every question so
/// edits made from another shell are picked up.
pub fn run(
    threshold: Option<f32>,
    db: Option<&Path>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(db, config)?;
    let matcher = build_matcher(config, threshold)?;

    let stdin = io::stdin();
    let interactive = format == OutputFormat::Text;
    prompt(interactive)?;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        let query = line.trim();

        if matches!(query, "exit" | "quit") {
            break;
        }
        if query.is_empty() {
            prompt(interactive)?;
            continue;
        }

        let candidates = store.list_all().context("Failed to read catalog")?;
        match matcher.answer(query, &candidates) {
            Ok(result) => match format {
                OutputFormat::Json => print_json(&result, true)?,
                OutputFormat::Text => print_text(&result, false),
            },
            // A failed question does not end the session.
            Err(err) => {
                tracing::error!("failed to answer {:?}: {}", query, err);
                eprintln!("Error: {}", err);
            }
        }

        prompt(interactive)?;
    }

    Ok(())
}

fn prompt(interactive: bool) -> Result<()> {
    if interactive {
        let mut stderr = io::stderr();
        write!(stderr, "> ")?;
        stderr.flush()?;
    }
    Ok(())
}
