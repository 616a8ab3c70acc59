// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output and color utilities for consistent terminal formatting
//!
//! Provides shared color functions respecting NO_COLOR environment variable.

use colored::Colorize;
use serde::Serialize;

use crate::errors::Result;

/// Check if colors should be used (respects NO_COLOR env var)
pub fn use_colors() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Colorize entry id (yellow)
pub fn colorize_id(id: i64, use_color: bool) -> String {
    if use_color {
        id.to_string().yellow().to_string()
    } else {
        id.to_string()
    }
}

/// Colorize question text (bold)
pub fn colorize_question(text: &str, use_color: bool) -> String {
    if use_color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// Colorize a matched answer (green)
pub fn colorize_answer(text: &str, use_color: bool) -> String {
    if use_color {
        text.green().to_string()
    } else {
        text.to_string()
    }
}

/// Colorize a fallback answer (dimmed)
pub fn colorize_fallback(text: &str, use_color: bool) -> String {
    if use_color {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// Format a similarity score (cyan, 4 decimals)
pub fn colorize_score(score: f32, use_color: bool) -> String {
    let text = format!("{:.4}", score);
    if use_color {
        text.cyan().to_string()
    } else {
        text
    }
}

/// Print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_without_color() {
        assert_eq!(colorize_id(42, false), "42");
        assert_eq!(colorize_answer("Bot", false), "Bot");
        assert_eq!(colorize_score(0.123456, false), "0.1235");
    }
}
