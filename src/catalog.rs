// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog management commands (add, list, show, update, delete)

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use askbase::config::Config;
use askbase::output::{colorize_answer, colorize_id, colorize_question, print_json, use_colors};
use askbase::{Error, KnowledgeEntry, NewEntry};

use crate::cli::OutputFormat;
use crate::query::open_store;

/// Output settings shared by the catalog commands
#[derive(Debug, Clone, Copy)]
pub struct Render {
    pub format: OutputFormat,
    pub compact: bool,
}

impl Render {
    fn entry(&self, entry: &KnowledgeEntry) -> Result<()> {
        match self.format {
            OutputFormat::Json => print_json(entry, self.compact)?,
            OutputFormat::Text => print_entry(entry, use_colors()),
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct DeleteResult {
    id: i64,
    deleted: bool,
}

/// Add a new entry
pub fn add(question: &str, answer: &str, db: Option<&Path>, config: &Config, render: Render) -> Result<()> {
    let store = open_store(db, config)?;
    let entry = store
        .create(&NewEntry::new(question, answer))
        .context("Failed to add entry")?;
    render.entry(&entry)
}

/// List every entry in id order
pub fn list(db: Option<&Path>, config: &Config, render: Render) -> Result<()> {
    let store = open_store(db, config)?;
    let entries = store.list_all().context("Failed to read catalog")?;

    match render.format {
        OutputFormat::Json => print_json(&entries, render.compact)?,
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No entries.");
            }
            let use_color = use_colors();
            for entry in &entries {
                print_entry(entry, use_color);
            }
        }
    }
    Ok(())
}

/// Show a single entry
pub fn show(id: i64, db: Option<&Path>, config: &Config, render: Render) -> Result<()> {
    let store = open_store(db, config)?;
    let entry = store.get(id)?.ok_or(Error::NotFound(id))?;
    render.entry(&entry)
}

/// Replace an entry's question and answer
pub fn update(
    id: i64,
    question: &str,
    answer: &str,
    db: Option<&Path>,
    config: &Config,
    render: Render,
) -> Result<()> {
    let store = open_store(db, config)?;
    let entry = store
        .update(id, &NewEntry::new(question, answer))
        .context("Failed to update entry")?
        .ok_or(Error::NotFound(id))?;
    render.entry(&entry)
}

/// Delete an entry
pub fn delete(id: i64, db: Option<&Path>, config: &Config, render: Render) -> Result<()> {
    let store = open_store(db, config)?;
    if !store.delete(id).context("Failed to delete entry")? {
        return Err(Error::NotFound(id).into());
    }

    match render.format {
        OutputFormat::Json => print_json(&DeleteResult { id, deleted: true }, render.compact)?,
        OutputFormat::Text => println!("Deleted {}", id),
    }
    Ok(())
}

fn print_entry(entry: &KnowledgeEntry, use_color: bool) {
    println!(
        "[{}] {}",
        colorize_id(entry.id, use_color),
        colorize_question(&entry.question, use_color)
    );
    println!("    {}", colorize_answer(&entry.answer, use_color));
}
