// SPDX-License-Identifier: MIT OR Apache-2.0

//! askbase - Local semantic question answering
//!
//! Answers free-text questions from a stored Q&A catalog by comparing
//! sentence embeddings of the question against every stored question.

mod catalog;
mod cli;
mod query;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Commands, OutputFormat};
use tracing_subscriber::EnvFilter;

use askbase::config::{Config, ConfigOutputFormat};
use catalog::Render;

fn main() -> Result<()> {
    // Initialize tracing with ASKBASE_LOG env var (e.g., ASKBASE_LOG=debug askbase ask "hi")
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("ASKBASE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    // CLI wins over config
    let format = cli.format.unwrap_or(match config.output_format() {
        Some(ConfigOutputFormat::Json) => OutputFormat::Json,
        _ => OutputFormat::Text,
    });
    let render = Render {
        format,
        compact: cli.compact,
    };
    let db = cli.db.as_deref();

    match cli.command {
        Commands::Ask {
            query,
            threshold,
            explain,
        } => {
            query::ask::run(&query, threshold, explain, db, &config, format, cli.compact)?;
        }
        Commands::Chat { threshold } => {
            query::chat::run(threshold, db, &config, format)?;
        }
        Commands::Add { question, answer } => {
            catalog::add(&question, &answer, db, &config, render)?;
        }
        Commands::List => {
            catalog::list(db, &config, render)?;
        }
        Commands::Show { id } => {
            catalog::show(id, db, &config, render)?;
        }
        Commands::Update {
            id,
            question,
            answer,
        } => {
            catalog::update(id, &question, &answer, db, &config, render)?;
        }
        Commands::Delete { id } => {
            catalog::delete(id, db, &config, render)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "askbase", &mut std::io::stdout());
        }
    }

    Ok(())
}
