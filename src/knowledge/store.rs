// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-based storage for question/answer entries.
//!
//! The store owns the catalog and hands out ordered snapshots of it; the
//! matcher never writes through them.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};
use crate::utils::{get_root_with_data, DATA_DIR};

/// File name of the catalog database inside the data directory.
pub const DB_FILE: &str = "knowledge.sqlite";

/// A stored question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Row id assigned by the store
    pub id: i64,
    /// Question text matched against queries
    pub question: String,
    /// Answer returned when the question matches
    pub answer: String,
}

/// Payload for creating or replacing an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub question: String,
    pub answer: String,
}

impl NewEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(Error::invalid_input("question must not be empty"));
        }
        if self.answer.trim().is_empty() {
            return Err(Error::invalid_input("answer must not be empty"));
        }
        Ok(())
    }
}

/// SQLite-based storage for the Q&A catalog.
///
/// Stores entries in `.askbase/knowledge.sqlite` by default.
pub struct KnowledgeStore {
    conn: Connection,
    path: PathBuf,
}

impl KnowledgeStore {
    /// Opens or creates a store at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        let store = Self { conn, path };
        store.init_schema()?;

        tracing::debug!("opened knowledge store at {}", store.path.display());
        Ok(store)
    }

    /// Opens the store in the default location, reusing the nearest
    /// ancestor data directory if one exists.
    pub fn open_default<P: AsRef<Path>>(start: P) -> Result<Self> {
        let root = get_root_with_data(start);
        Self::open(root.join(DATA_DIR).join(DB_FILE))
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS question_answer (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Returns the path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts a new entry and returns it as stored.
    pub fn create(&self, entry: &NewEntry) -> Result<KnowledgeEntry> {
        entry.validate()?;
        self.conn.execute(
            "INSERT INTO question_answer (question, answer) VALUES (?1, ?2)",
            params![entry.question, entry.answer],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!("created entry {}", id);

        Ok(KnowledgeEntry {
            id,
            question: entry.question.clone(),
            answer: entry.answer.clone(),
        })
    }

    /// Returns every entry ordered by id.
    pub fn list_all(&self) -> Result<Vec<KnowledgeEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, question, answer FROM question_answer ORDER BY id")?;
        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Retrieves a single entry.
    pub fn get(&self, id: i64) -> Result<Option<KnowledgeEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT id, question, answer FROM question_answer WHERE id = ?1",
                params![id],
                Self::row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    /// Replaces the question and answer of an existing entry.
    ///
    /// Returns `None` when no entry has this id.
    pub fn update(&self, id: i64, entry: &NewEntry) -> Result<Option<KnowledgeEntry>> {
        entry.validate()?;
        let changed = self.conn.execute(
            "UPDATE question_answer SET question = ?1, answer = ?2 WHERE id = ?3",
            params![entry.question, entry.answer, id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        tracing::info!("updated entry {}", id);
        self.get(id)
    }

    /// Deletes an entry, returning whether it existed.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM question_answer WHERE id = ?1", params![id])?;
        if deleted > 0 {
            tracing::info!("deleted entry {}", id);
        }
        Ok(deleted > 0)
    }

    /// Counts stored entries.
    pub fn count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM question_answer", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Closes the storage connection explicitly.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }

    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<KnowledgeEntry> {
        Ok(KnowledgeEntry {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
        })
    }
}
