// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge module - persistence of the question/answer catalog

pub mod store;

pub use store::{KnowledgeEntry, KnowledgeStore, NewEntry, DB_FILE};
