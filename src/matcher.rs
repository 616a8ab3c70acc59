// SPDX-License-Identifier: MIT OR Apache-2.0

//! Question matching against a catalog snapshot.
//!
//! Every call embeds the live query and all candidate questions, scores each
//! candidate by dot product with the query, and accepts the best candidate
//! only if its score clears the policy threshold.

use serde::Serialize;
use std::sync::Arc;

use crate::embedding::EmbeddingProvider;
use crate::errors::{Error, Result};
use crate::knowledge::KnowledgeEntry;

/// Score a match must strictly exceed to be accepted.
pub const DEFAULT_THRESHOLD: f32 = 0.4;
/// Answer returned when no candidate clears the threshold.
pub const DEFAULT_FALLBACK_ANSWER: &str = "fallback: I don't know that, try asking something else";
/// Answer returned when the catalog is empty.
pub const DEFAULT_EMPTY_ANSWER: &str = "no knowledge available";

/// Acceptance policy, kept apart from scoring so it can be tuned freely.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPolicy {
    pub threshold: f32,
    pub fallback_answer: String,
    pub empty_answer: String,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            fallback_answer: DEFAULT_FALLBACK_ANSWER.to_string(),
            empty_answer: DEFAULT_EMPTY_ANSWER.to_string(),
        }
    }
}

impl MatchPolicy {
    /// Replace the threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Reject thresholds no score can be meaningfully compared against.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(Error::config(format!(
                "match threshold must be a finite number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// How a query was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched,
    BelowThreshold,
    NoCandidates,
}

/// Result of answering one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Id of the accepted entry
    pub matched_entry_id: Option<i64>,
    /// Answer text to show the user
    pub answer: String,
    /// Best dot-product score; absent when there were no candidates
    pub score: Option<f32>,
    /// Whether the best score cleared the threshold
    pub matched: bool,
}

impl MatchResult {
    pub fn outcome(&self) -> MatchOutcome {
        match (self.matched, self.score) {
            (true, _) => MatchOutcome::Matched,
            (false, Some(_)) => MatchOutcome::BelowThreshold,
            (false, None) => MatchOutcome::NoCandidates,
        }
    }
}

/// Answers free-text questions from a catalog snapshot
pub struct Matcher {
    embedder: Arc<dyn EmbeddingProvider>,
    policy: MatchPolicy,
}

impl Matcher {
    /// Create a matcher around a loaded embedder
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, policy: MatchPolicy) -> Self {
        Self { embedder, policy }
    }

    /// Answer `query` using `candidates` as the full catalog.
    ///
    /// Embedding failures are returned as errors; the only non-matching
    /// successful outcomes are an empty catalog and a below-threshold score.
    pub fn answer(&self, query: &str, candidates: &[KnowledgeEntry]) -> Result<MatchResult> {
        if candidates.is_empty() {
            return Ok(MatchResult {
                matched_entry_id: None,
                answer: self.policy.empty_answer.clone(),
                score: None,
                matched: false,
            });
        }

        let questions: Vec<String> = candidates.iter().map(|c| c.question.clone()).collect();
        let question_vectors = self.embedder.embed_texts(&questions)?;
        let query_vector = self
            .embedder
            .embed_texts(&[query.to_string()])?
            .pop()
            .ok_or_else(|| Error::embedding("no vector returned for query"))?;

        if question_vectors.len() != candidates.len() {
            return Err(Error::embedding(format!(
                "expected {} question vectors, got {}",
                candidates.len(),
                question_vectors.len()
            )));
        }

        let scores = question_vectors
            .iter()
            .map(|vector| {
                if vector.len() != query_vector.len() {
                    return Err(Error::embedding(format!(
                        "dimension mismatch: question vector has {} values, query has {}",
                        vector.len(),
                        query_vector.len()
                    )));
                }
                Ok(dot_product(vector, &query_vector))
            })
            .collect::<Result<Vec<f32>>>()?;

        // Non-empty candidates guarantee a non-empty score list.
        let (best, best_score) = stable_argmax(&scores).unwrap_or((0, f32::NEG_INFINITY));
        let entry = &candidates[best];

        tracing::debug!(
            "best match: {:?} (id {}, score {})",
            entry.question,
            entry.id,
            best_score
        );

        if best_score > self.policy.threshold {
            Ok(MatchResult {
                matched_entry_id: Some(entry.id),
                answer: entry.answer.clone(),
                score: Some(best_score),
                matched: true,
            })
        } else {
            Ok(MatchResult {
                matched_entry_id: None,
                answer: self.policy.fallback_answer.clone(),
                score: Some(best_score),
                matched: false,
            })
        }
    }
}

/// Unnormalized dot product of two equal-length vectors.
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Index and value of the maximum score; the earliest index wins ties.
///
/// NaN scores are skipped; the first score is returned only when every
/// score is NaN.
fn stable_argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, score) in scores.iter().copied().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.or_else(|| scores.first().map(|&score| (0, score)))
}
