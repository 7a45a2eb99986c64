//! Similarity Fallback — deterministic lexical-overlap classifier.
//!
//! Used whenever the primary classifier is unusable. Pure, offline, never fails.
//!
//! Algorithm:
//! 1. Tokenize both texts: lowercase, split on non-word characters, keep tokens of
//!    two or more characters, drop English stop words.
//! 2. Vocabulary = union of the terms of exactly these two documents.
//! 3. Weight each term by raw count × smoothed idf, idf = ln((1 + n) / (1 + df)) + 1, n = 2.
//! 4. Cosine similarity of the two weight vectors, in [0, 1].
//! 5. Fit iff similarity > threshold.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::classification::stop_words::is_stop_word;
use crate::classification::Classification;
use crate::models::screening::{ClassifierTier, Verdict};

pub const DEFAULT_THRESHOLD: f64 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Classifier
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityFallback {
    threshold: f64,
}

impl Default for SimilarityFallback {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SimilarityFallback {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Fit iff the TF-IDF cosine similarity strictly exceeds the threshold.
    pub fn classify(&self, resume_text: &str, job_description: &str) -> Classification {
        let score = similarity(resume_text, job_description);
        let verdict = if score > self.threshold {
            Verdict::Fit
        } else {
            Verdict::Unfit
        };
        debug!(
            "TF-IDF similarity: {score:.2} (threshold {:.2}) -> {verdict}",
            self.threshold
        );

        Classification {
            verdict,
            tier: ClassifierTier::Fallback,
            similarity: Some(score),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TF-IDF cosine similarity
// ────────────────────────────────────────────────────────────────────────────

/// Cosine similarity of the TF-IDF vectors of `a` and `b`.
///
/// 0.0 when either text has no vocabulary terms left (empty, or only stop words).
pub fn similarity(a: &str, b: &str) -> f64 {
    let counts_a = term_counts(a);
    let counts_b = term_counts(b);
    if counts_a.is_empty() || counts_b.is_empty() {
        return 0.0;
    }

    let vocabulary: BTreeSet<&str> = counts_a
        .keys()
        .chain(counts_b.keys())
        .map(String::as_str)
        .collect();

    let documents = 2.0_f64;
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for term in vocabulary {
        let tf_a = counts_a.get(term).copied().unwrap_or(0) as f64;
        let tf_b = counts_b.get(term).copied().unwrap_or(0) as f64;
        let df = (tf_a > 0.0) as u8 as f64 + (tf_b > 0.0) as u8 as f64;
        let idf = ((1.0 + documents) / (1.0 + df)).ln() + 1.0;

        let weight_a = tf_a * idf;
        let weight_b = tf_b * idf;
        dot += weight_a * weight_b;
        norm_a += weight_a * weight_a;
        norm_b += weight_b * weight_b;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Term frequencies after tokenization and stop-word removal.
fn term_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Lowercased word tokens of at least two characters, stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !is_stop_word(t))
        .map(String::from)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
