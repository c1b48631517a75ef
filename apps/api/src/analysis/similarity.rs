//! TF-IDF cosine similarity between a document and a reference over the two-document corpus.
//!
//! Weighting: raw counts × smoothed idf `ln((1 + n) / (1 + df)) + 1`, rows L2-normalized.
//! Vocabulary is kept sorted so the result does not depend on argument order.

use std::collections::BTreeMap;

use crate::analysis::error::AnalysisError;
use crate::analysis::normalizer::normalize;
use crate::analysis::stopwords::is_stopword;

const CORPUS_SIZE: f64 = 2.0;

fn term_counts(text: &str) -> BTreeMap<String, f64> {
    let mut counts = BTreeMap::new();
    for token in normalize(text) {
        if token.chars().count() < 2 || is_stopword(&token) {
            continue;
        }
        *counts.entry(token).or_insert(0.0) += 1.0;
    }
    counts
}

/// Rounds to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scores `document_text` against `reference_text` on a 0–100 scale, two decimals.
///
/// Fails with `InvalidInput` when either side has no scorable terms left after
/// stopword filtering.
pub fn score(document_text: &str, reference_text: &str) -> Result<f64, AnalysisError> {
    let document = term_counts(document_text);
    let reference = term_counts(reference_text);

    if document.is_empty() || reference.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "TF-IDF vectorization failed: a document has no terms left after stopword filtering"
                .to_string(),
        ));
    }

    let mut vocabulary: BTreeMap<&str, f64> = BTreeMap::new();
    for term in document.keys().chain(reference.keys()) {
        *vocabulary.entry(term.as_str()).or_insert(0.0) += 1.0;
    }

    let mut dot = 0.0;
    let mut doc_norm = 0.0;
    let mut ref_norm = 0.0;

    for (term, df) in &vocabulary {
        let idf = ((1.0 + CORPUS_SIZE) / (1.0 + df)).ln() + 1.0;
        let a = document.get(*term).copied().unwrap_or(0.0) * idf;
        let b = reference.get(*term).copied().unwrap_or(0.0) * idf;
        dot += a * b;
        doc_norm += a * a;
        ref_norm += b * b;
    }

    let cosine = (dot / (doc_norm.sqrt() * ref_norm.sqrt())).clamp(0.0, 1.0);
    Ok(round2(cosine * 100.0))
}
