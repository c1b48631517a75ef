//! Sentence feedback: scores candidate sentences against the reference keywords and
//! produces rewrite advice.
//!
//! Units with fewer than `min_words` words are skipped (headers, bullet markers).
//! A unit at or above the coverage threshold without weak phrasing is adequate and gets
//! no advice.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::analysis::keywords::KeywordExtractor;

pub const COVERAGE_EPSILON: f64 = 1e-5;
const MAX_SUGGESTED_KEYWORDS: usize = 5;

const WEAK_PHRASES: &[&str] = &[
    "responsible for",
    "duties included",
    "tasked with",
    "worked on",
    "helped with",
    "involved in",
    "participated in",
];

/// Any of `WEAK_PHRASES` as whole words, over lowercased text.
static WEAK_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?:{})\b", WEAK_PHRASES.join("|"))).expect("static pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceFeedback {
    pub sentence: String,
    pub coverage_ratio: f64,
    pub advice: Vec<String>,
}

/// Splits text into trimmed sentence/line units, dropping empty ones and leading bullets.
pub fn split_units(text: &str) -> Vec<String> {
    let mut units = Vec::new();
    for line in text.lines() {
        let mut start = 0;
        let mut chars = line.char_indices().peekable();
        while let Some((idx, c)) = chars.next() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            let at_boundary = chars
                .peek()
                .map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                let end = idx + c.len_utf8();
                push_unit(&mut units, &line[start..end]);
                start = end;
            }
        }
        push_unit(&mut units, &line[start..]);
    }
    units
}

fn push_unit(units: &mut Vec<String>, raw: &str) {
    let unit = raw
        .trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•'))
        .trim();
    if !unit.is_empty() {
        units.push(unit.to_string());
    }
}

/// True if the text carries a quantified outcome: a numeral, a percentage or a currency amount.
pub fn has_quantified_metric(text: &str) -> bool {
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let has_currency = text.contains('$') || text.contains('€') || text.contains('£');

    has_digit || has_percent || has_currency
}

/// The first weak passive phrase found in `text`, if any. Phrases only count on word
/// boundaries, so "networked online" does not contain "worked on".
pub fn find_weak_phrase(text: &str) -> Option<&'static str> {
    let text_lower = text.to_lowercase();
    let found = WEAK_PHRASE.find(&text_lower)?;
    WEAK_PHRASES
        .iter()
        .copied()
        .find(|phrase| *phrase == found.as_str())
}

#[derive(Clone)]
pub struct SentenceFeedbackGenerator {
    extractor: KeywordExtractor,
    coverage_threshold: f64,
    min_words: usize,
}

impl SentenceFeedbackGenerator {
    pub fn new(extractor: KeywordExtractor, coverage_threshold: f64, min_words: usize) -> Self {
        Self {
            extractor,
            coverage_threshold,
            min_words,
        }
    }

    /// `reference_keywords` is taken in priority order; suggestions follow that order.
    pub fn generate(&self, candidate_text: &str, reference_keywords: &[String]) -> Vec<SentenceFeedback> {
        let reference: HashSet<&str> = reference_keywords.iter().map(String::as_str).collect();

        split_units(candidate_text)
            .into_iter()
            .filter(|unit| unit.split_whitespace().count() >= self.min_words)
            .map(|unit| self.review_unit(unit, reference_keywords, &reference))
            .collect()
    }

    fn review_unit(
        &self,
        unit: String,
        ordered_reference: &[String],
        reference: &HashSet<&str>,
    ) -> SentenceFeedback {
        let unit_terms = self.extractor.term_set(&unit);
        let covered = reference
            .iter()
            .filter(|term| unit_terms.contains(**term))
            .count();
        let coverage_ratio = covered as f64 / (reference.len() as f64 + COVERAGE_EPSILON);

        let low_coverage = coverage_ratio < self.coverage_threshold;
        let weak_phrase = find_weak_phrase(&unit);
        let mut advice = Vec::new();

        if low_coverage {
            let uncovered: Vec<&str> = ordered_reference
                .iter()
                .map(String::as_str)
                .filter(|term| !unit_terms.contains(*term))
                .take(MAX_SUGGESTED_KEYWORDS)
                .collect();

            if let Some(first) = uncovered.first() {
                advice.push(format!(
                    "Consider adding relevant keywords: {}.",
                    uncovered.join(", ")
                ));
                let base = unit.trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ';' | ','));
                advice.push(format!("Suggested rewrite: \"{base}, demonstrating {first}.\""));
            }
        }

        if let Some(phrase) = weak_phrase {
            advice.push(format!(
                "Replace the passive phrase '{phrase}' with a strong action verb (e.g., 'Led', 'Owned', 'Delivered')."
            ));
        }

        // An adequate unit stays silent even without numbers.
        if (low_coverage || weak_phrase.is_some()) && !has_quantified_metric(&unit) {
            advice.push(
                "Add a quantifiable result: a number, percentage, or currency amount.".to_string(),
            );
        }

        SentenceFeedback {
            sentence: unit,
            coverage_ratio,
            advice,
        }
    }
}
