//! Keyword extraction: ranks accepted terms by frequency, first occurrence breaking ties.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::analysis::normalizer::Document;
use crate::analysis::stopwords::is_stopword;
use crate::analysis::strategy::KeywordStrategy;

/// A single ranked keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency: u32,
}

/// Keyword → frequency, iterated in rank order (descending frequency, then first occurrence).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMap {
    entries: Vec<KeywordEntry>,
}

impl KeywordMap {
    /// Counts `terms` and keeps the `top_n` best ranked.
    pub fn from_terms<I>(terms: I, top_n: usize) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut entries: Vec<KeywordEntry> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for term in terms {
            match positions.get(&term) {
                Some(&idx) => entries[idx].frequency += 1,
                None => {
                    positions.insert(term.clone(), entries.len());
                    entries.push(KeywordEntry {
                        keyword: term,
                        frequency: 1,
                    });
                }
            }
        }

        // Stable sort keeps first-occurrence order among equal frequencies.
        entries.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        entries.truncate(top_n);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordEntry> {
        self.entries.iter()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.keyword.as_str())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.entries.iter().any(|e| e.keyword == keyword)
    }

    pub fn frequency(&self, keyword: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.keyword == keyword)
            .map(|e| e.frequency)
    }
}

/// Applies stopword filtering and the injected strategy to a token stream.
#[derive(Clone)]
pub struct KeywordExtractor {
    strategy: Arc<dyn KeywordStrategy>,
}

impl KeywordExtractor {
    pub fn new(strategy: Arc<dyn KeywordStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    fn accepted<'a>(&'a self, tokens: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        tokens
            .iter()
            .map(String::as_str)
            .filter(|t| !is_stopword(t))
            .filter(|t| self.strategy.is_candidate_term(t))
    }

    /// Accepted term forms in document order, repeats included.
    pub fn terms(&self, tokens: &[String]) -> Vec<String> {
        self.accepted(tokens).map(|t| self.term_form(t)).collect()
    }

    /// The strategy's term form of a single word.
    pub fn term_form(&self, word: &str) -> String {
        self.strategy.term_form(word).into_owned()
    }

    /// Records the first token that produced each accepted term. Terms already present keep
    /// their earlier surface word.
    pub fn collect_surface_forms(&self, tokens: &[String], surfaces: &mut HashMap<String, String>) {
        for token in self.accepted(tokens) {
            surfaces
                .entry(self.term_form(token))
                .or_insert_with(|| token.to_string());
        }
    }

    /// Distinct accepted terms of a piece of text.
    pub fn term_set(&self, text: &str) -> HashSet<String> {
        self.terms(Document::new(text).tokens()).into_iter().collect()
    }

    pub fn extract(&self, text: &str, top_n: usize) -> KeywordMap {
        self.extract_document(&Document::new(text), top_n)
    }

    pub fn extract_document(&self, document: &Document, top_n: usize) -> KeywordMap {
        KeywordMap::from_terms(self.terms(document.tokens()), top_n)
    }
}
