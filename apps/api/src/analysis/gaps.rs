//! Gap Analysis: classifies every reference keyword against the candidate's keywords.
//!
//! Rules run top down and the first one that applies wins:
//! exact → synonym (only with a lookup) → fuzzy (ratio strictly above threshold) → missing.
//! Both keyword maps are walked in rank order, so identical inputs give identical output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::analysis::fuzzy::{exceeds_threshold, FuzzyMetric};
use crate::analysis::keywords::KeywordMap;
use crate::analysis::lexicon::LinguisticModel;

// ────────────────────────────────────────────────────────────────────────────
// Synonym capability
// ────────────────────────────────────────────────────────────────────────────

/// Word → synonym set. Implementations must be deterministic for a given word.
pub trait SynonymLookup: Send + Sync {
    fn synonyms(&self, word: &str) -> BTreeSet<String>;
}

impl SynonymLookup for LinguisticModel {
    fn synonyms(&self, word: &str) -> BTreeSet<String> {
        LinguisticModel::synonyms(self, word)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Classification of the reference keywords. Each reference term lands in exactly one group.
/// Pairs are `(reference_term, candidate_term)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub fuzzy_pairs: Vec<(String, String)>,
    pub synonym_pairs: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Synonym(String),
    Fuzzy(String),
    Missing,
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapAnalyzer {
    fuzzy_threshold: f64,
    metric: FuzzyMetric,
}

impl GapAnalyzer {
    pub fn new(fuzzy_threshold: f64, metric: FuzzyMetric) -> Self {
        Self {
            fuzzy_threshold,
            metric,
        }
    }

    pub fn analyze(
        &self,
        reference: &KeywordMap,
        candidate: &KeywordMap,
        synonyms: Option<&dyn SynonymLookup>,
    ) -> MatchResult {
        let candidate_terms: Vec<&str> = candidate.keywords().collect();
        // Looked up once per candidate term, not once per (reference, candidate) pair.
        let candidate_synonyms: Option<Vec<BTreeSet<String>>> = synonyms
            .map(|lookup| candidate_terms.iter().map(|t| lookup.synonyms(t)).collect());

        let mut result = MatchResult::default();

        for term in reference.keywords() {
            let kind = self.classify(term, &candidate_terms, synonyms, candidate_synonyms.as_deref());
            match kind {
                MatchKind::Exact => result.matched.push(term.to_string()),
                MatchKind::Synonym(c) => result.synonym_pairs.push((term.to_string(), c)),
                MatchKind::Fuzzy(c) => result.fuzzy_pairs.push((term.to_string(), c)),
                MatchKind::Missing => result.missing.push(term.to_string()),
            }
        }

        result
    }

    fn classify(
        &self,
        term: &str,
        candidate_terms: &[&str],
        synonyms: Option<&dyn SynonymLookup>,
        candidate_synonyms: Option<&[BTreeSet<String>]>,
    ) -> MatchKind {
        if candidate_terms.contains(&term) {
            return MatchKind::Exact;
        }

        if let (Some(lookup), Some(candidate_synonyms)) = (synonyms, candidate_synonyms) {
            let term_synonyms = lookup.synonyms(term);
            let hit = candidate_terms
                .iter()
                .zip(candidate_synonyms)
                .find(|(candidate, syns)| syns.contains(term) || term_synonyms.contains(**candidate));
            if let Some((candidate, _)) = hit {
                return MatchKind::Synonym(candidate.to_string());
            }
        }

        let fuzzy = candidate_terms.iter().find(|candidate| {
            **candidate != term
                && exceeds_threshold(self.metric.ratio(term, candidate), self.fuzzy_threshold)
        });
        if let Some(candidate) = fuzzy {
            return MatchKind::Fuzzy(candidate.to_string());
        }

        MatchKind::Missing
    }
}

impl MatchResult {
    /// Every reference term covered by this result, whichever group it landed in.
    pub fn covered_terms(&self) -> Vec<&str> {
        self.matched
            .iter()
            .map(String::as_str)
            .chain(self.missing.iter().map(String::as_str))
            .chain(self.fuzzy_pairs.iter().map(|(r, _)| r.as_str()))
            .chain(self.synonym_pairs.iter().map(|(r, _)| r.as_str()))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fuzzy::indel_ratio;
    use std::collections::{HashMap, HashSet};

    fn map(terms: &[&str]) -> KeywordMap {
        KeywordMap::from_terms(terms.iter().map(|t| t.to_string()), 100)
    }

    fn analyzer() -> GapAnalyzer {
        GapAnalyzer::new(0.75, FuzzyMetric::Indel)
    }

    struct FixedSynonyms(HashMap<&'static str, &'static [&'static str]>);

    impl SynonymLookup for FixedSynonyms {
        fn synonyms(&self, word: &str) -> BTreeSet<String> {
            self.0
                .get(word)
                .map(|syns| syns.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default()
        }
    }

    #[test]
    fn test_scenario_inflections_are_fuzzy_and_gap_is_missing() {
        let reference = map(&["looking", "lead", "teams", "manage", "budgets", "stakeholders"]);
        let candidate = map(&["led", "team", "managed", "budgets"]);

        let result = analyzer().analyze(&reference, &candidate, None);

        assert_eq!(result.matched, vec!["budgets"]);
        assert_eq!(
            result.fuzzy_pairs,
            vec![
                ("lead".to_string(), "led".to_string()),
                ("teams".to_string(), "team".to_string()),
                ("manage".to_string(), "managed".to_string()),
            ]
        );
        assert_eq!(result.missing, vec!["looking", "stakeholders"]);
        assert!(result.synonym_pairs.is_empty());
    }

    #[test]
    fn test_exact_match_is_never_reported_as_fuzzy() {
        let reference = map(&["rust"]);
        let candidate = map(&["rusty", "rust"]);
        let result = analyzer().analyze(&reference, &candidate, None);
        assert_eq!(result.matched, vec!["rust"]);
        assert!(result.fuzzy_pairs.is_empty());
    }

    #[test]
    fn test_ratio_at_threshold_is_not_fuzzy() {
        // indel("abcd", "abce") == 0.75 exactly.
        let result = analyzer().analyze(&map(&["abcd"]), &map(&["abce"]), None);
        assert_eq!(result.missing, vec!["abcd"]);
        assert!(result.fuzzy_pairs.is_empty());
    }

    #[test]
    fn test_ratio_just_above_threshold_is_fuzzy() {
        // indel("abcde", "abcdx") == 0.8; threshold 0.7999 sits just below it.
        let strict = GapAnalyzer::new(0.8, FuzzyMetric::Indel);
        let loose = GapAnalyzer::new(0.7999, FuzzyMetric::Indel);
        let reference = map(&["abcde"]);
        let candidate = map(&["abcdx"]);
        assert_eq!(strict.analyze(&reference, &candidate, None).missing, vec!["abcde"]);
        assert_eq!(
            loose.analyze(&reference, &candidate, None).fuzzy_pairs,
            vec![("abcde".to_string(), "abcdx".to_string())]
        );
    }

    #[test]
    fn test_ratio_barely_above_default_threshold_is_fuzzy() {
        // 751 shared chars out of 1000 on each side: indel == 1502 / 2000 == 0.751.
        let reference = format!("{}{}", "a".repeat(751), "b".repeat(249));
        let candidate = format!("{}{}", "a".repeat(751), "c".repeat(249));
        assert!((indel_ratio(&reference, &candidate) - 0.751).abs() < 1e-12);

        let result = analyzer().analyze(&map(&[reference.as_str()]), &map(&[candidate.as_str()]), None);
        assert_eq!(result.fuzzy_pairs, vec![(reference, candidate)]);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_fuzzy_tie_goes_to_first_candidate_in_rank_order() {
        // Both "teams" and "teamx" score 8/9 against "team"; "teamx" ranks first.
        let candidate = KeywordMap::from_terms(
            ["teamx", "teamx", "teams"].iter().map(|t| t.to_string()),
            10,
        );
        let result = analyzer().analyze(&map(&["team"]), &candidate, None);
        assert_eq!(result.fuzzy_pairs, vec![("team".to_string(), "teamx".to_string())]);
    }

    #[test]
    fn test_synonym_match_beats_fuzzy() {
        let lookup = FixedSynonyms(HashMap::from([("client", &["customer"][..])]));
        // "customers" would also fuzzy-match "customer"; synonym runs first.
        let reference = map(&["customer"]);
        let candidate = map(&["client", "customers"]);
        let result = analyzer().analyze(&reference, &candidate, Some(&lookup));
        assert_eq!(
            result.synonym_pairs,
            vec![("customer".to_string(), "client".to_string())]
        );
        assert!(result.fuzzy_pairs.is_empty());
    }

    #[test]
    fn test_synonym_match_works_in_either_direction() {
        let lookup = FixedSynonyms(HashMap::from([("lead", &["manage"][..])]));
        let result = analyzer().analyze(&map(&["lead"]), &map(&["manage"]), Some(&lookup));
        assert_eq!(result.synonym_pairs, vec![("lead".to_string(), "manage".to_string())]);
    }

    #[test]
    fn test_synonyms_ignored_without_lookup() {
        let result = analyzer().analyze(&map(&["customer"]), &map(&["client"]), None);
        assert_eq!(result.missing, vec!["customer"]);
    }

    #[test]
    fn test_builtin_model_acts_as_lookup() {
        let model = LinguisticModel::load();
        let result = analyzer().analyze(&map(&["oversee"]), &map(&["supervise"]), Some(&model));
        assert_eq!(
            result.synonym_pairs,
            vec![("oversee".to_string(), "supervise".to_string())]
        );
    }

    #[test]
    fn test_groups_partition_reference_terms() {
        let lookup = FixedSynonyms(HashMap::from([("client", &["customer"][..])]));
        let reference = map(&[
            "rust", "kafka", "customer", "teams", "kubernetes", "terraform", "python",
        ]);
        let candidate = map(&["rust", "client", "team", "pythons", "go"]);
        let result = analyzer().analyze(&reference, &candidate, Some(&lookup));

        let covered = result.covered_terms();
        let distinct: HashSet<&str> = covered.iter().copied().collect();
        assert_eq!(covered.len(), distinct.len(), "groups overlap: {covered:?}");
        let expected: HashSet<&str> = reference.keywords().collect();
        assert_eq!(distinct, expected);
    }

    #[test]
    fn test_empty_candidate_makes_everything_missing() {
        let result = analyzer().analyze(&map(&["rust", "go"]), &KeywordMap::default(), None);
        assert_eq!(result.missing, vec!["rust", "go"]);
    }

    #[test]
    fn test_match_result_serializes_pairs_as_arrays() {
        let result = MatchResult {
            fuzzy_pairs: vec![("lead".to_string(), "led".to_string())],
            ..MatchResult::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["fuzzy_pairs"][0], serde_json::json!(["lead", "led"]));
    }
}
