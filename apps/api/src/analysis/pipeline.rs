//! Analysis pipeline: Normalizer → KeywordExtractor → SimilarityScorer → GapAnalyzer →
//! SentenceFeedbackGenerator → ReportComposer, run as one synchronous sequence.
//!
//! `prepare` does the cheap, fallible part (input validation, scoring and keyword
//! extraction) so the HTTP layer can consult external collaborators with the extracted
//! vocabulary before `finish` produces the report.
//!
//! Synonym lookups speak surface words while keyword maps hold the strategy's term forms
//! (lemmas under `lexical-pos`). `TermSpaceSynonyms` translates between the two.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::analysis::config::AnalysisConfig;
use crate::analysis::error::AnalysisError;
use crate::analysis::feedback::SentenceFeedbackGenerator;
use crate::analysis::gaps::{GapAnalyzer, SynonymLookup};
use crate::analysis::keywords::{KeywordExtractor, KeywordMap};
use crate::analysis::lexicon::LinguisticModel;
use crate::analysis::normalizer::Document;
use crate::analysis::report::{compose_report, Report};
use crate::analysis::similarity;
use crate::analysis::strategy::{build_strategy, KeywordStrategy};

/// Both documents, their similarity score and keyword maps, ready for gap analysis.
#[derive(Debug, Clone)]
pub struct PreparedAnalysis {
    pub candidate: Document,
    pub reference: Document,
    pub score: f64,
    pub candidate_keywords: KeywordMap,
    pub reference_keywords: KeywordMap,
    /// Term form → first surface word that produced it, over both documents.
    pub surface_forms: HashMap<String, String>,
}

impl PreparedAnalysis {
    /// Distinct keywords of both documents as surface words, reference first, in rank order.
    pub fn vocabulary(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.reference_keywords
            .keywords()
            .chain(self.candidate_keywords.keywords())
            .filter(|k| seen.insert(*k))
            .map(|k| self.surface_of(k).to_string())
            .collect()
    }

    pub fn surface_of<'a>(&'a self, term: &'a str) -> &'a str {
        self.surface_forms.get(term).map_or(term, String::as_str)
    }
}

/// A word-level lookup seen through the extractor: queried with a term's surface word,
/// answering in term forms.
struct TermSpaceSynonyms<'a> {
    inner: &'a dyn SynonymLookup,
    extractor: &'a KeywordExtractor,
    prepared: &'a PreparedAnalysis,
}

impl SynonymLookup for TermSpaceSynonyms<'_> {
    fn synonyms(&self, term: &str) -> BTreeSet<String> {
        self.inner
            .synonyms(self.prepared.surface_of(term))
            .iter()
            .map(|word| self.extractor.term_form(word))
            .filter(|form| form != term)
            .collect()
    }
}

pub struct Analyzer {
    config: AnalysisConfig,
    extractor: KeywordExtractor,
    gap_analyzer: GapAnalyzer,
    feedback: SentenceFeedbackGenerator,
    builtin_synonyms: Option<Arc<LinguisticModel>>,
}

impl Analyzer {
    /// Validates `config` and builds the configured strategy. The shared linguistic model is
    /// only initialized when the strategy or the built-in thesaurus needs it.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let needs_model = config.keyword_strategy.needs_model() || config.builtin_synonyms;
        let model = needs_model.then(LinguisticModel::shared);
        let strategy = build_strategy(config.keyword_strategy, model.clone())?;
        let builtin_synonyms = if config.builtin_synonyms { model } else { None };
        Ok(Self::assemble(config, strategy, builtin_synonyms))
    }

    /// Like `new`, with a caller-supplied strategy in place of the configured one.
    pub fn with_strategy(
        config: AnalysisConfig,
        strategy: Arc<dyn KeywordStrategy>,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;
        let builtin_synonyms = config.builtin_synonyms.then(LinguisticModel::shared);
        Ok(Self::assemble(config, strategy, builtin_synonyms))
    }

    fn assemble(
        config: AnalysisConfig,
        strategy: Arc<dyn KeywordStrategy>,
        builtin_synonyms: Option<Arc<LinguisticModel>>,
    ) -> Self {
        let extractor = KeywordExtractor::new(strategy);
        let gap_analyzer = GapAnalyzer::new(config.fuzzy_threshold, config.fuzzy_metric);
        let feedback = SentenceFeedbackGenerator::new(
            extractor.clone(),
            config.sentence_coverage_threshold,
            config.min_sentence_words,
        );
        Self {
            config,
            extractor,
            gap_analyzer,
            feedback,
            builtin_synonyms,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn strategy_name(&self) -> &'static str {
        self.extractor.strategy_name()
    }

    /// The built-in thesaurus, when enabled.
    pub fn builtin_synonyms(&self) -> Option<&dyn SynonymLookup> {
        self.builtin_synonyms
            .as_deref()
            .map(|model| model as &dyn SynonymLookup)
    }

    pub fn extract_keywords(&self, text: &str) -> KeywordMap {
        self.extractor.extract(text, self.config.top_n)
    }

    /// Rejects empty and degenerate inputs, then extracts both keyword maps. Nothing here
    /// performs I/O, so a bad request fails before any collaborator is called.
    pub fn prepare(
        &self,
        candidate_text: &str,
        reference_text: &str,
    ) -> Result<PreparedAnalysis, AnalysisError> {
        let candidate = Document::new(candidate_text);
        if candidate.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "candidate document is empty".to_string(),
            ));
        }
        let reference = Document::new(reference_text);
        if reference.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "reference document is empty".to_string(),
            ));
        }

        let score = similarity::score(candidate.raw_text(), reference.raw_text())?;

        let candidate_keywords = self.extractor.extract_document(&candidate, self.config.top_n);
        let reference_keywords = self.extractor.extract_document(&reference, self.config.top_n);
        let mut surface_forms = HashMap::new();
        self.extractor
            .collect_surface_forms(reference.tokens(), &mut surface_forms);
        self.extractor
            .collect_surface_forms(candidate.tokens(), &mut surface_forms);
        debug!(
            strategy = self.strategy_name(),
            candidate_keywords = candidate_keywords.len(),
            reference_keywords = reference_keywords.len(),
            "Keywords extracted"
        );

        Ok(PreparedAnalysis {
            candidate,
            reference,
            score,
            candidate_keywords,
            reference_keywords,
            surface_forms,
        })
    }

    pub fn finish(
        &self,
        prepared: &PreparedAnalysis,
        synonyms: Option<&dyn SynonymLookup>,
    ) -> Result<Report, AnalysisError> {
        let score = prepared.score;
        let term_space = synonyms.map(|inner| TermSpaceSynonyms {
            inner,
            extractor: &self.extractor,
            prepared,
        });
        let matches = self.gap_analyzer.analyze(
            &prepared.reference_keywords,
            &prepared.candidate_keywords,
            term_space.as_ref().map(|lookup| lookup as &dyn SynonymLookup),
        );

        // Globally missing terms lead the suggestion order; coverage uses the whole set.
        let mut prioritized: Vec<String> = matches.missing.clone();
        prioritized.extend(
            prepared
                .reference_keywords
                .keywords()
                .filter(|k| !matches.missing.iter().any(|m| m.as_str() == *k))
                .map(str::to_string),
        );
        let sentence_feedback = self
            .feedback
            .generate(prepared.candidate.raw_text(), &prioritized);

        debug!(
            score,
            matched = matches.matched.len(),
            missing = matches.missing.len(),
            fuzzy = matches.fuzzy_pairs.len(),
            synonym = matches.synonym_pairs.len(),
            sentences = sentence_feedback.len(),
            "Analysis stages complete"
        );

        Ok(compose_report(
            score,
            matches,
            sentence_feedback,
            &self.config.score_tiers,
        ))
    }

    /// Full pipeline in one call.
    pub fn analyze(
        &self,
        candidate_text: &str,
        reference_text: &str,
        synonyms: Option<&dyn SynonymLookup>,
    ) -> Result<Report, AnalysisError> {
        let prepared = self.prepare(candidate_text, reference_text)?;
        self.finish(&prepared, synonyms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report::Tier;
    use crate::analysis::strategy::KeywordStrategyKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CV: &str = "I led a team and managed budgets";
    const JD: &str = "Looking for someone to lead teams and manage budgets and stakeholders";

    /// Deterministic stub; counts calls so tests can see whether extraction ran.
    struct CountingStrategy(AtomicUsize);

    impl KeywordStrategy for CountingStrategy {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn is_candidate_term(&self, _token: &str) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    fn analyzer() -> Analyzer {
        Analyzer::new(AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_scenario_led_team_budgets() {
        let report = analyzer().analyze(CV, JD, None).unwrap();

        assert!(report.score > 0.0 && report.score < 100.0);
        assert_eq!(report.tier, Tier::Weak);
        assert_eq!(report.matched_keywords, vec!["budgets"]);
        assert!(report.missing_keywords.contains(&"stakeholders".to_string()));
        let fuzzy: Vec<(&str, &str)> = report
            .fuzzy_pairs
            .iter()
            .map(|(r, c)| (r.as_str(), c.as_str()))
            .collect();
        assert_eq!(
            fuzzy,
            vec![("lead", "led"), ("teams", "team"), ("manage", "managed")]
        );
    }

    #[test]
    fn test_empty_candidate_fails_before_extraction() {
        let strategy = Arc::new(CountingStrategy(AtomicUsize::new(0)));
        let analyzer = Analyzer::with_strategy(AnalysisConfig::default(), strategy.clone()).unwrap();

        let err = analyzer.analyze("", JD, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
        assert_eq!(strategy.0.load(Ordering::SeqCst), 0);

        let err = analyzer.analyze("  \n\t", JD, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_reference_is_invalid() {
        let err = analyzer().analyze(CV, "", None).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidInput("reference document is empty".to_string())
        );
    }

    #[test]
    fn test_stopword_only_document_is_degenerate() {
        let err = analyzer().analyze("and the of", JD, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_degenerate_document_fails_in_prepare() {
        let strategy = Arc::new(CountingStrategy(AtomicUsize::new(0)));
        let analyzer = Analyzer::with_strategy(AnalysisConfig::default(), strategy.clone()).unwrap();

        // Single-letter tokens leave the TF-IDF space empty.
        let err = analyzer.prepare("a b c", JD).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
        assert_eq!(strategy.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_prepared_score_is_carried_into_report() {
        let analyzer = analyzer();
        let prepared = analyzer.prepare(CV, JD).unwrap();
        let report = analyzer.finish(&prepared, None).unwrap();
        assert_eq!(report.score, prepared.score);
    }

    #[test]
    fn test_lexical_strategy_matches_synonyms_between_lemmas() {
        let config = AnalysisConfig {
            keyword_strategy: KeywordStrategyKind::LexicalPos,
            builtin_synonyms: true,
            ..AnalysisConfig::default()
        };
        let analyzer = Analyzer::new(config).unwrap();
        let lookup = analyzer.builtin_synonyms().unwrap();
        let report = analyzer
            .analyze("Managed vendor budgets", "Supervise vendor budgets", Some(lookup))
            .unwrap();

        let model = LinguisticModel::shared();
        let supervise = model.lemma("supervise");
        let managed = model.lemma("managed");
        assert_eq!(report.synonym_pairs, vec![(supervise.clone(), managed)]);
        assert!(!report.missing_keywords.contains(&supervise));
    }

    #[test]
    fn test_frequency_strategy_synonym_pairs_use_surface_words() {
        let config = AnalysisConfig {
            builtin_synonyms: true,
            ..AnalysisConfig::default()
        };
        let analyzer = Analyzer::new(config).unwrap();
        let lookup = analyzer.builtin_synonyms().unwrap();
        let report = analyzer
            .analyze("Managed vendor budgets", "Supervise vendor budgets", Some(lookup))
            .unwrap();
        assert_eq!(
            report.synonym_pairs,
            vec![("supervise".to_string(), "managed".to_string())]
        );
    }

    #[test]
    fn test_lexical_vocabulary_is_surface_words() {
        let config = AnalysisConfig {
            keyword_strategy: KeywordStrategyKind::LexicalPos,
            ..AnalysisConfig::default()
        };
        let analyzer = Analyzer::new(config).unwrap();
        let prepared = analyzer.prepare(CV, JD).unwrap();
        let stem = LinguisticModel::shared().lemma("stakeholders");

        assert!(prepared.reference_keywords.contains(&stem));
        let vocab = prepared.vocabulary();
        assert!(vocab.contains(&"stakeholders".to_string()));
        // The reference is read first, so its surface word wins.
        assert!(vocab.contains(&"manage".to_string()));
        assert_ne!(stem, "stakeholders");
        assert!(!vocab.contains(&stem));
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let analyzer = analyzer();
        let cv = "Responsible for team operations and vendor budgets.\nLed 4 engineers shipping a Rust payments platform.";
        let first = serde_json::to_string(&analyzer.analyze(cv, JD, None).unwrap()).unwrap();
        let second = serde_json::to_string(&analyzer.analyze(cv, JD, None).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_identical_documents_are_strong() {
        let report = analyzer().analyze(JD, JD, None).unwrap();
        assert_eq!(report.score, 100.0);
        assert_eq!(report.tier, Tier::Strong);
        assert!(report.missing_keywords.is_empty());
    }

    #[test]
    fn test_lexical_strategy_turns_inflections_into_exact_matches() {
        let config = AnalysisConfig {
            keyword_strategy: KeywordStrategyKind::LexicalPos,
            ..AnalysisConfig::default()
        };
        let report = Analyzer::new(config).unwrap().analyze(CV, JD, None).unwrap();
        assert!(report.matched_keywords.contains(&"lead".to_string()));
        assert!(report.matched_keywords.contains(&"team".to_string()));
        assert!(report.fuzzy_pairs.is_empty());
    }

    #[test]
    fn test_builtin_synonyms_are_exposed_only_when_enabled() {
        assert!(analyzer().builtin_synonyms().is_none());
        let config = AnalysisConfig {
            builtin_synonyms: true,
            ..AnalysisConfig::default()
        };
        let analyzer = Analyzer::new(config).unwrap();
        let lookup = analyzer.builtin_synonyms().unwrap();
        let report = analyzer
            .analyze(
                "Supervised the client onboarding program",
                "Oversee customer onboarding",
                Some(lookup),
            )
            .unwrap();
        assert!(report
            .synonym_pairs
            .contains(&("customer".to_string(), "client".to_string())));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = AnalysisConfig {
            fuzzy_threshold: 2.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            Analyzer::new(config),
            Err(AnalysisError::Configuration(_))
        ));
    }

    #[test]
    fn test_vocabulary_is_distinct_reference_first() {
        let prepared = analyzer().prepare(CV, JD).unwrap();
        let vocab = prepared.vocabulary();
        assert_eq!(vocab.first().map(String::as_str), Some("looking"));
        assert_eq!(vocab.iter().filter(|w| w.as_str() == "budgets").count(), 1);
        assert!(vocab.contains(&"led".to_string()));
    }

    #[test]
    fn test_sentence_feedback_included() {
        let cv = "Responsible for daily team operations and vendor relations";
        let report = analyzer().analyze(cv, JD, None).unwrap();
        assert_eq!(report.sentence_feedback.len(), 1);
        let advice = &report.sentence_feedback[0].advice;
        assert!(advice.iter().any(|a| a.contains("responsible for")));
        // "looking" is globally missing and ranks first among reference terms.
        assert!(advice[0].contains("looking"));
    }
}
