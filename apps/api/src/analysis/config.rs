use serde::{Deserialize, Serialize};

use crate::analysis::error::AnalysisError;
use crate::analysis::fuzzy::FuzzyMetric;
use crate::analysis::report::ScoreTiers;
use crate::analysis::strategy::KeywordStrategyKind;

/// Engine options. Validated once, before any document is processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Keyword cap per document.
    pub top_n: usize,
    pub fuzzy_threshold: f64,
    pub fuzzy_metric: FuzzyMetric,
    pub sentence_coverage_threshold: f64,
    pub min_sentence_words: usize,
    pub score_tiers: ScoreTiers,
    pub keyword_strategy: KeywordStrategyKind,
    /// Use the built-in thesaurus when no external synonym service answers.
    pub builtin_synonyms: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: 30,
            fuzzy_threshold: 0.75,
            fuzzy_metric: FuzzyMetric::default(),
            sentence_coverage_threshold: 0.3,
            min_sentence_words: 5,
            score_tiers: ScoreTiers::default(),
            keyword_strategy: KeywordStrategyKind::default(),
            builtin_synonyms: false,
        }
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<(), AnalysisError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AnalysisError::Configuration(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.top_n == 0 {
            return Err(AnalysisError::Configuration(
                "top_n must be at least 1".to_string(),
            ));
        }
        check_unit_interval("fuzzy_threshold", self.fuzzy_threshold)?;
        check_unit_interval(
            "sentence_coverage_threshold",
            self.sentence_coverage_threshold,
        )?;

        let ScoreTiers { strong, fair } = self.score_tiers;
        if !(0.0..=100.0).contains(&strong) || !(0.0..=100.0).contains(&fair) {
            return Err(AnalysisError::Configuration(format!(
                "score tiers must be within [0, 100], got strong={strong} fair={fair}"
            )));
        }
        if fair > strong {
            return Err(AnalysisError::Configuration(format!(
                "fair tier ({fair}) cannot start above strong tier ({strong})"
            )));
        }
        Ok(())
    }
}
