//! Keyword strategies: pluggable, trait-based term selection for the keyword extractor.
//!
//! Default: `FrequencyStrategy` (every non-stopword token counts).
//! `HeuristicPosStrategy` filters on surface suffixes; `LexicalPosStrategy` asks the
//! linguistic model and keeps lemmas instead of surface forms.
//!
//! The extractor holds an `Arc<dyn KeywordStrategy>`, chosen at startup via config.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::analysis::error::AnalysisError;
use crate::analysis::lexicon::{heuristic_pos, LinguisticModel};

/// Decides which normalized tokens count as keywords, and in which form.
///
/// Stopwords never reach a strategy; the extractor filters them first.
pub trait KeywordStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_candidate_term(&self, token: &str) -> bool;

    /// The form the extractor records for an accepted token.
    fn term_form<'a>(&self, token: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(token)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeywordStrategyKind {
    #[default]
    Frequency,
    HeuristicPos,
    LexicalPos,
}

impl KeywordStrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordStrategyKind::Frequency => "frequency",
            KeywordStrategyKind::HeuristicPos => "heuristic-pos",
            KeywordStrategyKind::LexicalPos => "lexical-pos",
        }
    }

    pub fn needs_model(self) -> bool {
        self == KeywordStrategyKind::LexicalPos
    }
}

impl fmt::Display for KeywordStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeywordStrategyKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frequency" => Ok(KeywordStrategyKind::Frequency),
            "heuristic-pos" => Ok(KeywordStrategyKind::HeuristicPos),
            "lexical-pos" => Ok(KeywordStrategyKind::LexicalPos),
            other => Err(AnalysisError::Configuration(format!(
                "unknown keyword strategy '{other}' (expected frequency, heuristic-pos or lexical-pos)"
            ))),
        }
    }
}

pub struct FrequencyStrategy;

impl KeywordStrategy for FrequencyStrategy {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn is_candidate_term(&self, _token: &str) -> bool {
        true
    }
}

pub struct HeuristicPosStrategy;

impl KeywordStrategy for HeuristicPosStrategy {
    fn name(&self) -> &'static str {
        "heuristic-pos"
    }

    fn is_candidate_term(&self, token: &str) -> bool {
        heuristic_pos(token).is_content()
    }
}

pub struct LexicalPosStrategy {
    model: Arc<LinguisticModel>,
}

impl LexicalPosStrategy {
    pub fn new(model: Arc<LinguisticModel>) -> Self {
        Self { model }
    }
}

impl KeywordStrategy for LexicalPosStrategy {
    fn name(&self) -> &'static str {
        "lexical-pos"
    }

    fn is_candidate_term(&self, token: &str) -> bool {
        self.model.tag(token).pos.is_content()
    }

    fn term_form<'a>(&self, token: &'a str) -> Cow<'a, str> {
        Cow::Owned(self.model.lemma(token))
    }
}

/// Builds the strategy for `kind`. `model` is only consulted by `lexical-pos`.
pub fn build_strategy(
    kind: KeywordStrategyKind,
    model: Option<Arc<LinguisticModel>>,
) -> Result<Arc<dyn KeywordStrategy>, AnalysisError> {
    match kind {
        KeywordStrategyKind::Frequency => Ok(Arc::new(FrequencyStrategy)),
        KeywordStrategyKind::HeuristicPos => Ok(Arc::new(HeuristicPosStrategy)),
        KeywordStrategyKind::LexicalPos => {
            let model = model.ok_or_else(|| {
                AnalysisError::Configuration(
                    "lexical-pos strategy requires a linguistic model".to_string(),
                )
            })?;
            Ok(Arc::new(LexicalPosStrategy::new(model)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_kind_parses_config_values() {
        assert_eq!(
            "frequency".parse::<KeywordStrategyKind>().unwrap(),
            KeywordStrategyKind::Frequency
        );
        assert_eq!(
            " Heuristic-POS ".parse::<KeywordStrategyKind>().unwrap(),
            KeywordStrategyKind::HeuristicPos
        );
        assert_eq!(
            "lexical-pos".parse::<KeywordStrategyKind>().unwrap(),
            KeywordStrategyKind::LexicalPos
        );
    }

    #[test]
    fn test_unknown_strategy_is_configuration_error() {
        let err = "spacy".parse::<KeywordStrategyKind>().unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn test_strategy_kind_serde_is_kebab_case() {
        let json = serde_json::to_string(&KeywordStrategyKind::HeuristicPos).unwrap();
        assert_eq!(json, r#""heuristic-pos""#);
    }

    #[test]
    fn test_frequency_accepts_everything() {
        assert!(FrequencyStrategy.is_candidate_term("quickly"));
        assert_eq!(FrequencyStrategy.term_form("teams"), "teams");
    }

    #[test]
    fn test_heuristic_rejects_adverbs_and_numerals() {
        assert!(HeuristicPosStrategy.is_candidate_term("deployment"));
        assert!(HeuristicPosStrategy.is_candidate_term("rust"));
        assert!(!HeuristicPosStrategy.is_candidate_term("quickly"));
        assert!(!HeuristicPosStrategy.is_candidate_term("2024"));
    }

    #[test]
    fn test_lexical_strategy_keeps_lemmas() {
        let strategy = LexicalPosStrategy::new(Arc::new(LinguisticModel::load()));
        assert!(strategy.is_candidate_term("led"));
        assert_eq!(strategy.term_form("led"), "lead");
        assert_eq!(strategy.term_form("teams"), "team");
        assert!(!strategy.is_candidate_term("very"));
    }

    #[test]
    fn test_lexical_strategy_without_model_is_rejected() {
        let result = build_strategy(KeywordStrategyKind::LexicalPos, None);
        assert!(matches!(result, Err(AnalysisError::Configuration(_))));
    }
}
