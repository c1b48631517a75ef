//! Report composition: tier assignment and the serialized analysis result.

use serde::{Deserialize, Serialize};

use crate::analysis::feedback::SentenceFeedback;
use crate::analysis::gaps::MatchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Strong,
    Fair,
    Weak,
}

/// Lower score bounds of the `strong` and `fair` tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTiers {
    pub strong: f64,
    pub fair: f64,
}

impl Default for ScoreTiers {
    fn default() -> Self {
        Self {
            strong: 80.0,
            fair: 50.0,
        }
    }
}

impl ScoreTiers {
    pub fn tier_for(&self, score: f64) -> Tier {
        if score >= self.strong {
            Tier::Strong
        } else if score >= self.fair {
            Tier::Fair
        } else {
            Tier::Weak
        }
    }
}

/// The structure the presentation layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub score: f64,
    pub tier: Tier,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub fuzzy_pairs: Vec<(String, String)>,
    pub synonym_pairs: Vec<(String, String)>,
    pub sentence_feedback: Vec<SentenceFeedback>,
}

pub fn compose_report(
    score: f64,
    matches: MatchResult,
    sentence_feedback: Vec<SentenceFeedback>,
    tiers: &ScoreTiers,
) -> Report {
    Report {
        score,
        tier: tiers.tier_for(score),
        matched_keywords: matches.matched,
        missing_keywords: matches.missing,
        fuzzy_pairs: matches.fuzzy_pairs,
        synonym_pairs: matches.synonym_pairs,
        sentence_feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        let tiers = ScoreTiers::default();
        assert_eq!(tiers.tier_for(100.0), Tier::Strong);
        assert_eq!(tiers.tier_for(80.0), Tier::Strong);
        assert_eq!(tiers.tier_for(79.99), Tier::Fair);
        assert_eq!(tiers.tier_for(50.0), Tier::Fair);
        assert_eq!(tiers.tier_for(49.99), Tier::Weak);
        assert_eq!(tiers.tier_for(0.0), Tier::Weak);
    }

    #[test]
    fn test_custom_tiers() {
        let tiers = ScoreTiers {
            strong: 60.0,
            fair: 30.0,
        };
        assert_eq!(tiers.tier_for(65.0), Tier::Strong);
        assert_eq!(tiers.tier_for(35.0), Tier::Fair);
    }

    #[test]
    fn test_compose_moves_match_groups_into_report() {
        let matches = MatchResult {
            matched: vec!["budgets".to_string()],
            missing: vec!["stakeholders".to_string()],
            fuzzy_pairs: vec![("lead".to_string(), "led".to_string())],
            synonym_pairs: vec![],
        };
        let report = compose_report(55.5, matches, vec![], &ScoreTiers::default());
        assert_eq!(report.tier, Tier::Fair);
        assert_eq!(report.matched_keywords, vec!["budgets"]);
        assert_eq!(report.missing_keywords, vec!["stakeholders"]);
        assert_eq!(report.fuzzy_pairs.len(), 1);
    }

    #[test]
    fn test_report_json_contract() {
        let report = compose_report(12.34, MatchResult::default(), vec![], &ScoreTiers::default());
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "score",
            "tier",
            "matchedKeywords",
            "missingKeywords",
            "fuzzyPairs",
            "synonymPairs",
            "sentenceFeedback",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(json["tier"], "weak");
        assert_eq!(json["score"], 12.34);
    }
}
