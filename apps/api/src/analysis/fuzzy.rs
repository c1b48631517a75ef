//! Normalized string-similarity ratios in [0, 1] used for fuzzy keyword matching.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::analysis::error::AnalysisError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FuzzyMetric {
    /// `2·LCS / (|a| + |b|)`: insertion/deletion edit distance, normalized.
    #[default]
    Indel,
    Levenshtein,
    JaroWinkler,
}

impl FuzzyMetric {
    pub fn ratio(self, a: &str, b: &str) -> f64 {
        match self {
            FuzzyMetric::Indel => indel_ratio(a, b),
            FuzzyMetric::Levenshtein => strsim::normalized_levenshtein(a, b),
            FuzzyMetric::JaroWinkler => strsim::jaro_winkler(a, b),
        }
    }
}

impl FromStr for FuzzyMetric {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indel" => Ok(FuzzyMetric::Indel),
            "levenshtein" => Ok(FuzzyMetric::Levenshtein),
            "jaro-winkler" => Ok(FuzzyMetric::JaroWinkler),
            other => Err(AnalysisError::Configuration(format!(
                "unknown fuzzy metric '{other}' (expected indel, levenshtein or jaro-winkler)"
            ))),
        }
    }
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * longest_common_subsequence(&a, &b)) as f64 / total as f64
}

/// Fuzzy acceptance is strict: a ratio equal to the threshold does not qualify.
pub fn exceeds_threshold(ratio: f64, threshold: f64) -> bool {
    ratio > threshold
}
