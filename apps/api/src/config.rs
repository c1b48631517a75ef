use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

use crate::analysis::config::AnalysisConfig;
use crate::analysis::report::ScoreTiers;

/// Application configuration loaded from environment variables.
/// Startup fails if any value is malformed or the engine options do not validate.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base URL of a LanguageTool-compatible server. Grammar checking is off when unset.
    pub grammar_check_url: Option<String>,
    /// Base URL of a Datamuse-compatible server. External synonyms are off when unset.
    pub synonym_service_url: Option<String>,
    pub external_timeout: Duration,
    pub max_upload_bytes: usize,
    pub analysis: AnalysisConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AnalysisConfig::default();
        let tier_defaults = ScoreTiers::default();

        let analysis = AnalysisConfig {
            top_n: parse_or(&lookup, "KEYWORD_TOP_N", defaults.top_n)?,
            fuzzy_threshold: parse_or(&lookup, "FUZZY_THRESHOLD", defaults.fuzzy_threshold)?,
            fuzzy_metric: parse_or(&lookup, "FUZZY_METRIC", defaults.fuzzy_metric)?,
            sentence_coverage_threshold: parse_or(
                &lookup,
                "SENTENCE_COVERAGE_THRESHOLD",
                defaults.sentence_coverage_threshold,
            )?,
            min_sentence_words: parse_or(&lookup, "MIN_SENTENCE_WORDS", defaults.min_sentence_words)?,
            score_tiers: ScoreTiers {
                strong: parse_or(&lookup, "SCORE_TIER_STRONG", tier_defaults.strong)?,
                fair: parse_or(&lookup, "SCORE_TIER_FAIR", tier_defaults.fair)?,
            },
            keyword_strategy: parse_or(&lookup, "KEYWORD_STRATEGY", defaults.keyword_strategy)?,
            builtin_synonyms: parse_or(&lookup, "BUILTIN_SYNONYMS", defaults.builtin_synonyms)?,
        };
        analysis
            .validate()
            .context("Invalid analysis configuration")?;

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            grammar_check_url: non_empty(lookup("GRAMMAR_CHECK_URL")),
            synonym_service_url: non_empty(lookup("SYNONYM_SERVICE_URL")),
            external_timeout: Duration::from_millis(parse_or(&lookup, "EXTERNAL_TIMEOUT_MS", 2000)?),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            analysis,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup(key)) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value '{raw}': {e}")),
    }
}
