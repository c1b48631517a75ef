//! Normalizer: lowercases, replaces every non-`[a-z0-9]` character with a space, tokenizes.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("static pattern is valid"));

/// Lowercases `text` and blanks out everything that is not `[a-z0-9]` or whitespace.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_ALPHANUMERIC.replace_all(&lowered, " ").into_owned()
}

/// Splits cleaned text into non-empty tokens. Empty input yields an empty vec.
pub fn normalize(text: &str) -> Vec<String> {
    clean_text(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// A document as it flows through the pipeline: the raw text plus its token stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    raw_text: String,
    normalized_tokens: Vec<String>,
}

impl Document {
    pub fn new(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let normalized_tokens = normalize(&raw_text);
        Self {
            raw_text,
            normalized_tokens,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn tokens(&self) -> &[String] {
        &self.normalized_tokens
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_tokens.is_empty()
    }
}
