//! Grammar/style checking against a LanguageTool-compatible `/v2/check` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::collaborators::{api_error, bounded, ExternalServiceError};

/// Returns human-readable issue strings for `text`. The core treats them as opaque.
#[async_trait]
pub trait GrammarChecker: Send + Sync {
    async fn check(&self, text: &str) -> Result<Vec<String>, ExternalServiceError>;
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<CheckMatch>,
}

#[derive(Debug, Deserialize)]
struct CheckMatch {
    message: String,
    offset: usize,
    #[serde(default)]
    replacements: Vec<Replacement>,
}

#[derive(Debug, Deserialize)]
struct Replacement {
    value: String,
}

fn format_match(m: &CheckMatch) -> String {
    match m.replacements.first() {
        Some(r) => format!(
            "{} (at offset {}; suggestion: '{}')",
            m.message, m.offset, r.value
        ),
        None => format!("{} (at offset {})", m.message, m.offset),
    }
}

fn parse_check_response(body: &str) -> Result<Vec<String>, ExternalServiceError> {
    let response: CheckResponse = serde_json::from_str(body)?;
    Ok(response.matches.iter().map(format_match).collect())
}

#[derive(Clone)]
pub struct LanguageToolClient {
    client: Client,
    base_url: String,
    language: String,
}

impl LanguageToolClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ExternalServiceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: "en-US".to_string(),
        })
    }
}

#[async_trait]
impl GrammarChecker for LanguageToolClient {
    async fn check(&self, text: &str) -> Result<Vec<String>, ExternalServiceError> {
        let url = format!("{}/v2/check", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await?;
        let issues = parse_check_response(&body)?;
        debug!("Grammar check returned {} issues", issues.len());
        Ok(issues)
    }
}

/// Grammar results as reported to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrammarSection {
    pub available: bool,
    pub issues: Vec<String>,
}

/// Runs the optional checker under `limit`. Absence, failure and timeout all yield an
/// empty, unavailable section.
pub async fn check_grammar(
    checker: Option<&dyn GrammarChecker>,
    text: &str,
    limit: Duration,
) -> GrammarSection {
    let Some(checker) = checker else {
        return GrammarSection {
            available: false,
            issues: vec![],
        };
    };

    match bounded(limit, checker.check(text)).await {
        Ok(issues) => GrammarSection {
            available: true,
            issues,
        },
        Err(e) => {
            warn!("Grammar check unavailable: {e}");
            GrammarSection {
                available: false,
                issues: vec![],
            }
        }
    }
}
