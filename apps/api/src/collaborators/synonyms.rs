//! Synonym lookup against a Datamuse-compatible `/words?rel_syn=` endpoint.
//!
//! Lookups are resolved into a [`SynonymTable`] before gap analysis, so the engine itself
//! never waits on the network.

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tracing::{debug, warn};

use crate::analysis::gaps::SynonymLookup;
use crate::collaborators::{api_error, bounded, ExternalServiceError};

const MAX_SYNONYMS_PER_WORD: &str = "20";

#[async_trait]
pub trait SynonymProvider: Send + Sync {
    async fn lookup(&self, word: &str) -> Result<BTreeSet<String>, ExternalServiceError>;
}

#[derive(Debug, Deserialize)]
struct DatamuseWord {
    word: String,
}

fn parse_datamuse_response(body: &str) -> Result<BTreeSet<String>, ExternalServiceError> {
    let words: Vec<DatamuseWord> = serde_json::from_str(body)?;
    Ok(words
        .into_iter()
        .map(|w| w.word.to_lowercase())
        .collect())
}

#[derive(Clone)]
pub struct DatamuseClient {
    client: Client,
    base_url: String,
}

impl DatamuseClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ExternalServiceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SynonymProvider for DatamuseClient {
    async fn lookup(&self, word: &str) -> Result<BTreeSet<String>, ExternalServiceError> {
        let url = format!("{}/words", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("rel_syn", word), ("max", MAX_SYNONYMS_PER_WORD)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await?;
        parse_datamuse_response(&body)
    }
}

/// Synonym sets fetched up front for one request's vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynonymTable {
    entries: HashMap<String, BTreeSet<String>>,
}

impl SynonymTable {
    pub fn insert(&mut self, word: impl Into<String>, synonyms: BTreeSet<String>) {
        self.entries.insert(word.into(), synonyms);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SynonymLookup for SynonymTable {
    fn synonyms(&self, word: &str) -> BTreeSet<String> {
        self.entries.get(word).cloned().unwrap_or_default()
    }
}

/// Looks up every word of `vocabulary` concurrently, all within one `limit`. Any failure
/// discards the whole table so a request never mixes partial external results into its
/// classification.
pub async fn resolve_synonyms(
    provider: &dyn SynonymProvider,
    vocabulary: &[String],
    limit: Duration,
) -> Result<SynonymTable, ExternalServiceError> {
    let lookups = vocabulary.iter().map(|word| async move {
        let synonyms = provider.lookup(word).await?;
        Ok::<_, ExternalServiceError>((word.as_str(), synonyms))
    });

    let result = bounded(limit, async {
        let mut table = SynonymTable::default();
        for (word, synonyms) in try_join_all(lookups).await? {
            table.insert(word, synonyms);
        }
        Ok::<_, ExternalServiceError>(table)
    })
    .await;

    match &result {
        Ok(table) => debug!("Resolved synonyms for {} words", table.len()),
        Err(e) => warn!("Synonym lookup unavailable: {e}"),
    }
    result
}
