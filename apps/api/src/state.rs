use std::sync::Arc;

use crate::analysis::pipeline::Analyzer;
use crate::collaborators::grammar::GrammarChecker;
use crate::collaborators::synonyms::SynonymProvider;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Validated engine: keyword strategy, linguistic model handle and thresholds.
    pub analyzer: Arc<Analyzer>,
    /// Set when GRAMMAR_CHECK_URL is configured.
    pub grammar_checker: Option<Arc<dyn GrammarChecker>>,
    /// Set when SYNONYM_SERVICE_URL is configured.
    pub synonym_provider: Option<Arc<dyn SynonymProvider>>,
}
