use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and which optional collaborators are configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cvmatch-api",
        "keywordStrategy": state.analyzer.strategy_name(),
        "grammarCheck": state.grammar_checker.is_some(),
        "synonymService": state.synonym_provider.is_some()
    }))
}
