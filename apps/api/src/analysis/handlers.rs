use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::gaps::SynonymLookup;
use crate::analysis::report::Report;
use crate::collaborators::grammar::{check_grammar, GrammarSection};
use crate::collaborators::synonyms::resolve_synonyms;
use crate::collaborators::ServiceStatus;
use crate::errors::AppError;
use crate::loader;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub candidate_text: String,
    pub reference_text: String,
}

/// Report plus per-request metadata. `report` alone is deterministic.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub report: Report,
    pub grammar: GrammarSection,
    pub synonyms: ServiceStatus,
}

/// POST /api/v1/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let response = run_analysis(&state, &req.candidate_text, &req.reference_text).await?;
    Ok(Json(response))
}

/// POST /api/v1/analyze/upload
/// Multipart fields `candidate` and `reference`, each a .pdf, .txt or .md file.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut candidate = None;
    let mut reference = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or(name.as_str()).to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read field '{name}': {e}")))?;

        match name.as_str() {
            "candidate" => candidate = Some(loader::extract_text(&file_name, &bytes)?),
            "reference" => reference = Some(loader::extract_text(&file_name, &bytes)?),
            _ => {} // unknown fields are ignored
        }
    }

    let candidate =
        candidate.ok_or_else(|| AppError::Validation("Missing multipart field 'candidate'".into()))?;
    let reference =
        reference.ok_or_else(|| AppError::Validation("Missing multipart field 'reference'".into()))?;

    let response = run_analysis(&state, &candidate, &reference).await?;
    Ok(Json(response))
}

async fn run_analysis(
    state: &AppState,
    candidate_text: &str,
    reference_text: &str,
) -> Result<AnalyzeResponse, AppError> {
    let analyzer = &state.analyzer;
    let prepared = analyzer.prepare(candidate_text, reference_text)?;
    let limit = state.config.external_timeout;
    let vocabulary = prepared.vocabulary();

    let synonym_call = async {
        match state.synonym_provider.as_deref() {
            Some(provider) => resolve_synonyms(provider, &vocabulary, limit).await.ok(),
            None => None,
        }
    };
    let grammar_call = check_grammar(state.grammar_checker.as_deref(), candidate_text, limit);
    let (external, grammar) = tokio::join!(synonym_call, grammar_call);

    // External table wins; the built-in thesaurus covers an absent or failed provider.
    let (lookup, synonyms): (Option<&dyn SynonymLookup>, ServiceStatus) = match &external {
        Some(table) => (
            Some(table as &dyn SynonymLookup),
            ServiceStatus::available("external"),
        ),
        None => match analyzer.builtin_synonyms() {
            Some(builtin) => (Some(builtin), ServiceStatus::available("builtin")),
            None => (None, ServiceStatus::unavailable()),
        },
    };

    let report = analyzer.finish(&prepared, lookup)?;
    let analysis_id = Uuid::new_v4();
    info!(
        %analysis_id,
        score = report.score,
        tier = ?report.tier,
        grammar = grammar.available,
        synonyms = synonyms.available,
        "Analysis complete"
    );

    Ok(AnalyzeResponse {
        analysis_id,
        generated_at: Utc::now(),
        report,
        grammar,
        synonyms,
    })
}
