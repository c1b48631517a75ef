mod analysis;
mod collaborators;
mod config;
mod errors;
mod loader;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::pipeline::Analyzer;
use crate::collaborators::grammar::{GrammarChecker, LanguageToolClient};
use crate::collaborators::synonyms::{DatamuseClient, SynonymProvider};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Build the analysis engine (validates options, loads the linguistic model if needed)
    let analyzer = Arc::new(Analyzer::new(config.analysis.clone())?);
    info!(
        "Analyzer ready (strategy: {}, top_n: {}, fuzzy: {:?} > {})",
        analyzer.strategy_name(),
        config.analysis.top_n,
        config.analysis.fuzzy_metric,
        config.analysis.fuzzy_threshold
    );

    // Optional collaborators
    let grammar_checker: Option<Arc<dyn GrammarChecker>> = match &config.grammar_check_url {
        Some(url) => {
            info!("Grammar checking enabled ({url})");
            Some(Arc::new(LanguageToolClient::new(url.as_str(), config.external_timeout)?))
        }
        None => None,
    };
    let synonym_provider: Option<Arc<dyn SynonymProvider>> = match &config.synonym_service_url {
        Some(url) => {
            info!("External synonym lookup enabled ({url})");
            Some(Arc::new(DatamuseClient::new(url.as_str(), config.external_timeout)?))
        }
        None => None,
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        analyzer,
        grammar_checker,
        synonym_provider,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
