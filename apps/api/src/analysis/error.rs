use thiserror::Error;

/// Failures raised by the analysis engine itself.
///
/// External collaborator failures never show up here. They are absorbed at the
/// collaborator boundary and reported as "unavailable" instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
