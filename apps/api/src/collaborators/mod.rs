/// External collaborators: grammar checking and synonym lookup over HTTP.
///
/// These are the only calls in the service that block on I/O. Every call is bounded by a
/// timeout and made once; on failure the caller degrades to an empty result and reports the
/// feature as unavailable. No error from here ever fails an analysis.
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub mod grammar;
pub mod synonyms;

#[derive(Debug, Error)]
pub enum ExternalServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Runs `call` once under `limit`.
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, ExternalServiceError>
where
    F: Future<Output = Result<T, ExternalServiceError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| ExternalServiceError::Timeout(limit))?
}

/// Availability of an optional sub-feature, as reported to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'static str>,
}

impl ServiceStatus {
    pub fn available(source: &'static str) -> Self {
        Self {
            available: true,
            source: Some(source),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            source: None,
        }
    }
}

/// Reads the error body of a non-success response into `ExternalServiceError::Api`.
pub(crate) async fn api_error(response: reqwest::Response) -> ExternalServiceError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    ExternalServiceError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_through_success() {
        let result = bounded(Duration::from_secs(1), async { Ok::<_, ExternalServiceError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let result = bounded(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, ExternalServiceError>(())
        })
        .await;
        assert!(matches!(result, Err(ExternalServiceError::Timeout(_))));
    }

    #[test]
    fn test_unavailable_status_omits_source() {
        let json = serde_json::to_value(ServiceStatus::unavailable()).unwrap();
        assert_eq!(json, serde_json::json!({ "available": false }));
    }
}
