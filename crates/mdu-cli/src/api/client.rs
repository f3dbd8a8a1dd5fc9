//! HTTP submitter for the MDU backend
//!
//! Implements the upload pipeline's transport seam over a JSON batch
//! endpoint. Every failure shape the backend can produce (connection
//! errors, non-2xx responses, `success: false` envelopes) is converted
//! into a [`SubmissionFailure`] here so nothing reaches the tracker
//! un-normalized.

use crate::api::endpoints;
use crate::error::Result;
use async_trait::async_trait;
use mdu_upload::batch::BatchSubmitter;
use mdu_upload::normalize::SubmissionFailure;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

// ============================================================================
// API Client Constants
// ============================================================================

/// Default timeout for batch submissions in seconds.
/// Can be overridden via the MDU_API_TIMEOUT_SECS environment variable.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 120;

/// Response envelope returned by the batch endpoint
#[derive(Debug, Deserialize)]
struct ApiResponse {
    success: bool,
    #[serde(default)]
    error: Option<Value>,
}

/// Batch submitter backed by the MDU HTTP API
pub struct HttpSubmitter {
    client: Client,
    base_url: String,
}

impl HttpSubmitter {
    /// Create a new submitter for the given backend
    pub fn new(base_url: String) -> Result<Self> {
        let timeout_secs = std::env::var("MDU_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Check backend health
    pub async fn health_check(&self) -> bool {
        let url = endpoints::health_url(&self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl BatchSubmitter for HttpSubmitter {
    async fn submit(&self, batch: &[Value]) -> std::result::Result<(), SubmissionFailure> {
        let url = endpoints::batch_records_url(&self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "records": batch }))
            .send()
            .await
            .map_err(|e| SubmissionFailure::Source(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().map(str::to_string);
            let body = response.text().await.ok();
            return Err(SubmissionFailure::Transport {
                status: Some(status.as_u16()),
                status_text,
                body,
            });
        }

        // A 2xx response without a parseable envelope counts as accepted.
        let Ok(envelope_body) = response.text().await else {
            return Ok(());
        };
        let Ok(parsed) = serde_json::from_str::<Value>(&envelope_body) else {
            return Ok(());
        };
        if let Ok(envelope) = serde_json::from_value::<ApiResponse>(parsed.clone()) {
            if !envelope.success {
                return Err(match envelope.error {
                    Some(error) => SubmissionFailure::Payload(json!({ "error": error })),
                    None => SubmissionFailure::Payload(parsed),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn batch() -> Vec<Value> {
        vec![json!({"Sequence": "1", "Material": "M-1"})]
    }

    #[test]
    fn test_submitter_creation() {
        let submitter = HttpSubmitter::new("http://localhost:8000".to_string()).unwrap();
        assert_eq!(submitter.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let submitter = HttpSubmitter::new("http://localhost:9".to_string()).unwrap();
        assert!(!submitter.health_check().await);
    }

    #[tokio::test]
    async fn test_submit_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/records/batch"))
            .and(body_partial_json(json!({"records": batch()})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let submitter = HttpSubmitter::new(server.uri()).unwrap();
        assert!(submitter.submit(&batch()).await.is_ok());
    }

    #[tokio::test]
    async fn test_submit_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/records/batch"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"error":{"message":{"value":"Cost center missing"}}}"#),
            )
            .mount(&server)
            .await;

        let submitter = HttpSubmitter::new(server.uri()).unwrap();
        let failure = submitter.submit(&batch()).await.unwrap_err();
        assert!(matches!(
            failure,
            SubmissionFailure::Transport {
                status: Some(400),
                ..
            }
        ));
        assert_eq!(failure.message(), "Cost center missing");
    }

    #[tokio::test]
    async fn test_submit_envelope_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/records/batch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": {"message": "duplicate records", "code": "DUP/001"}
            })))
            .mount(&server)
            .await;

        let submitter = HttpSubmitter::new(server.uri()).unwrap();
        let failure = submitter.submit(&batch()).await.unwrap_err();
        assert!(matches!(failure, SubmissionFailure::Payload(_)));
        assert_eq!(failure.message(), "duplicate records");
    }

    #[tokio::test]
    async fn test_submit_connection_refused() {
        let submitter = HttpSubmitter::new("http://localhost:9".to_string()).unwrap();
        let failure = submitter.submit(&batch()).await.unwrap_err();
        assert!(matches!(failure, SubmissionFailure::Source(_)));
    }
}
