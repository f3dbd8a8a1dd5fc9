//! Error normalization for submission failures
//!
//! Batch submissions fail in many shapes: plain strings, Rust error values,
//! structured backend envelopes, raw transport responses. The tracker's
//! error list must stay homogeneous for display and reporting, so every
//! failure is converted into one [`ErrorRecord`] shape here. Normalization
//! never fails; every extraction path has a fallback.

use anyhow::Error as AnyError;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::sequence;

const FALLBACK_MESSAGE: &str = "Unknown error occurred";
const EXTRACT_FAILURE_MESSAGE: &str = "Could not extract error message";
const GENERIC_ERROR_CODE: &str = "ERROR";
const BODY_PREVIEW_CHARS: usize = 100;

/// A batch submission failure in one of the shapes producers emit.
#[derive(Debug)]
pub enum SubmissionFailure {
    /// A plain text failure, used verbatim as the message.
    Text(String),
    /// A native error value; its display string becomes the message.
    Source(AnyError),
    /// A structured failure body already parsed as JSON.
    Payload(Value),
    /// A transport-level failure with whatever response detail survived.
    Transport {
        status: Option<u16>,
        status_text: Option<String>,
        body: Option<String>,
    },
}

impl SubmissionFailure {
    /// Extract the best available human-readable message.
    ///
    /// Probe order: verbatim text, native error display, structured
    /// `message` / `error.message` fields, parsed transport body, the
    /// status text/code pairing, a truncated raw body, then a fallback
    /// sentinel.
    pub fn message(&self) -> String {
        match self {
            SubmissionFailure::Text(text) => text.clone(),
            SubmissionFailure::Source(source) => source.to_string(),
            SubmissionFailure::Payload(payload) => {
                structured_message(payload).unwrap_or_else(|| {
                    serde_json::to_string(payload)
                        .unwrap_or_else(|_| EXTRACT_FAILURE_MESSAGE.to_string())
                })
            }
            SubmissionFailure::Transport {
                status,
                status_text,
                body,
            } => transport_message(*status, status_text.as_deref(), body.as_deref()),
        }
    }

    /// The structured error body carried by this failure, if any.
    fn structured_body(&self) -> Option<Value> {
        match self {
            SubmissionFailure::Payload(payload) => Some(payload.clone()),
            SubmissionFailure::Transport { body: Some(body), .. } => {
                serde_json::from_str(body).ok()
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SubmissionFailure {}

impl From<String> for SubmissionFailure {
    fn from(text: String) -> Self {
        SubmissionFailure::Text(text)
    }
}

impl From<&str> for SubmissionFailure {
    fn from(text: &str) -> Self {
        SubmissionFailure::Text(text.to_string())
    }
}

impl From<AnyError> for SubmissionFailure {
    fn from(source: AnyError) -> Self {
        SubmissionFailure::Source(source)
    }
}

/// The uniform error record fed to the progress tracker.
///
/// Field casing matches what downstream report consumers expect, including
/// the dual-cased sequence fields.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub entry: Value,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "ProcessedAt")]
    pub processed_at: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "OriginalSequence")]
    pub original_sequence: String,
    #[serde(rename = "originalSequence")]
    pub original_sequence_compat: String,
    pub error: String,
    pub details: Value,
    #[serde(rename = "errorCode")]
    pub error_code: String,
    pub timestamp: String,
}

impl ErrorRecord {
    /// Serialize into the `Value` shape consumed by the tracker.
    pub fn into_value(self) -> Value {
        serde_json::to_value(&self).unwrap_or(Value::Null)
    }
}

/// Normalize one failed record into an [`ErrorRecord`].
///
/// `index` disambiguates records that carry no sequence at all; they are
/// assigned `Error-{index}` so every error row stays addressable.
pub fn to_error_record(record: &Value, failure: &SubmissionFailure, index: usize) -> ErrorRecord {
    let message = failure.message();

    let mut seq = sequence::resolve(record);
    if seq == sequence::UNKNOWN_SEQUENCE {
        seq = format!("Error-{}", index);
    }

    let structured = failure.structured_body();
    let details = structured
        .as_ref()
        .and_then(|body| body.pointer("/error/message").cloned())
        .unwrap_or_else(|| Value::String(message.clone()));
    let error_code = structured
        .as_ref()
        .and_then(|body| body.pointer("/error/code"))
        .and_then(code_as_string)
        .unwrap_or_else(|| GENERIC_ERROR_CODE.to_string());

    let now = Utc::now().to_rfc3339();
    ErrorRecord {
        entry: record.clone(),
        status: "Error".to_string(),
        processed_at: now.clone(),
        message: message.clone(),
        original_sequence: seq.clone(),
        original_sequence_compat: seq,
        error: message,
        details,
        error_code,
        timestamp: now,
    }
}

fn code_as_string(code: &Value) -> Option<String> {
    match code {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Probe a structured body for a message: `message`, `error.message.value`,
/// then `error.message` when it is a plain string.
fn structured_message(body: &Value) -> Option<String> {
    if let Some(Value::String(message)) = body.get("message") {
        if !message.is_empty() {
            return Some(message.clone());
        }
    }
    if let Some(Value::String(message)) = body.pointer("/error/message/value") {
        if !message.is_empty() {
            return Some(message.clone());
        }
    }
    if let Some(Value::String(message)) = body.pointer("/error/message") {
        if !message.is_empty() {
            return Some(message.clone());
        }
    }
    None
}

fn transport_message(
    status: Option<u16>,
    status_text: Option<&str>,
    body: Option<&str>,
) -> String {
    if let Some(raw) = body {
        if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
            if let Some(message) = structured_message(&parsed) {
                return message;
            }
        }
    }

    match (status_text, status) {
        (Some(text), Some(code)) => return format!("{} ({})", text, code),
        (Some(text), None) => return text.to_string(),
        (None, Some(code)) => return format!("HTTP {}", code),
        (None, None) => {}
    }

    if let Some(raw) = body {
        if !raw.is_empty() {
            return truncate_preview(raw);
        }
    }

    FALLBACK_MESSAGE.to_string()
}

fn truncate_preview(text: &str) -> String {
    if text.chars().count() <= BODY_PREVIEW_CHARS {
        text.to_string()
    } else {
        let preview: String = text.chars().take(BODY_PREVIEW_CHARS).collect();
        format!("{}...", preview)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_native_error_without_sequence() {
        let failure = SubmissionFailure::Source(anyhow::anyhow!("boom"));
        let record = to_error_record(&json!({}), &failure, 3);

        assert_eq!(record.original_sequence, "Error-3");
        assert_eq!(record.original_sequence_compat, "Error-3");
        assert_eq!(record.message, "boom");
        assert_eq!(record.error, "boom");
        assert_eq!(record.error_code, "ERROR");
        assert_eq!(record.status, "Error");
    }

    #[test]
    fn test_text_failure_used_verbatim() {
        let failure = SubmissionFailure::from("quota exceeded");
        let record = to_error_record(&json!({"Sequence": "9"}), &failure, 0);

        assert_eq!(record.message, "quota exceeded");
        assert_eq!(record.original_sequence, "9");
    }

    #[test]
    fn test_record_sequence_preserved() {
        let failure = SubmissionFailure::from("bad row");
        let record = to_error_record(&json!({"entry": {"Sequence": "14"}}), &failure, 5);

        assert_eq!(record.original_sequence, "14");
    }

    #[test]
    fn test_payload_message_field() {
        let failure = SubmissionFailure::Payload(json!({"message": "record rejected"}));
        assert_eq!(failure.message(), "record rejected");
    }

    #[test]
    fn test_payload_nested_error_message() {
        let failure =
            SubmissionFailure::Payload(json!({"error": {"message": "duplicate key"}}));
        assert_eq!(failure.message(), "duplicate key");
    }

    #[test]
    fn test_payload_without_message_stringifies() {
        let failure = SubmissionFailure::Payload(json!({"code": 17}));
        assert_eq!(failure.message(), "{\"code\":17}");
    }

    #[test]
    fn test_transport_body_message_value() {
        let failure = SubmissionFailure::Transport {
            status: Some(400),
            status_text: Some("Bad Request".to_string()),
            body: Some(r#"{"error":{"message":{"value":"Cost center missing"}}}"#.to_string()),
        };
        assert_eq!(failure.message(), "Cost center missing");
    }

    #[test]
    fn test_transport_body_plain_error_message() {
        let failure = SubmissionFailure::Transport {
            status: Some(500),
            status_text: None,
            body: Some(r#"{"error":{"message":"backend unavailable"}}"#.to_string()),
        };
        assert_eq!(failure.message(), "backend unavailable");
    }

    #[test]
    fn test_transport_status_pairing() {
        let failure = SubmissionFailure::Transport {
            status: Some(503),
            status_text: Some("Service Unavailable".to_string()),
            body: None,
        };
        assert_eq!(failure.message(), "Service Unavailable (503)");
    }

    #[test]
    fn test_transport_status_code_only() {
        let failure = SubmissionFailure::Transport {
            status: Some(502),
            status_text: None,
            body: None,
        };
        assert_eq!(failure.message(), "HTTP 502");
    }

    #[test]
    fn test_transport_raw_body_truncated() {
        let failure = SubmissionFailure::Transport {
            status: None,
            status_text: None,
            body: Some("x".repeat(150)),
        };
        let message = failure.message();
        assert_eq!(message.len(), 103);
        assert!(message.ends_with("..."));
    }

    #[test]
    fn test_transport_short_raw_body_kept() {
        let failure = SubmissionFailure::Transport {
            status: None,
            status_text: None,
            body: Some("proxy closed connection".to_string()),
        };
        assert_eq!(failure.message(), "proxy closed connection");
    }

    #[test]
    fn test_transport_nothing_at_all() {
        let failure = SubmissionFailure::Transport {
            status: None,
            status_text: None,
            body: None,
        };
        assert_eq!(failure.message(), "Unknown error occurred");
    }

    #[test]
    fn test_details_prefer_structured_error_message() {
        let failure = SubmissionFailure::Transport {
            status: Some(400),
            status_text: None,
            body: Some(
                r#"{"error":{"code":"VAL/023","message":{"value":"Cost center missing"}}}"#
                    .to_string(),
            ),
        };
        let record = to_error_record(&json!({"Sequence": "2"}), &failure, 0);

        assert_eq!(record.details, json!({"value": "Cost center missing"}));
        assert_eq!(record.error_code, "VAL/023");
    }

    #[test]
    fn test_details_fall_back_to_message() {
        let failure = SubmissionFailure::from("flat failure");
        let record = to_error_record(&json!({"Sequence": "2"}), &failure, 0);

        assert_eq!(record.details, json!("flat failure"));
        assert_eq!(record.error_code, "ERROR");
    }

    #[test]
    fn test_numeric_error_code_stringified() {
        let failure = SubmissionFailure::Payload(json!({"error": {"code": 409}}));
        let record = to_error_record(&json!({"Sequence": "2"}), &failure, 0);

        assert_eq!(record.error_code, "409");
    }

    #[test]
    fn test_into_value_field_names() {
        let failure = SubmissionFailure::from("boom");
        let value = to_error_record(&json!({"Sequence": "4"}), &failure, 0).into_value();

        assert_eq!(value["OriginalSequence"], "4");
        assert_eq!(value["originalSequence"], "4");
        assert_eq!(value["Status"], "Error");
        assert_eq!(value["Message"], "boom");
        assert_eq!(value["errorCode"], "ERROR");
        assert_eq!(value["entry"], json!({"Sequence": "4"}));
        assert!(value["ProcessedAt"].is_string());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_error_record_timestamps_match() {
        let failure = SubmissionFailure::from("boom");
        let record = to_error_record(&json!({}), &failure, 1);
        assert_eq!(record.processed_at, record.timestamp);
    }
}
