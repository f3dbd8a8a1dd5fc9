//! Pre-submission validation reporting
//!
//! The upstream validation layer marks rows with a `ValidationErrors` array
//! of `{field, message}` entries (and a `Valid` flag). Before anything is
//! submitted, those markings are flattened into one record per field-level
//! error so the report surface is uniform with submission errors.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::sequence;

const GENERIC_VALIDATION_MESSAGE: &str = "Row failed validation";

/// One field-level validation finding, stamped with the row's sequence.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationIssue {
    #[serde(rename = "Sequence")]
    pub sequence: String,
    #[serde(rename = "OriginalSequence")]
    pub original_sequence: String,
    #[serde(rename = "originalSequence")]
    pub original_sequence_compat: String,
    #[serde(rename = "Field")]
    pub field: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Status")]
    pub status: String,
    pub timestamp: String,
}

impl ValidationIssue {
    fn new(seq: &str, field: String, message: String, timestamp: &str) -> Self {
        Self {
            sequence: seq.to_string(),
            original_sequence: seq.to_string(),
            original_sequence_compat: seq.to_string(),
            field,
            message,
            status: "Invalid".to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    /// Serialize into the `Value` shape consumed by reports.
    pub fn into_value(self) -> Value {
        serde_json::to_value(&self).unwrap_or(Value::Null)
    }
}

/// Flatten row validation markings into per-field issue records.
///
/// A row with a non-empty `ValidationErrors` array yields one issue per
/// entry. A row flagged `"Valid": false` without field detail yields one
/// generic issue. Clean rows yield nothing.
pub fn format_validation_errors(rows: &[Value]) -> Vec<ValidationIssue> {
    let timestamp = Utc::now().to_rfc3339();
    let mut issues = Vec::new();

    for row in rows {
        let seq = sequence::resolve(row);
        let field_errors = row
            .get("ValidationErrors")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if !field_errors.is_empty() {
            for error in field_errors {
                let field = error
                    .get("field")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or(GENERIC_VALIDATION_MESSAGE)
                    .to_string();
                issues.push(ValidationIssue::new(&seq, field, message, &timestamp));
            }
        } else if row.get("Valid").and_then(Value::as_bool) == Some(false) {
            issues.push(ValidationIssue::new(
                &seq,
                String::new(),
                GENERIC_VALIDATION_MESSAGE.to_string(),
                &timestamp,
            ));
        }
    }

    issues
}
