//! Row file loading
//!
//! The upload source is a JSON array of row objects produced by the
//! spreadsheet parsing layer. Rows normally carry a `Sequence` field from
//! the template's "Seq. ID" column; rows that arrive without one are
//! backfilled with their 1-based position so every outcome stays traceable
//! to a spreadsheet row.

use crate::error::{CliError, Result};
use serde_json::Value;
use std::path::Path;

/// Load a row file, enforcing the array-of-objects shape.
pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<Value>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let parsed: Value = serde_json::from_str(&content)?;

    let Value::Array(rows) = parsed else {
        return Err(CliError::invalid_rows("top-level value is not an array"));
    };

    for (i, row) in rows.iter().enumerate() {
        if !row.is_object() {
            return Err(CliError::invalid_rows(format!(
                "row {} is not an object",
                i + 1
            )));
        }
    }

    Ok(rows)
}

/// Backfill missing or empty `Sequence` fields with the 1-based row position.
pub fn assign_missing_sequences(rows: &mut [Value]) {
    for (i, row) in rows.iter_mut().enumerate() {
        if let Value::Object(fields) = row {
            let missing = match fields.get("Sequence") {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(_) => false,
            };
            if missing {
                fields.insert("Sequence".to_string(), Value::String((i + 1).to_string()));
            }
        }
    }
}
