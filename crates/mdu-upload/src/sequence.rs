//! Sequence resolution for upload records
//!
//! Upstream producers (the spreadsheet parser, the validation layer, the
//! submission retry path) disagree on where a row's sequence identifier
//! lives and how the field is cased. This module centralizes the
//! disambiguation policy so the rest of the pipeline can treat "sequence"
//! as a single well-defined concept.

use serde_json::Value;

/// Sentinel returned when no sequence field can be found on a record.
pub const UNKNOWN_SEQUENCE: &str = "Unknown";

/// Probe locations for the sequence identifier, highest priority first.
///
/// JSON pointer paths, tried in order; the first non-empty hit wins.
const SEQUENCE_PROBES: &[&str] = &[
    "/OriginalSequence",
    "/originalSequence",
    "/Sequence",
    "/entry/Sequence",
    "/entry/OriginalSequence",
    "/OriginalRequest/Sequence",
];

/// Resolve the sequence identifier of a record.
///
/// Always returns a string; records with no usable sequence field resolve to
/// [`UNKNOWN_SEQUENCE`]. Numeric values are accepted because some parsers
/// deliver the template's "Seq. ID" column as a JSON number.
pub fn resolve(record: &Value) -> String {
    for probe in SEQUENCE_PROBES {
        if let Some(found) = record.pointer(probe).and_then(as_sequence) {
            return found;
        }
    }
    UNKNOWN_SEQUENCE.to_string()
}

fn as_sequence(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Produce an enhanced copy of a record with normalized sequence fields.
///
/// The copy carries `OriginalSequence` and `originalSequence` (dual naming
/// for case-sensitive and case-insensitive consumers), both set to the
/// resolved sequence. If the record has a nested `entry` object, that object
/// receives `OriginalSequence` as well, plus `Sequence` if absent. The input
/// is never mutated, and enhancement is idempotent: enhancing an already
/// enhanced record changes nothing.
///
/// Non-object records are returned as unchanged copies.
pub fn enhance(record: &Value) -> Value {
    let mut enhanced = record.clone();

    let resolved = resolve(record);
    if let Value::Object(fields) = &mut enhanced {
        fields.insert(
            "OriginalSequence".to_string(),
            Value::String(resolved.clone()),
        );
        fields.insert(
            "originalSequence".to_string(),
            Value::String(resolved.clone()),
        );

        if let Some(Value::Object(entry)) = fields.get_mut("entry") {
            entry.insert(
                "OriginalSequence".to_string(),
                Value::String(resolved.clone()),
            );
            entry
                .entry("Sequence".to_string())
                .or_insert_with(|| Value::String(resolved.clone()));
        }
    }

    enhanced
}
