//! Progress tracking for one upload session
//!
//! [`ProgressTracker`] is the single source of truth for a session's
//! counters, percentage, ETA, and per-row outcome lookup. It owns exactly
//! one session at a time: [`ProgressTracker::start`] discards all prior
//! state. The tracker performs no I/O, never suspends, and never fails;
//! malformed input degrades to safe defaults because this state sits on the
//! critical path of a live progress display.
//!
//! Completions may be reported in any order (batches finish out of order);
//! every [`ProgressTracker::update`] only adds to counters and performs
//! key-based upserts, so no interleaving of calls can corrupt the session.
//! On a multi-threaded runtime the tracker must be behind a lock (see
//! [`crate::batch`]) so counters are never observed out of sync with the
//! record lists they derive from.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::sequence;

/// Classification of a tracked row outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// The stored outcome for one sequence: its status and the enhanced record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub status: OutcomeStatus,
    pub record: Value,
}

/// Point-in-time view of a tracking session.
///
/// All contained records and the sequence map are defensive copies; mutating
/// a snapshot never affects the tracker.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    pub session_id: Uuid,
    pub processed: u64,
    pub total: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub success_records: Vec<Value>,
    pub error_records: Vec<Value>,
    /// Whole percent complete, 0-100
    pub percentage: u8,
    /// Human-readable remaining time, or `"Calculating..."` when no rate is
    /// available yet
    pub time_remaining: String,
    pub elapsed_secs: f64,
    pub sequence_map: HashMap<String, Outcome>,
}

/// Stateful accumulator for one upload session.
#[derive(Debug)]
pub struct ProgressTracker {
    session_id: Uuid,
    total: u64,
    processed: u64,
    success_count: u64,
    failure_count: u64,
    success_records: Vec<Value>,
    error_records: Vec<Value>,
    index: HashMap<String, Outcome>,
    // First-write key order; later upserts replace the value only.
    key_order: Vec<String>,
    started_at: Instant,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    /// Create an idle tracker. Call [`ProgressTracker::start`] to begin a
    /// session.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            total: 0,
            processed: 0,
            success_count: 0,
            failure_count: 0,
            success_records: Vec::new(),
            error_records: Vec::new(),
            index: HashMap::new(),
            key_order: Vec::new(),
            started_at: Instant::now(),
        }
    }

    /// Begin a new session expecting `total` rows.
    ///
    /// Resets every counter, list, and the sequence index; prior session
    /// state is discarded irrecoverably.
    pub fn start(&mut self, total: u64) {
        self.session_id = Uuid::new_v4();
        self.total = total;
        self.processed = 0;
        self.success_count = 0;
        self.failure_count = 0;
        self.success_records.clear();
        self.error_records.clear();
        self.index.clear();
        self.key_order.clear();
        self.started_at = Instant::now();

        info!(session_id = %self.session_id, total, "upload session started");
    }

    /// Record the outcome of `count` rows, optionally with record detail.
    ///
    /// `count` need not equal `records.len()`: callers may report aggregate
    /// counts without attaching full payloads, so counters and record lists
    /// are tracked independently. Each attached record is enhanced with
    /// normalized sequence fields, appended to the matching list, and
    /// upserted into the sequence index (last write wins per sequence).
    pub fn update(&mut self, count: u64, success: bool, records: &[Value]) {
        self.processed += count;
        let status = if success {
            self.success_count += count;
            OutcomeStatus::Success
        } else {
            self.failure_count += count;
            OutcomeStatus::Error
        };

        for record in records {
            // Null placeholders advance counters only.
            if record.is_null() {
                continue;
            }
            let enhanced = sequence::enhance(record);
            let seq = sequence::resolve(&enhanced);

            if success {
                self.success_records.push(enhanced.clone());
            } else {
                self.error_records.push(enhanced.clone());
            }

            if !self.index.contains_key(&seq) {
                self.key_order.push(seq.clone());
            }
            self.index.insert(
                seq,
                Outcome {
                    status,
                    record: enhanced,
                },
            );
        }

        debug!(
            session_id = %self.session_id,
            count,
            success,
            processed = self.processed,
            "session progress updated"
        );
    }

    /// Derive the current progress snapshot.
    ///
    /// Stored records are re-enhanced into fresh copies on the way out, so
    /// the dual-cased sequence fields are guaranteed even for records that
    /// entered through an older code path; enhancement is idempotent, so
    /// this never changes already-normalized records.
    pub fn get_progress(&self) -> ProgressSnapshot {
        let elapsed_secs = self.started_at.elapsed().as_secs_f64();
        let rate = if self.processed > 0 {
            self.processed as f64 / elapsed_secs
        } else {
            0.0
        };
        let remaining_secs = if rate > 0.0 {
            (self.total.saturating_sub(self.processed) as f64 / rate).ceil() as u64
        } else {
            0
        };

        let percentage = if self.total > 0 {
            let pct = (self.processed as f64 / self.total as f64 * 100.0).round() as u64;
            pct.min(100) as u8
        } else {
            0
        };

        ProgressSnapshot {
            session_id: self.session_id,
            processed: self.processed,
            total: self.total,
            success_count: self.success_count,
            failure_count: self.failure_count,
            success_records: self.success_records.iter().map(sequence::enhance).collect(),
            error_records: self.error_records.iter().map(sequence::enhance).collect(),
            percentage,
            time_remaining: format_remaining(remaining_secs),
            elapsed_secs,
            sequence_map: self.index.clone(),
        }
    }

    /// Exact-match outcome lookup by sequence.
    ///
    /// Returns `None` for an empty sequence or one that was never reported.
    /// The returned outcome is a copy.
    pub fn get_record_by_sequence(&self, seq: &str) -> Option<Outcome> {
        if seq.is_empty() {
            return None;
        }
        self.index.get(seq).cloned()
    }

    /// All sequences currently in the index, in first-write order.
    pub fn get_all_sequences(&self) -> Vec<String> {
        self.key_order.clone()
    }

    /// Identifier of the current session, rotated by [`ProgressTracker::start`].
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The expected row count of the current session.
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Render a remaining-seconds estimate as a short human string.
///
/// Zero means "no estimate available" and renders as `"Calculating..."`.
fn format_remaining(secs: u64) -> String {
    if secs == 0 {
        return "Calculating...".to_string();
    }

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
