//! Batch coordination for upload sessions
//!
//! The coordinator partitions a validated row set into batches, drives the
//! transport seam concurrently, and reports each batch's final outcome to
//! the shared [`ProgressTracker`]. Batches complete in arbitrary order; the
//! tracker is explicitly safe under any completion interleaving, and the
//! shared lock keeps its counters and record lists mutating together.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::normalize::{self, SubmissionFailure};
use crate::tracker::ProgressTracker;

/// Transport seam: submits one batch of records to the backend.
///
/// Implementations own all transport mechanics (HTTP, test doubles); they
/// must convert every failure into a [`SubmissionFailure`] rather than
/// letting raw errors escape toward the tracker.
#[async_trait]
pub trait BatchSubmitter: Send + Sync {
    async fn submit(&self, batch: &[Value]) -> Result<(), SubmissionFailure>;
}

/// Tuning knobs for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Rows per submitted batch
    pub batch_size: usize,
    /// Batches in flight at once
    pub concurrency: usize,
    /// Extra submission attempts per batch before its failure is recorded
    pub max_retries: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 25,
            concurrency: 4,
            max_retries: 1,
        }
    }
}

/// Final tallies of one coordinated run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRunSummary {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub elapsed_secs: f64,
}

/// Drives batched submission of a row set against one submitter.
pub struct BatchCoordinator<S> {
    submitter: S,
    config: BatchConfig,
}

impl<S: BatchSubmitter> BatchCoordinator<S> {
    pub fn new(submitter: S) -> Self {
        Self::with_config(submitter, BatchConfig::default())
    }

    pub fn with_config(submitter: S, config: BatchConfig) -> Self {
        Self { submitter, config }
    }

    /// Run one upload session over `rows`, reporting into `tracker`.
    ///
    /// Starts a fresh tracking session sized to the row count, then submits
    /// every batch. A batch that still fails after `max_retries` extra
    /// attempts is reported exactly once, with each of its rows normalized
    /// into the uniform error record shape; counters therefore never exceed
    /// the session total.
    pub async fn run(
        &self,
        rows: Vec<Value>,
        tracker: Arc<Mutex<ProgressTracker>>,
    ) -> BatchRunSummary {
        tracker.lock().await.start(rows.len() as u64);

        let batch_size = self.config.batch_size.max(1);
        let mut batches = Vec::new();
        let mut offset = 0usize;
        for chunk in rows.chunks(batch_size) {
            batches.push((offset, chunk.to_vec()));
            offset += chunk.len();
        }

        stream::iter(batches)
            .for_each_concurrent(Some(self.config.concurrency.max(1)), |(offset, batch)| {
                let tracker = Arc::clone(&tracker);
                async move {
                    match self.submit_with_retry(&batch).await {
                        Ok(()) => {
                            debug!(offset, rows = batch.len(), "batch accepted");
                            tracker.lock().await.update(batch.len() as u64, true, &batch);
                        }
                        Err(failure) => {
                            warn!(offset, rows = batch.len(), error = %failure, "batch rejected");
                            let normalized: Vec<Value> = batch
                                .iter()
                                .enumerate()
                                .map(|(i, record)| {
                                    normalize::to_error_record(record, &failure, offset + i)
                                        .into_value()
                                })
                                .collect();
                            tracker
                                .lock()
                                .await
                                .update(batch.len() as u64, false, &normalized);
                        }
                    }
                }
            })
            .await;

        let snapshot = tracker.lock().await.get_progress();
        BatchRunSummary {
            total: snapshot.total,
            succeeded: snapshot.success_count,
            failed: snapshot.failure_count,
            elapsed_secs: snapshot.elapsed_secs,
        }
    }

    async fn submit_with_retry(&self, batch: &[Value]) -> Result<(), SubmissionFailure> {
        let mut attempt = 0u32;
        loop {
            match self.submitter.submit(batch).await {
                Ok(()) => return Ok(()),
                Err(_) if attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(attempt, rows = batch.len(), "batch submission failed, retrying");
                }
                Err(failure) => return Err(failure),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::tracker::OutcomeStatus;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct AcceptAll;

    #[async_trait]
    impl BatchSubmitter for AcceptAll {
        async fn submit(&self, _batch: &[Value]) -> Result<(), SubmissionFailure> {
            Ok(())
        }
    }

    /// Rejects any batch containing a row marked `"fail": true`.
    struct RejectMarked;

    #[async_trait]
    impl BatchSubmitter for RejectMarked {
        async fn submit(&self, batch: &[Value]) -> Result<(), SubmissionFailure> {
            if batch
                .iter()
                .any(|row| row.get("fail").and_then(Value::as_bool) == Some(true))
            {
                Err(SubmissionFailure::from("backend rejected batch"))
            } else {
                Ok(())
            }
        }
    }

    /// Fails the first `failures` calls, then accepts everything.
    struct FlakySubmitter {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BatchSubmitter for FlakySubmitter {
        async fn submit(&self, _batch: &[Value]) -> Result<(), SubmissionFailure> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(SubmissionFailure::from("transient failure"))
            } else {
                Ok(())
            }
        }
    }

    fn rows(n: usize) -> Vec<Value> {
        (1..=n)
            .map(|i| json!({"Sequence": i.to_string(), "Material": format!("M-{}", i)}))
            .collect()
    }

    fn shared_tracker() -> Arc<Mutex<ProgressTracker>> {
        Arc::new(Mutex::new(ProgressTracker::new()))
    }

    #[tokio::test]
    async fn test_all_batches_succeed() {
        let coordinator = BatchCoordinator::with_config(
            AcceptAll,
            BatchConfig {
                batch_size: 2,
                concurrency: 3,
                max_retries: 0,
            },
        );
        let tracker = shared_tracker();
        let summary = coordinator.run(rows(5), Arc::clone(&tracker)).await;

        assert_eq!(summary.total, 5);
        assert_eq!(summary.succeeded, 5);
        assert_eq!(summary.failed, 0);

        let guard = tracker.lock().await;
        let mut sequences = guard.get_all_sequences();
        sequences.sort();
        assert_eq!(sequences, vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_failed_batch_rows_are_normalized() {
        let coordinator = BatchCoordinator::with_config(
            RejectMarked,
            BatchConfig {
                batch_size: 2,
                concurrency: 1,
                max_retries: 0,
            },
        );
        let tracker = shared_tracker();

        // Second batch (rows 3-4) carries the failure marker.
        let mut input = rows(4);
        input[2]["fail"] = json!(true);

        let summary = coordinator.run(input, Arc::clone(&tracker)).await;
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 2);

        let guard = tracker.lock().await;
        let outcome = guard.get_record_by_sequence("3").unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert_eq!(outcome.record["Message"], "backend rejected batch");
        assert_eq!(outcome.record["Status"], "Error");
    }

    #[tokio::test]
    async fn test_retry_recovers_transient_failure() {
        let submitter = FlakySubmitter {
            failures: 1,
            calls: AtomicUsize::new(0),
        };
        let coordinator = BatchCoordinator::with_config(
            submitter,
            BatchConfig {
                batch_size: 10,
                concurrency: 1,
                max_retries: 1,
            },
        );
        let tracker = shared_tracker();
        let summary = coordinator.run(rows(3), Arc::clone(&tracker)).await;

        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(coordinator.submitter.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retries_exhausted_reports_failure_once() {
        let submitter = FlakySubmitter {
            failures: usize::MAX,
            calls: AtomicUsize::new(0),
        };
        let coordinator = BatchCoordinator::with_config(
            submitter,
            BatchConfig {
                batch_size: 10,
                concurrency: 1,
                max_retries: 2,
            },
        );
        let tracker = shared_tracker();
        let summary = coordinator.run(rows(4), Arc::clone(&tracker)).await;

        // 1 initial + 2 retries, one final report; counters stay at total.
        assert_eq!(coordinator.submitter.calls.load(Ordering::SeqCst), 3);
        assert_eq!(summary.failed, 4);
        assert_eq!(summary.total, 4);

        let guard = tracker.lock().await;
        assert_eq!(guard.get_progress().processed, 4);
    }

    #[tokio::test]
    async fn test_rows_without_sequences_get_indexed_fallbacks() {
        let coordinator = BatchCoordinator::with_config(
            RejectMarked,
            BatchConfig {
                batch_size: 2,
                concurrency: 2,
                max_retries: 0,
            },
        );
        let tracker = shared_tracker();
        let input = vec![
            json!({"fail": true}),
            json!({"fail": true}),
            json!({"fail": true}),
        ];

        let summary = coordinator.run(input, Arc::clone(&tracker)).await;
        assert_eq!(summary.failed, 3);

        let guard = tracker.lock().await;
        let mut sequences = guard.get_all_sequences();
        sequences.sort();
        assert_eq!(sequences, vec!["Error-0", "Error-1", "Error-2"]);
    }

    #[tokio::test]
    async fn test_empty_row_set() {
        let coordinator = BatchCoordinator::new(AcceptAll);
        let tracker = shared_tracker();
        let summary = coordinator.run(Vec::new(), Arc::clone(&tracker)).await;

        assert_eq!(summary.total, 0);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 0);
    }
}
