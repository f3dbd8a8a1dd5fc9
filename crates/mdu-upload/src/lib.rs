//! MDU Upload Pipeline
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Core batch upload and progress-tracking pipeline for MDU.
//!
//! # Overview
//!
//! A bulk upload session takes a list of parsed row records, submits them to
//! a backend in batches, and tracks per-row outcomes keyed by a user-visible
//! sequence identifier (the "Seq. ID" column of the source spreadsheet):
//!
//! - **Sequence resolution** ([`sequence`]): extracts the stable row
//!   identifier from records of varying shapes
//! - **Progress tracking** ([`tracker`]): counters, per-sequence outcome
//!   index, and live percentage/ETA snapshots for one session
//! - **Error normalization** ([`normalize`]): converts heterogeneous
//!   submission failures into one uniform error record shape
//! - **Validation reporting** ([`validation`]): flattens pre-submission
//!   validation errors into per-field records
//! - **Batch coordination** ([`batch`]): partitions rows, drives a pluggable
//!   transport concurrently, and reports outcomes to the tracker
//!
//! Transport mechanics, spreadsheet parsing, and report rendering live
//! outside this crate behind narrow seams ([`batch::BatchSubmitter`] for
//! transport; records come in as already-parsed [`serde_json::Value`]s).

pub mod batch;
pub mod normalize;
pub mod sequence;
pub mod tracker;
pub mod validation;

// Re-export commonly used types
pub use batch::{BatchConfig, BatchCoordinator, BatchRunSummary, BatchSubmitter};
pub use normalize::{to_error_record, ErrorRecord, SubmissionFailure};
pub use tracker::{Outcome, OutcomeStatus, ProgressSnapshot, ProgressTracker};
