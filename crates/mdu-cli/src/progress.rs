//! Progress bar utilities for upload sessions
//!
//! Renders the tracker's snapshots as a terminal progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use mdu_upload::tracker::ProgressSnapshot;

/// Create a progress bar sized to an upload session
pub fn create_upload_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} rows")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    pb.set_message("Uploading rows".to_string());
    pb
}

/// Apply a tracker snapshot to the bar
pub fn apply_snapshot(pb: &ProgressBar, snapshot: &ProgressSnapshot) {
    pb.set_position(snapshot.processed);
    pb.set_message(format!(
        "Uploading rows - {}% done, {} remaining",
        snapshot.percentage, snapshot.time_remaining
    ));
}
