//! `mdu upload` command implementation
//!
//! Loads a parsed row file, submits it in batches, and reports per-sequence
//! outcomes.

use crate::api::HttpSubmitter;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::{progress, rows};
use async_trait::async_trait;
use colored::Colorize;
use comfy_table::Table;
use mdu_common::checksum;
use mdu_upload::batch::{BatchConfig, BatchCoordinator, BatchRunSummary, BatchSubmitter};
use mdu_upload::normalize::SubmissionFailure;
use mdu_upload::tracker::{ProgressSnapshot, ProgressTracker};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Accepts every batch locally without touching the network
struct DryRunSubmitter;

#[async_trait]
impl BatchSubmitter for DryRunSubmitter {
    async fn submit(&self, _batch: &[Value]) -> std::result::Result<(), SubmissionFailure> {
        Ok(())
    }
}

/// Upload a row file in batches
pub async fn run(
    file: PathBuf,
    config: Config,
    report: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let mut records = rows::load_rows(&file)?;
    rows::assign_missing_sequences(&mut records);

    let digest = checksum::file_sha256(&file)?;
    info!(file = %file.display(), %digest, rows = records.len(), "upload source loaded");

    println!(
        "{} Loaded {} row(s) from {}",
        "→".cyan(),
        records.len(),
        file.display()
    );

    let batch_config = BatchConfig {
        batch_size: config.batch_size,
        concurrency: config.concurrency,
        ..BatchConfig::default()
    };
    let tracker = Arc::new(Mutex::new(ProgressTracker::new()));

    let summary = if dry_run {
        println!("{} Dry run: batches are accepted locally", "→".cyan());
        let coordinator = BatchCoordinator::with_config(DryRunSubmitter, batch_config);
        run_with_progress(coordinator, records, Arc::clone(&tracker)).await?
    } else {
        let submitter = HttpSubmitter::new(config.server_url.clone())?;
        let coordinator = BatchCoordinator::with_config(submitter, batch_config);
        run_with_progress(coordinator, records, Arc::clone(&tracker)).await?
    };

    let snapshot = tracker.lock().await.get_progress();
    print_summary(&snapshot, &summary);

    if let Some(report_path) = report {
        write_report(&report_path, &snapshot)?;
        println!("Report saved: {}", report_path.display());
    }

    if summary.failed > 0 {
        return Err(CliError::upload(format!(
            "{} of {} row(s) failed",
            summary.failed, summary.total
        )));
    }

    Ok(())
}

/// Drive the coordinator while feeding tracker snapshots to a progress bar
async fn run_with_progress<S>(
    coordinator: BatchCoordinator<S>,
    records: Vec<Value>,
    tracker: Arc<Mutex<ProgressTracker>>,
) -> Result<BatchRunSummary>
where
    S: BatchSubmitter + 'static,
{
    let pb = progress::create_upload_progress(records.len() as u64);

    let task_tracker = Arc::clone(&tracker);
    let task = tokio::spawn(async move { coordinator.run(records, task_tracker).await });

    let mut poll = tokio::time::interval(Duration::from_millis(200));
    while !task.is_finished() {
        poll.tick().await;
        let snapshot = tracker.lock().await.get_progress();
        progress::apply_snapshot(&pb, &snapshot);
    }

    let summary = task
        .await
        .map_err(|e| CliError::upload(format!("upload task failed: {}", e)))?;
    pb.finish_with_message("Upload finished");

    Ok(summary)
}

fn print_summary(snapshot: &ProgressSnapshot, summary: &BatchRunSummary) {
    println!();
    if summary.failed == 0 {
        println!(
            "{} All {} row(s) uploaded in {:.1}s",
            "✓".green().bold(),
            summary.total,
            summary.elapsed_secs
        );
        return;
    }

    println!(
        "{} {} succeeded, {} {} failed ({:.1}s)",
        "✓".green(),
        summary.succeeded,
        "✗".red(),
        summary.failed,
        summary.elapsed_secs
    );

    let mut table = Table::new();
    table.set_header(vec!["Seq. ID", "Message"]);
    for record in &snapshot.error_records {
        let seq = record
            .get("OriginalSequence")
            .and_then(Value::as_str)
            .unwrap_or("Unknown");
        let message = record
            .get("Message")
            .and_then(Value::as_str)
            .or_else(|| record.get("error").and_then(Value::as_str))
            .unwrap_or("Unknown error occurred");
        table.add_row(vec![seq, message]);
    }
    println!("{}", table);
}

fn write_report(path: &Path, snapshot: &ProgressSnapshot) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, snapshot)?;
    Ok(())
}
