//! `mdu validate` command implementation
//!
//! Offline pass over a row file: flattens validation markings into a
//! per-field report without submitting anything.

use crate::error::{CliError, Result};
use crate::rows;
use colored::Colorize;
use comfy_table::Table;
use mdu_upload::validation;
use std::path::PathBuf;
use tracing::info;

/// Report validation errors in a row file
pub async fn run(file: PathBuf) -> Result<()> {
    let records = rows::load_rows(&file)?;
    let issues = validation::format_validation_errors(&records);

    info!(file = %file.display(), rows = records.len(), issues = issues.len(), "validation pass finished");

    if issues.is_empty() {
        println!(
            "{} All {} row(s) passed validation",
            "✓".green().bold(),
            records.len()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Seq. ID", "Field", "Message"]);
    for issue in &issues {
        table.add_row(vec![
            issue.sequence.as_str(),
            issue.field.as_str(),
            issue.message.as_str(),
        ]);
    }
    println!("{}", table);
    println!(
        "{} {} validation issue(s) in {} row(s)",
        "✗".red().bold(),
        issues.len(),
        records.len()
    );

    Err(CliError::Validation(format!("{} issue(s)", issues.len())))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn write_rows_file(rows: &serde_json::Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(rows.to_string().as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_clean_file_passes() {
        let file = write_rows_file(&json!([{"Sequence": "1", "Valid": true}]));
        assert!(run(file.path().to_path_buf()).await.is_ok());
    }

    #[tokio::test]
    async fn test_flagged_rows_fail() {
        let file = write_rows_file(&json!([
            {"Sequence": "1", "ValidationErrors": [{"field": "Amount", "message": "required"}]}
        ]));
        let result = run(file.path().to_path_buf()).await;
        assert!(matches!(result, Err(CliError::Validation(_))));
    }
}
