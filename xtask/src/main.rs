//! Build automation tasks for MDU
//!
//! This tool provides automation tasks for the MDU project, including:
//! - Generating CLI documentation from source code

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for MDU", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate CLI documentation in markdown format
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs/cli")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    // Generate markdown from clap definitions
    let markdown = clap_markdown::help_markdown::<mdu_cli::Cli>();

    let content = format!(
        r#"---
title: CLI Reference
description: Complete command reference for the MDU CLI
---

# MDU CLI Reference

This documentation is auto-generated from the CLI source code. Last updated: {}.

## Overview

MDU (Mass Data Upload) is a command-line tool for submitting bulk record
uploads in batches, with per-row outcome tracking keyed by the spreadsheet
sequence column.

## Installation

```bash
git clone https://github.com/mdu-tools/mdu.git
cd mdu
cargo install --path crates/mdu-cli
```

## Quick Start

```bash
# Check a row file before uploading
mdu validate --file rows.json

# Upload in batches against the backend
mdu upload --file rows.json

# Rehearse an upload without touching the network
mdu upload --file rows.json --dry-run

# Keep the final snapshot for later inspection
mdu upload --file rows.json --report outcome.json
```

## Commands

{}

## Environment Variables

- `MDU_SERVER_URL` - Backend server URL (default: `http://localhost:8000`)
- `MDU_BATCH_SIZE` - Rows per submitted batch (default: 25)
- `MDU_CONCURRENCY` - Batches in flight at once (default: 4)
- `MDU_API_TIMEOUT_SECS` - Batch submission timeout (default: 120)
- `MDU_LOG_LEVEL` / `MDU_LOG_OUTPUT` / `MDU_LOG_FORMAT` - Logging setup
- `RUST_LOG` - Fine-grained logging filter override

---

*This documentation is automatically generated from the CLI source code. To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    // Create output directory if it doesn't exist
    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
