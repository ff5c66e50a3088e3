//! `emb scan`: corpus scan over a hearth directory

use crate::config::CliConfig;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use ember_pipeline::{CollectedNote, NoteProcessor, NoteProcessorConfig, ScanFailure};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ScanArgs {
    /// Hearth directory (defaults to the configured hearth)
    #[arg(env = "EMBER_HEARTH", value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Collect without renaming attachments or writing documents back
    #[arg(long)]
    dry_run: bool,

    /// Include notes without an identity
    #[arg(long)]
    all: bool,

    /// Emit a JSON report instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ScanReport<'a> {
    scanned_at: DateTime<Utc>,
    hearth: &'a Path,
    files_seen: usize,
    notes: Vec<&'a CollectedNote>,
    failures: &'a [ScanFailure],
}

pub fn run(args: ScanArgs, config: &CliConfig) -> Result<()> {
    let dir = args
        .dir
        .or_else(|| config.hearth_path())
        .context("no hearth directory: pass one as an argument or set [hearth] path in ember.toml")?;

    let processor = NoteProcessor::with_config(NoteProcessorConfig {
        dry_run: args.dry_run || config.scan.dry_run,
    });
    let outcome = processor
        .scan(&dir)
        .with_context(|| format!("failed to scan '{}'", dir.display()))?;

    let notes: Vec<&CollectedNote> = if args.all {
        outcome.notes.iter().collect()
    } else {
        outcome.identified_notes().collect()
    };

    if args.json {
        let report = ScanReport {
            scanned_at: Utc::now(),
            hearth: &dir,
            files_seen: outcome.files_seen,
            notes,
            failures: &outcome.failures,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&notes);
        println!(
            "{} file(s) scanned, {} note(s) collected, {} failure(s)",
            outcome.files_seen,
            notes.len(),
            outcome.failures.len()
        );
        for failure in &outcome.failures {
            eprintln!(
                "{} {}: {}",
                "failed".red().bold(),
                failure.path.display(),
                failure.error
            );
        }
    }

    if !outcome.failures.is_empty() {
        bail!(
            "{} of {} document(s) failed",
            outcome.failures.len(),
            outcome.files_seen
        );
    }
    Ok(())
}

fn print_table(notes: &[&CollectedNote]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["id", "title", "tags", "path"]);

    for collected in notes {
        table.add_row(vec![
            collected.note.id.clone().unwrap_or_default(),
            collected.note.title.clone().unwrap_or_default(),
            collected.note.tags.join(", "),
            collected.path.display().to_string(),
        ]);
    }

    println!("{table}");
}
