//! `emb note`: process a single document

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use ember_core::Note;
use ember_pipeline::{NoteProcessor, NoteProcessorConfig};
use std::path::PathBuf;

#[derive(Args)]
pub struct NoteArgs {
    /// Document to process
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Collect without renaming attachments or writing the document back
    #[arg(long)]
    dry_run: bool,
}

pub fn run(args: NoteArgs, config: &CliConfig) -> Result<()> {
    let processor = NoteProcessor::with_config(NoteProcessorConfig {
        dry_run: args.dry_run || config.scan.dry_run,
    });

    let note: Note = processor
        .process_file(&args.file)
        .with_context(|| format!("failed to process '{}'", args.file.display()))?;

    println!("{}", serde_json::to_string_pretty(&note)?);
    Ok(())
}
