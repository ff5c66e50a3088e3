//! `emb`: collect org notes and give their attachments unique names

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::CliConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "emb",
    version,
    about = "Collect org notes and give their attachments unique names"
)]
struct Cli {
    /// Path to an ember.toml configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a hearth directory and collect notes from every org file
    Scan(commands::scan::ScanArgs),
    /// Process a single document and print its note as JSON
    Note(commands::note::NoteArgs),
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    tracing::debug!(hearth = ?config.hearth_path(), "configuration loaded");

    match cli.command {
        Command::Scan(args) => commands::scan::run(args, &config),
        Command::Note(args) => commands::note::run(args, &config),
    }
}
