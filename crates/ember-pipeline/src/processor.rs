//! Per-file orchestration and corpus scan
//!
//! `NoteProcessor` is the single entry point frontends use: it reads a
//! document, runs the middleware chain during collection, and persists
//! the transformed tree back to the same path. The corpus scan walks a
//! hearth directory, processes every org file, and reports per-file
//! failures instead of aborting the batch, so a run over many documents
//! can say exactly which ones failed.

use crate::collector::collect_note;
use crate::error::{PipelineError, PipelineResult};
use crate::middleware::MiddlewareChain;
use ember_core::Note;
use ember_parser::{parse, serialize};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Extension identifying candidate documents.
pub const ORG_EXTENSION: &str = "org";

/// Whether a path names an org document, by extension.
pub fn is_org_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ORG_EXTENSION))
}

/// Configuration for processing behavior
#[derive(Debug, Clone, Default)]
pub struct NoteProcessorConfig {
    /// Report-only mode: collect notes without renaming attachments and
    /// without writing documents back. Renames and write-back are only
    /// ever disabled together; a rename without the matching document
    /// rewrite would strand references.
    pub dry_run: bool,
}

/// One successfully collected document.
#[derive(Debug, Clone, Serialize)]
pub struct CollectedNote {
    pub path: PathBuf,
    pub note: Note,
}

/// One document that failed, with the error it failed with.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Result of scanning a hearth directory.
#[derive(Debug, Default, Serialize)]
pub struct ScanOutcome {
    /// Org files found and attempted.
    pub files_seen: usize,
    /// Every collected note, identified or not, in discovery order.
    pub notes: Vec<CollectedNote>,
    pub failures: Vec<ScanFailure>,
}

impl ScanOutcome {
    /// Corpus-level filter: only notes carrying an identity, in
    /// discovery order.
    pub fn identified_notes(&self) -> impl Iterator<Item = &CollectedNote> {
        self.notes.iter().filter(|c| c.note.has_identity())
    }
}

/// The pipeline orchestrator.
pub struct NoteProcessor {
    config: NoteProcessorConfig,
}

impl NoteProcessor {
    pub fn new() -> Self {
        Self::with_config(NoteProcessorConfig::default())
    }

    pub fn with_config(config: NoteProcessorConfig) -> Self {
        Self { config }
    }

    /// Process one document: parse, rewrite, collect, write back.
    ///
    /// The middleware chain is built from the document's containing
    /// directory, so relative attachment references resolve beside the
    /// document itself.
    pub fn process_file(&self, path: &Path) -> PipelineResult<Note> {
        let raw = fs::read_to_string(path)?;
        let mut tree = parse(&raw)?;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let chain = if self.config.dry_run {
            MiddlewareChain::new()
        } else {
            MiddlewareChain::standard(dir)
        };
        let note = collect_note(&mut tree, &chain)?;

        let rendered = serialize(&tree);
        if !self.config.dry_run && rendered != raw {
            fs::write(path, &rendered)?;
            debug!(path = %path.display(), "wrote transformed document");
        }

        info!(
            path = %path.display(),
            identified = note.has_identity(),
            links = note.links.len(),
            "collected note"
        );
        Ok(note)
    }

    /// Walk `dir` recursively and process every org document.
    ///
    /// A document that vanishes between discovery and read is logged
    /// and skipped; any other per-file error is recorded in the outcome
    /// with its path and does not stop the scan.
    pub fn scan(&self, dir: &Path) -> PipelineResult<ScanOutcome> {
        if !dir.is_dir() {
            return Err(PipelineError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("hearth directory '{}' does not exist", dir.display()),
            )));
        }

        let mut outcome = ScanOutcome::default();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !is_org_file(path) {
                continue;
            }

            outcome.files_seen += 1;
            match self.process_file(path) {
                Ok(note) => outcome.notes.push(CollectedNote {
                    path: path.to_path_buf(),
                    note,
                }),
                Err(PipelineError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                    warn!(path = %path.display(), "document does not exist, skipping");
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to process document");
                    outcome.failures.push(ScanFailure {
                        path: path.to_path_buf(),
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            dir = %dir.display(),
            files = outcome.files_seen,
            notes = outcome.notes.len(),
            failures = outcome.failures.len(),
            "hearth scan complete"
        );
        Ok(outcome)
    }
}

impl Default for NoteProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_file_detection() {
        assert!(is_org_file(Path::new("notes.org")));
        assert!(is_org_file(Path::new("a/b/NOTES.ORG")));
        assert!(!is_org_file(Path::new("notes.md")));
        assert!(!is_org_file(Path::new("org")));
    }

    #[test]
    fn test_scan_missing_directory_is_an_error() {
        let processor = NoteProcessor::new();
        let err = processor.scan(Path::new("/nonexistent/hearth")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
