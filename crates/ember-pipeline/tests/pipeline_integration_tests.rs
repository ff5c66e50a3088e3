//! Integration tests for the note pipeline
//!
//! These exercise the complete flow over real files: parse, middleware
//! rewriting, note collection, write-back, and the corpus scan with
//! per-file failure attribution.

use ember_pipeline::{contains_identifier, NoteProcessor, NoteProcessorConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use uuid::Uuid;

const DOCUMENT: &str = "\
:PROPERTIES:
:ID: 20f1b3aa-demo
:END:
#+TITLE: Trip notes
#+FILETAGS: :travel:photos:
#+PREVIEW_IMG: photo.jpg

* Day one
Morning view: [[photo.jpg]]
";

fn write_hearth_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn dir_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_process_file_renames_and_rewrites_consistently() {
    let hearth = TempDir::new().unwrap();
    write_hearth_file(hearth.path(), "note.org", DOCUMENT);
    write_hearth_file(hearth.path(), "photo.jpg", "pixels");

    let note = NoteProcessor::new()
        .process_file(&hearth.path().join("note.org"))
        .unwrap();

    assert_eq!(note.id.as_deref(), Some("20f1b3aa-demo"));
    assert_eq!(note.title.as_deref(), Some("Trip notes"));
    assert_eq!(note.tags, vec!["travel", "photos"]);

    // The original image is gone; one renamed image remains.
    assert!(!hearth.path().join("photo.jpg").exists());
    let preview = note.preview_image.expect("preview collected");
    assert!(contains_identifier(&preview));
    assert!(hearth.path().join(&preview).exists());

    // The keyword and the link both reference the same renamed file.
    assert_eq!(note.links, vec![preview.clone()]);

    // And the document on disk was rewritten to match.
    let rewritten = fs::read_to_string(hearth.path().join("note.org")).unwrap();
    assert!(!rewritten.contains("photo.jpg"));
    assert!(rewritten.contains(&format!("#+PREVIEW_IMG: {preview}")));
    assert!(rewritten.contains(&format!("[[{preview}]]")));
}

#[test]
fn test_second_run_is_a_complete_no_op() {
    let hearth = TempDir::new().unwrap();
    write_hearth_file(hearth.path(), "note.org", DOCUMENT);
    write_hearth_file(hearth.path(), "photo.jpg", "pixels");

    let processor = NoteProcessor::new();
    let first = processor
        .process_file(&hearth.path().join("note.org"))
        .unwrap();

    let bytes_after_first = fs::read(hearth.path().join("note.org")).unwrap();
    let names_after_first = dir_file_names(hearth.path());

    let second = processor
        .process_file(&hearth.path().join("note.org"))
        .unwrap();

    assert_eq!(first, second, "collected note is stable across runs");
    assert_eq!(
        fs::read(hearth.path().join("note.org")).unwrap(),
        bytes_after_first,
        "second run rewrites no bytes"
    );
    assert_eq!(
        dir_file_names(hearth.path()),
        names_after_first,
        "second run renames no files"
    );
}

#[test]
fn test_already_unique_names_are_never_touched() {
    let hearth = TempDir::new().unwrap();
    let unique = format!("photo-{}.jpg", Uuid::new_v4());
    write_hearth_file(hearth.path(), &unique, "pixels");
    write_hearth_file(
        hearth.path(),
        "note.org",
        &format!("#+PREVIEW_IMG: {unique}\n\n[[{unique}]]\n"),
    );
    let before = fs::read_to_string(hearth.path().join("note.org")).unwrap();

    let note = NoteProcessor::new()
        .process_file(&hearth.path().join("note.org"))
        .unwrap();

    assert_eq!(note.preview_image.as_deref(), Some(unique.as_str()));
    assert!(hearth.path().join(&unique).exists());
    assert_eq!(
        fs::read_to_string(hearth.path().join("note.org")).unwrap(),
        before
    );
}

#[test]
fn test_missing_attachment_leaves_document_unchanged() {
    let hearth = TempDir::new().unwrap();
    write_hearth_file(hearth.path(), "note.org", DOCUMENT);
    // photo.jpg deliberately absent

    let note = NoteProcessor::new()
        .process_file(&hearth.path().join("note.org"))
        .unwrap();

    assert_eq!(note.preview_image.as_deref(), Some("photo.jpg"));
    assert_eq!(note.links, vec!["photo.jpg"]);
    assert_eq!(
        fs::read_to_string(hearth.path().join("note.org")).unwrap(),
        DOCUMENT
    );
}

#[test]
fn test_dry_run_mutates_nothing() {
    let hearth = TempDir::new().unwrap();
    write_hearth_file(hearth.path(), "note.org", DOCUMENT);
    write_hearth_file(hearth.path(), "photo.jpg", "pixels");

    let processor = NoteProcessor::with_config(NoteProcessorConfig { dry_run: true });
    let note = processor
        .process_file(&hearth.path().join("note.org"))
        .unwrap();

    assert_eq!(note.id.as_deref(), Some("20f1b3aa-demo"));
    assert_eq!(note.preview_image.as_deref(), Some("photo.jpg"));
    assert!(hearth.path().join("photo.jpg").exists());
    assert_eq!(
        fs::read_to_string(hearth.path().join("note.org")).unwrap(),
        DOCUMENT
    );
}

#[test]
fn test_scan_filters_identity_and_attributes_failures() {
    let hearth = TempDir::new().unwrap();
    fs::create_dir(hearth.path().join("a")).unwrap();
    fs::create_dir(hearth.path().join("b")).unwrap();

    write_hearth_file(
        &hearth.path().join("a"),
        "one.org",
        ":PROPERTIES:\n:ID: note-one\n:END:\n#+TITLE: One\n",
    );
    write_hearth_file(&hearth.path().join("b"), "two.org", "#+TITLE: No identity\n");
    // Unterminated drawer: parse failure, attributed, batch continues.
    write_hearth_file(hearth.path(), "broken.org", ":PROPERTIES:\n:ID: x\n");
    // Non-org files are never candidates.
    write_hearth_file(hearth.path(), "readme.md", "# not org\n");

    let outcome = NoteProcessor::new().scan(hearth.path()).unwrap();

    assert_eq!(outcome.files_seen, 3);
    assert_eq!(outcome.notes.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].path.ends_with("broken.org"));
    assert!(outcome.failures[0].error.contains("unterminated"));

    let identified: Vec<_> = outcome.identified_notes().collect();
    assert_eq!(identified.len(), 1);
    assert_eq!(identified[0].note.id.as_deref(), Some("note-one"));
    assert!(identified[0].path.ends_with("a/one.org"));
}

#[test]
fn test_scan_discovery_order_is_stable() {
    let hearth = TempDir::new().unwrap();
    for name in ["zeta.org", "alpha.org", "mid.org"] {
        write_hearth_file(
            hearth.path(),
            name,
            &format!(":PROPERTIES:\n:ID: id-{name}\n:END:\n"),
        );
    }

    let processor = NoteProcessor::new();
    let first: Vec<String> = processor
        .scan(hearth.path())
        .unwrap()
        .notes
        .iter()
        .map(|c| c.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    let second: Vec<String> = processor
        .scan(hearth.path())
        .unwrap()
        .notes
        .iter()
        .map(|c| c.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(first, vec!["alpha.org", "mid.org", "zeta.org"]);
    assert_eq!(first, second);
}
