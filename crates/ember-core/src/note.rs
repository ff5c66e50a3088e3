//! The extracted per-document metadata record
//!
//! A [`Note`] is produced once per document by the pipeline's collector
//! and never mutated afterwards. Identity is optional: a document with
//! no `:ID:` property still yields a note, and deciding whether such a
//! note counts is the corpus walker's call, not the collector's.

use serde::{Deserialize, Serialize};

/// Keyword declaring the document's preview image. Matched
/// case-insensitively and name-exactly: `PREVIEW_IMG` and `preview_img`
/// qualify, `preview_image` never does.
pub const PREVIEW_IMAGE_KEY: &str = "preview_img";

/// Keyword carrying the document title.
pub const TITLE_KEY: &str = "title";

/// Keyword carrying a one-line document description.
pub const DESCRIPTION_KEY: &str = "description";

/// Keyword carrying file-level tags.
pub const FILETAGS_KEY: &str = "filetags";

/// Property-drawer entry carrying the document identity.
pub const ID_PROPERTY: &str = "id";

/// Metadata collected from one document.
///
/// Field values describe the document *after* middleware processing:
/// a preview image or link target reflects the renamed file, not the
/// name the author originally wrote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Document identity from the first `:ID:` drawer entry in
    /// pre-order. Absent when the document declares none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// `#+TITLE:` keyword, falling back to the first top-level headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Tags from `#+FILETAGS:`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Value of the `#+PREVIEW_IMG:` keyword, post-rename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,

    /// Targets of every link in the document, in pre-order, post-rename.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

impl Note {
    /// Whether this note carries a document identity. The corpus-level
    /// filter keeps exactly the notes for which this returns true.
    pub fn has_identity(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

/// Split a `#+FILETAGS:` value into individual tags.
///
/// Accepts both the org form `:a:b:` and a plain whitespace-separated
/// list; empty segments are dropped.
pub fn parse_filetags(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.contains(':') {
        trimmed
            .split(':')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        trimmed.split_whitespace().map(str::to_string).collect()
    }
}
