//! Ember core types
//!
//! Shared vocabulary for the ember workspace:
//! - The org document tree ([`OrgNode`] and its variant structs)
//! - The extracted per-document metadata record ([`Note`])
//! - The keyword and property names the collector recognizes
//!
//! This crate deliberately contains no I/O and no parsing logic; the
//! parser and pipeline crates depend on it, never the other way around.

pub mod note;
pub mod tree;

pub use note::{
    parse_filetags, Note, DESCRIPTION_KEY, FILETAGS_KEY, ID_PROPERTY, PREVIEW_IMAGE_KEY,
    TITLE_KEY,
};
pub use tree::{
    Blank, Document, Headline, Keyword, Link, LinkType, ListItem, NodeProperty, OrgNode,
    Paragraph, PlainList, PropertyDrawer, Text,
};
