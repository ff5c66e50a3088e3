//! Ember note collection pipeline
//!
//! Walks a parsed org document tree, applies a chain of node-rewriting
//! middlewares to every node, and extracts per-document metadata into a
//! [`Note`](ember_core::Note). The two shipped middlewares give image
//! attachments collision-resistant unique names: one rewrites file
//! links, one rewrites the `#+PREVIEW_IMG:` keyword.
//!
//! ## Pipeline shape
//!
//! ```text
//! NoteProcessor (per file / per hearth)
//!   ├─> ember-parser       parse raw text to a tree
//!   ├─> MiddlewareChain    rewrite eligible nodes during the walk
//!   ├─> collect_note       extract Note from the post-rewrite tree
//!   └─> ember-parser       serialize and write back when changed
//! ```
//!
//! Everything here is synchronous and single-threaded: the walk is a
//! plain depth-first recursion and renames are blocking `std::fs`
//! calls, so two runs over an unchanged hearth are byte-for-byte
//! no-ops.

pub mod collector;
pub mod error;
pub mod middleware;
pub mod naming;
pub mod processor;
pub mod relocate;

pub use collector::collect_note;
pub use error::{PipelineError, PipelineResult};
pub use middleware::{
    AttachmentRenamer, LinkMiddleware, MiddlewareChain, NodeMiddleware, PreviewImageMiddleware,
};
pub use naming::{contains_identifier, is_image, uniquify, IMAGE_EXTENSIONS};
pub use processor::{
    is_org_file, CollectedNote, NoteProcessor, NoteProcessorConfig, ScanFailure, ScanOutcome,
};
pub use relocate::{relocate, Relocation};
