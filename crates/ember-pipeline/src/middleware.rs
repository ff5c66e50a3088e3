//! Node-rewriting middleware
//!
//! A middleware is the identity function outside its matching case: it
//! inspects one node, decides eligibility with its own guards, and
//! either rewrites the node in place or leaves it untouched. Chains run
//! every node through every middleware in construction order, so the
//! tree walker needs no per-variant dispatch of its own.
//!
//! Rename side effects happen before node mutation: a node's fields are
//! only updated after the file actually moved, so a source that
//! vanished between the existence check and the rename leaves the
//! document unchanged.
//!
//! Both shipped middlewares share one [`AttachmentRenamer`] per chain.
//! The renamer remembers the renames of the current document run, so
//! when a link and a preview keyword reference the same file, the file
//! moves once and every later reference is rewritten to the same new
//! name without another filesystem call.

use crate::error::{PipelineError, PipelineResult};
use crate::naming::{contains_identifier, is_image, uniquify};
use crate::relocate::{relocate, Relocation};
use ember_core::{LinkType, OrgNode, PREVIEW_IMAGE_KEY};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// A node-rewriting transformation applied uniformly during traversal.
pub trait NodeMiddleware {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Apply to one node. Must be the identity for non-matching nodes
    /// and may perform at most one rename per call.
    fn apply(&self, node: &mut OrgNode) -> PipelineResult<()>;
}

/// Renames eligible image attachments under one base directory and
/// remembers what it renamed during the current run.
///
/// Eligibility: the target classifies as an image, does not already
/// carry a generated identifier, and exists under the base directory.
/// The memory only spans one chain's lifetime; idempotency across
/// runs comes from the identifier check, not from this map.
pub struct AttachmentRenamer {
    dir: PathBuf,
    renamed: RefCell<HashMap<String, String>>,
}

impl AttachmentRenamer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            renamed: RefCell::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Rename `target` if eligible. Returns the name the referencing
    /// node should carry afterwards: `Some` when the target was renamed
    /// during this run (by this call or an earlier one), `None` when
    /// the node must stay untouched.
    pub fn rename(&self, target: &str) -> PipelineResult<Option<String>> {
        if let Some(new_name) = self.renamed.borrow().get(target) {
            return Ok(Some(new_name.clone()));
        }
        if !is_image(target) || contains_identifier(target) || !self.dir.join(target).exists() {
            return Ok(None);
        }

        let new_name = uniquify(target);
        let outcome =
            relocate(&self.dir, target, &new_name).map_err(|source| PipelineError::Rename {
                from: target.to_string(),
                to: new_name.clone(),
                source,
            })?;

        match outcome {
            Relocation::Renamed => {
                self.renamed
                    .borrow_mut()
                    .insert(target.to_string(), new_name.clone());
                Ok(Some(new_name))
            }
            Relocation::MissingSource => Ok(None),
        }
    }
}

/// Rewrites file links whose target is an eligible image attachment.
pub struct LinkMiddleware {
    renamer: Rc<AttachmentRenamer>,
}

impl LinkMiddleware {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_renamer(Rc::new(AttachmentRenamer::new(dir)))
    }

    pub fn with_renamer(renamer: Rc<AttachmentRenamer>) -> Self {
        Self { renamer }
    }
}

impl NodeMiddleware for LinkMiddleware {
    fn name(&self) -> &'static str {
        "link"
    }

    fn apply(&self, node: &mut OrgNode) -> PipelineResult<()> {
        let OrgNode::Link(link) = node else {
            return Ok(());
        };
        if link.link_type != LinkType::File {
            return Ok(());
        }

        if let Some(new_name) = self.renamer.rename(&link.path)? {
            debug!(old = %link.path, new = %new_name, "rewrote file link");
            // Invariant: path and raw link move together.
            link.path = new_name.clone();
            link.raw_link = new_name;
        }
        Ok(())
    }
}

/// Rewrites the value of the `#+PREVIEW_IMG:` keyword.
///
/// The key must equal the sentinel name exactly (case aside); a
/// near-miss key is left entirely alone, without even an existence
/// check, so unrelated keywords holding path-like values never trigger
/// a rename.
pub struct PreviewImageMiddleware {
    renamer: Rc<AttachmentRenamer>,
}

impl PreviewImageMiddleware {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_renamer(Rc::new(AttachmentRenamer::new(dir)))
    }

    pub fn with_renamer(renamer: Rc<AttachmentRenamer>) -> Self {
        Self { renamer }
    }
}

impl NodeMiddleware for PreviewImageMiddleware {
    fn name(&self) -> &'static str {
        "preview-image"
    }

    fn apply(&self, node: &mut OrgNode) -> PipelineResult<()> {
        let OrgNode::Keyword(keyword) = node else {
            return Ok(());
        };
        if !keyword.key.eq_ignore_ascii_case(PREVIEW_IMAGE_KEY) {
            return Ok(());
        }

        if let Some(new_name) = self.renamer.rename(&keyword.value)? {
            debug!(old = %keyword.value, new = %new_name, "rewrote preview image");
            keyword.value = new_name;
        }
        Ok(())
    }
}

/// An ordered chain of middlewares. Every node passes through the full
/// chain in construction order; each middleware's own guard decides
/// whether anything happens.
#[derive(Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Box<dyn NodeMiddleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chain the corpus walker uses: link rewriting, then preview
    /// image rewriting, both sharing one renamer rooted at the
    /// document's directory.
    pub fn standard(dir: impl Into<PathBuf>) -> Self {
        let renamer = Rc::new(AttachmentRenamer::new(dir));
        Self::new()
            .with(LinkMiddleware::with_renamer(Rc::clone(&renamer)))
            .with(PreviewImageMiddleware::with_renamer(renamer))
    }

    pub fn with(mut self, middleware: impl NodeMiddleware + 'static) -> Self {
        self.middlewares.push(Box::new(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Run every middleware over the node, in order. The first error
    /// aborts the chain for this node and surfaces unchanged.
    pub fn apply(&self, node: &mut OrgNode) -> PipelineResult<()> {
        for middleware in &self.middlewares {
            middleware.apply(node)?;
        }
        Ok(())
    }
}
