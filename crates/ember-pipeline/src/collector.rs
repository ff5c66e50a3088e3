//! Note collection
//!
//! A depth-first, pre-order walk over the document tree. Every node is
//! passed through the full middleware chain exactly once, then mined
//! for note-level metadata. The resulting [`Note`] therefore describes
//! the document *after* rewriting: a collected preview image or link
//! target names the renamed file.
//!
//! Identity is a document-level singleton: the first `:ID:` drawer
//! entry in walk order wins and later ones are ignored. A document with
//! no identity still produces a note; filtering is the corpus walker's
//! decision.

use crate::error::PipelineResult;
use crate::middleware::MiddlewareChain;
use ember_core::{
    parse_filetags, Note, OrgNode, DESCRIPTION_KEY, FILETAGS_KEY, ID_PROPERTY, PREVIEW_IMAGE_KEY,
    TITLE_KEY,
};

#[derive(Default)]
struct CollectState {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    preview_image: Option<String>,
    links: Vec<String>,
    /// First top-level headline, used when no `#+TITLE:` exists.
    fallback_title: Option<String>,
}

impl CollectState {
    fn into_note(self) -> Note {
        Note {
            id: self.id,
            title: self.title.or(self.fallback_title),
            description: self.description,
            tags: self.tags,
            preview_image: self.preview_image,
            links: self.links,
        }
    }
}

/// Walk the tree, applying `chain` to every node, and extract the
/// document's note. The tree is mutated in place through the exclusive
/// borrow; middleware errors surface unchanged and abort the walk.
pub fn collect_note(tree: &mut OrgNode, chain: &MiddlewareChain) -> PipelineResult<Note> {
    let mut state = CollectState::default();
    visit(tree, chain, &mut state)?;
    Ok(state.into_note())
}

fn visit(node: &mut OrgNode, chain: &MiddlewareChain, state: &mut CollectState) -> PipelineResult<()> {
    chain.apply(node)?;

    match node {
        OrgNode::PropertyDrawer(drawer) => {
            if state.id.is_none() {
                if let Some(id) = drawer.get(ID_PROPERTY) {
                    if !id.trim().is_empty() {
                        state.id = Some(id.to_string());
                    }
                }
            }
        }
        OrgNode::Keyword(keyword) => {
            let key = keyword.key.to_lowercase();
            match key.as_str() {
                TITLE_KEY => {
                    if state.title.is_none() && !keyword.value.is_empty() {
                        state.title = Some(keyword.value.clone());
                    }
                }
                DESCRIPTION_KEY => {
                    if state.description.is_none() && !keyword.value.is_empty() {
                        state.description = Some(keyword.value.clone());
                    }
                }
                FILETAGS_KEY => {
                    state.tags.extend(parse_filetags(&keyword.value));
                }
                PREVIEW_IMAGE_KEY => {
                    if state.preview_image.is_none() && !keyword.value.is_empty() {
                        state.preview_image = Some(keyword.value.clone());
                    }
                }
                _ => {}
            }
        }
        OrgNode::Headline(headline) => {
            if headline.level == 1
                && state.fallback_title.is_none()
                && !headline.title.is_empty()
            {
                state.fallback_title = Some(headline.title.clone());
            }
        }
        OrgNode::Link(link) => {
            state.links.push(link.path.clone());
        }
        _ => {}
    }

    if let Some(children) = node.children_mut() {
        for child in children {
            visit(child, chain, state)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_parser::parse;

    fn collect(input: &str) -> Note {
        let mut tree = parse(input).unwrap();
        collect_note(&mut tree, &MiddlewareChain::new()).unwrap()
    }

    #[test]
    fn test_collects_identity_title_and_tags() {
        let note = collect(
            ":PROPERTIES:\n:ID: 4f9a-22\n:END:\n#+TITLE: Reading\n#+FILETAGS: :books:rust:\n",
        );
        assert_eq!(note.id.as_deref(), Some("4f9a-22"));
        assert_eq!(note.title.as_deref(), Some("Reading"));
        assert_eq!(note.tags, vec!["books", "rust"]);
        assert!(note.has_identity());
    }

    #[test]
    fn test_first_identity_wins() {
        let note = collect(
            ":PROPERTIES:\n:ID: first\n:END:\n* Sub\n:PROPERTIES:\n:ID: second\n:END:\n",
        );
        assert_eq!(note.id.as_deref(), Some("first"));
    }

    #[test]
    fn test_headline_title_fallback() {
        let note = collect("* The headline\nbody\n");
        assert_eq!(note.title.as_deref(), Some("The headline"));

        let keyword_wins = collect("#+TITLE: Keyword title\n* The headline\n");
        assert_eq!(keyword_wins.title.as_deref(), Some("Keyword title"));
    }

    #[test]
    fn test_missing_identity_still_produces_note() {
        let note = collect("#+TITLE: No id here\n");
        assert_eq!(note.id, None);
        assert!(!note.has_identity());
        assert_eq!(note.title.as_deref(), Some("No id here"));
    }

    #[test]
    fn test_links_collected_in_preorder() {
        let note = collect("[[one.png]]\n\n* H\nsee [[file:two.png]] and [[https://example.com]]\n");
        assert_eq!(
            note.links,
            vec!["one.png", "two.png", "https://example.com"]
        );
    }

    #[test]
    fn test_preview_image_keyword_collected() {
        let note = collect("#+PREVIEW_IMG: cover.png\n");
        assert_eq!(note.preview_image.as_deref(), Some("cover.png"));
    }
}
