//! Org document tree
//!
//! A parsed document is a tree of [`OrgNode`] values, one variant per
//! syntactic construct. The variant set is closed: transformations
//! pattern-match on the variant and fall through as the identity for
//! everything else.
//!
//! The tree is mutated in place during a pipeline walk through an
//! exclusive `&mut` borrow; nothing in this crate adds or removes nodes.

use serde::{Deserialize, Serialize};

/// Classification of a link target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// File-system path: plain (`photo.jpg`), relative (`./photo.jpg`),
    /// or explicit `file:` scheme.
    File,
    /// `http://` URL
    Http,
    /// `https://` URL
    Https,
    /// `id:` reference to another document
    Id,
    /// Any other scheme (`mailto:`, `elisp:`, ...)
    Other(String),
}

impl LinkType {
    /// Stable string form, used in logs and serialized output.
    pub fn as_str(&self) -> &str {
        match self {
            LinkType::File => "file",
            LinkType::Http => "http",
            LinkType::Https => "https",
            LinkType::Id => "id",
            LinkType::Other(scheme) => scheme,
        }
    }
}

/// Document root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub children: Vec<OrgNode>,
}

/// An outline headline (`** Title :tag1:tag2:`).
///
/// `children` owns the headline's section content and any deeper
/// headlines; nesting follows star depth. The title is kept as plain
/// text, exactly as written between the stars and the tag suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    /// Star count (1-based outline depth).
    pub level: usize,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OrgNode>,
}

/// One `:NAME: value` entry inside a property drawer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProperty {
    pub name: String,
    pub value: String,
}

/// A `:PROPERTIES:` ... `:END:` drawer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDrawer {
    /// Leading spaces shared by the drawer's lines, preserved for
    /// serialization of drawers indented under a headline.
    #[serde(default)]
    pub indent: usize,
    pub entries: Vec<NodeProperty>,
}

impl PropertyDrawer {
    /// Look up an entry by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.value.as_str())
    }
}

/// A `#+KEY: value` line. The key is stored as written; matching is
/// case-insensitive at the point of use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub key: String,
    pub value: String,
}

/// A run of plain lines. Children are inline [`Text`] and [`Link`]
/// nodes; verbatim `#+BEGIN_` blocks are carried as a paragraph with a
/// single text child and are never inline-parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub children: Vec<OrgNode>,
}

/// A run of sibling bullet items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlainList {
    /// Always [`OrgNode::ListItem`] values.
    pub items: Vec<OrgNode>,
}

/// A single bullet line (`- item`, `3. item`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Leading spaces before the bullet.
    #[serde(default)]
    pub indent: usize,
    /// Bullet text as written (`-`, `+`, `1.`, `2)`).
    pub bullet: String,
    /// Inline content after the bullet.
    pub children: Vec<OrgNode>,
}

/// A `[[target]]` or `[[target][description]]` link.
///
/// `raw_link` is the original target text between the first pair of
/// brackets; `path` is that target with any `file:`/`id:` scheme
/// stripped. After a pipeline rewrite the two are identical by
/// invariant: a rename updates both or neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub link_type: LinkType,
    pub path: String,
    pub raw_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Literal text. Inside a paragraph this may span multiple lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
}

/// A run of blank lines, preserved so serialization round-trips the
/// document's vertical spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blank {
    pub count: usize,
}

/// One syntactic unit of an org document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrgNode {
    Document(Document),
    Headline(Headline),
    PropertyDrawer(PropertyDrawer),
    Keyword(Keyword),
    Paragraph(Paragraph),
    PlainList(PlainList),
    ListItem(ListItem),
    Link(Link),
    Text(Text),
    Blank(Blank),
}

impl OrgNode {
    /// Discriminant tag for this node.
    pub fn kind(&self) -> &'static str {
        match self {
            OrgNode::Document(_) => "document",
            OrgNode::Headline(_) => "headline",
            OrgNode::PropertyDrawer(_) => "property_drawer",
            OrgNode::Keyword(_) => "keyword",
            OrgNode::Paragraph(_) => "paragraph",
            OrgNode::PlainList(_) => "plain_list",
            OrgNode::ListItem(_) => "list_item",
            OrgNode::Link(_) => "link",
            OrgNode::Text(_) => "text",
            OrgNode::Blank(_) => "blank",
        }
    }

    /// Child nodes in document order. Leaves return an empty slice.
    pub fn children(&self) -> &[OrgNode] {
        match self {
            OrgNode::Document(d) => &d.children,
            OrgNode::Headline(h) => &h.children,
            OrgNode::Paragraph(p) => &p.children,
            OrgNode::PlainList(l) => &l.items,
            OrgNode::ListItem(i) => &i.children,
            OrgNode::PropertyDrawer(_)
            | OrgNode::Keyword(_)
            | OrgNode::Link(_)
            | OrgNode::Text(_)
            | OrgNode::Blank(_) => &[],
        }
    }

    /// Mutable access to the child list, `None` for leaf variants.
    pub fn children_mut(&mut self) -> Option<&mut Vec<OrgNode>> {
        match self {
            OrgNode::Document(d) => Some(&mut d.children),
            OrgNode::Headline(h) => Some(&mut h.children),
            OrgNode::Paragraph(p) => Some(&mut p.children),
            OrgNode::PlainList(l) => Some(&mut l.items),
            OrgNode::ListItem(i) => Some(&mut i.children),
            OrgNode::PropertyDrawer(_)
            | OrgNode::Keyword(_)
            | OrgNode::Link(_)
            | OrgNode::Text(_)
            | OrgNode::Blank(_) => None,
        }
    }

    /// Total node count of this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(OrgNode::subtree_len).sum::<usize>()
    }
}
