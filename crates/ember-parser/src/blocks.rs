//! Line-oriented document scanner
//!
//! Builds the document tree in a single pass over the input lines.
//! Headline nesting follows star depth via a stack of open headlines;
//! multi-line constructs (property drawers, `#+BEGIN_` blocks) are
//! consumed by inner loops and fail loudly when unterminated.
//!
//! Check order per line matters: drawer and block openers would
//! otherwise scan as plain paragraph text, and a `* ` at column zero is
//! a headline, never a bullet.

use crate::error::ParseError;
use crate::inline::parse_inline;
use ember_core::{
    Blank, Document, Headline, Keyword, ListItem, NodeProperty, OrgNode, Paragraph, PlainList,
    PropertyDrawer, Text,
};
use regex::Regex;
use std::sync::LazyLock;

static HEADLINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*+)[ \t]+(.*)$").expect("headline regex"));

static TAGS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]+:([A-Za-z0-9_@#%]+(?::[A-Za-z0-9_@#%]+)*):[ \t]*$").expect("tags regex")
});

static KEYWORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\+([A-Za-z][A-Za-z0-9_]*):[ \t]*(.*)$").expect("keyword regex"));

static DRAWER_START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([ \t]*):PROPERTIES:[ \t]*$").expect("drawer regex"));

static DRAWER_END_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[ \t]*:END:[ \t]*$").expect("drawer end regex"));

static PROPERTY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*:([^:\s]+):[ \t]*(.*)$").expect("property regex"));

static BLOCK_BEGIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[ \t]*#\+BEGIN_([A-Za-z0-9_-]+)").expect("block regex"));

static LIST_ITEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)([-+*]|\d+[.)])[ \t]+(.*)$").expect("list regex"));

/// Headline stack: nodes attach to the innermost open headline, or to
/// the document root when none is open.
#[derive(Default)]
struct TreeBuilder {
    doc: Vec<OrgNode>,
    open: Vec<Headline>,
}

impl TreeBuilder {
    fn attach(&mut self, node: OrgNode) {
        match self.open.last_mut() {
            Some(headline) => headline.children.push(node),
            None => self.doc.push(node),
        }
    }

    /// Close every open headline at `level` or deeper.
    fn close_to(&mut self, level: usize) {
        while self.open.last().is_some_and(|h| h.level >= level) {
            let closed = self.open.pop().expect("open headline");
            self.attach(OrgNode::Headline(closed));
        }
    }

    fn open_headline(&mut self, headline: Headline) {
        self.close_to(headline.level);
        self.open.push(headline);
    }

    fn finish(mut self) -> Vec<OrgNode> {
        self.close_to(1);
        self.doc
    }
}

fn flush_paragraph(builder: &mut TreeBuilder, para: &mut Vec<&str>) {
    if para.is_empty() {
        return;
    }
    let text = para.join("\n");
    para.clear();
    builder.attach(OrgNode::Paragraph(Paragraph {
        children: parse_inline(&text),
    }));
}

fn flush_list(builder: &mut TreeBuilder, list: &mut Vec<OrgNode>) {
    if !list.is_empty() {
        builder.attach(OrgNode::PlainList(PlainList {
            items: std::mem::take(list),
        }));
    }
}

fn flush_blanks(builder: &mut TreeBuilder, blanks: &mut usize) {
    if *blanks > 0 {
        builder.attach(OrgNode::Blank(Blank { count: *blanks }));
        *blanks = 0;
    }
}

/// Split a headline rest-of-line into title text and trailing tags.
fn split_tags(rest: &str) -> (String, Vec<String>) {
    if let Some(m) = TAGS_REGEX.find(rest) {
        let title = rest[..m.start()].trim_end().to_string();
        let tags = rest[m.start()..]
            .trim()
            .trim_matches(':')
            .split(':')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        (title, tags)
    } else {
        (rest.trim_end().to_string(), Vec::new())
    }
}

/// Parse raw org text into a document tree.
pub fn parse(input: &str) -> Result<OrgNode, ParseError> {
    let lines: Vec<&str> = input.lines().collect();
    let mut builder = TreeBuilder::default();
    let mut para: Vec<&str> = Vec::new();
    let mut list: Vec<OrgNode> = Vec::new();
    let mut blanks = 0usize;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            flush_paragraph(&mut builder, &mut para);
            flush_list(&mut builder, &mut list);
            blanks += 1;
            i += 1;
            continue;
        }

        if let Some(caps) = DRAWER_START_REGEX.captures(line) {
            flush_paragraph(&mut builder, &mut para);
            flush_list(&mut builder, &mut list);
            flush_blanks(&mut builder, &mut blanks);

            let start_line = i + 1;
            let indent = caps.get(1).expect("indent group").as_str().len();
            let mut entries = Vec::new();
            let mut j = i + 1;
            loop {
                let Some(entry_line) = lines.get(j) else {
                    return Err(ParseError::UnterminatedDrawer { line: start_line });
                };
                if DRAWER_END_REGEX.is_match(entry_line) {
                    break;
                }
                let Some(pcaps) = PROPERTY_REGEX.captures(entry_line) else {
                    return Err(ParseError::MalformedProperty {
                        line: j + 1,
                        content: entry_line.to_string(),
                    });
                };
                entries.push(NodeProperty {
                    name: pcaps.get(1).expect("name group").as_str().to_string(),
                    value: pcaps
                        .get(2)
                        .expect("value group")
                        .as_str()
                        .trim_end()
                        .to_string(),
                });
                j += 1;
            }
            builder.attach(OrgNode::PropertyDrawer(PropertyDrawer { indent, entries }));
            i = j + 1;
            continue;
        }

        if let Some(caps) = BLOCK_BEGIN_REGEX.captures(line) {
            flush_paragraph(&mut builder, &mut para);
            flush_list(&mut builder, &mut list);
            flush_blanks(&mut builder, &mut blanks);

            let name = caps.get(1).expect("block name").as_str().to_string();
            let start_line = i + 1;
            let end_marker = format!("#+end_{}", name.to_lowercase());
            let mut j = i + 1;
            loop {
                let Some(block_line) = lines.get(j) else {
                    return Err(ParseError::UnterminatedBlock {
                        name,
                        line: start_line,
                    });
                };
                if block_line.trim().to_lowercase() == end_marker {
                    break;
                }
                j += 1;
            }
            // Verbatim: delimiters included, no inline parsing inside.
            builder.attach(OrgNode::Paragraph(Paragraph {
                children: vec![OrgNode::Text(Text {
                    value: lines[i..=j].join("\n"),
                })],
            }));
            i = j + 1;
            continue;
        }

        if let Some(caps) = HEADLINE_REGEX.captures(line) {
            flush_paragraph(&mut builder, &mut para);
            flush_list(&mut builder, &mut list);
            flush_blanks(&mut builder, &mut blanks);

            let level = caps.get(1).expect("stars group").as_str().len();
            let (title, tags) = split_tags(caps.get(2).expect("title group").as_str());
            builder.open_headline(Headline {
                level,
                title,
                tags,
                children: Vec::new(),
            });
            i += 1;
            continue;
        }

        if let Some(caps) = KEYWORD_REGEX.captures(line) {
            flush_paragraph(&mut builder, &mut para);
            flush_list(&mut builder, &mut list);
            flush_blanks(&mut builder, &mut blanks);

            builder.attach(OrgNode::Keyword(Keyword {
                key: caps.get(1).expect("key group").as_str().to_string(),
                value: caps
                    .get(2)
                    .expect("value group")
                    .as_str()
                    .trim_end()
                    .to_string(),
            }));
            i += 1;
            continue;
        }

        if let Some(caps) = LIST_ITEM_REGEX.captures(line) {
            flush_paragraph(&mut builder, &mut para);
            flush_blanks(&mut builder, &mut blanks);

            list.push(OrgNode::ListItem(ListItem {
                indent: caps.get(1).expect("indent group").as_str().len(),
                bullet: caps.get(2).expect("bullet group").as_str().to_string(),
                children: parse_inline(caps.get(3).expect("content group").as_str()),
            }));
            i += 1;
            continue;
        }

        flush_list(&mut builder, &mut list);
        flush_blanks(&mut builder, &mut blanks);
        para.push(line);
        i += 1;
    }

    flush_paragraph(&mut builder, &mut para);
    flush_list(&mut builder, &mut list);
    flush_blanks(&mut builder, &mut blanks);

    Ok(OrgNode::Document(Document {
        children: builder.finish(),
    }))
}
