//! Inline link extraction
//!
//! Splits paragraph text into interleaved `Text` and `Link` nodes.
//! Supports `[[target]]` and `[[target][description]]` forms. Targets
//! are classified by scheme; a bare target with no scheme is treated as
//! a file path, which is how attachment references are written in
//! practice (`[[photo.jpg]]`, `[[./img/photo.jpg]]`).

use ember_core::{Link, LinkType, OrgNode, Text};
use regex::Regex;
use std::sync::LazyLock;

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]+)\](?:\[([^\[\]]+)\])?\]").expect("link regex"));

static SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.-]*):(.*)$").expect("scheme regex"));

/// Classify a link target and strip the scheme where the path is the
/// interesting part (`file:`, `id:`). Web URLs keep their full form.
pub fn classify_target(target: &str) -> (LinkType, String) {
    if let Some(rest) = target.strip_prefix("file:") {
        return (LinkType::File, rest.to_string());
    }
    if target.starts_with("https://") {
        return (LinkType::Https, target.to_string());
    }
    if target.starts_with("http://") {
        return (LinkType::Http, target.to_string());
    }
    if let Some(rest) = target.strip_prefix("id:") {
        return (LinkType::Id, rest.to_string());
    }
    if let Some(caps) = SCHEME_REGEX.captures(target) {
        let scheme = caps.get(1).expect("scheme group").as_str();
        let rest = caps.get(2).expect("rest group").as_str();
        return (LinkType::Other(scheme.to_string()), rest.to_string());
    }
    (LinkType::File, target.to_string())
}

/// Parse one run of text into inline nodes. Text between and around
/// links is preserved verbatim, including embedded newlines.
pub fn parse_inline(text: &str) -> Vec<OrgNode> {
    let mut nodes = Vec::new();
    let mut cursor = 0;

    for caps in LINK_REGEX.captures_iter(text) {
        let whole = caps.get(0).expect("whole match");
        if whole.start() > cursor {
            nodes.push(OrgNode::Text(Text {
                value: text[cursor..whole.start()].to_string(),
            }));
        }

        let target = caps.get(1).expect("target group").as_str();
        let description = caps.get(2).map(|m| m.as_str().to_string());
        let (link_type, path) = classify_target(target);

        nodes.push(OrgNode::Link(Link {
            link_type,
            path,
            raw_link: target.to_string(),
            description,
        }));
        cursor = whole.end();
    }

    if cursor < text.len() {
        nodes.push(OrgNode::Text(Text {
            value: text[cursor..].to_string(),
        }));
    }

    nodes
}
