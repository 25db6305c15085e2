// ABOUTME: HTML serialization over scraper's tree that honours the RemovedNodes set.
// ABOUTME: Renames misused divs to p while writing and escapes text and attribute values.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

use super::cleaners::effective_tag;
use super::RemovedNodes;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

// Text inside these is written verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

pub fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn write_element(element: ElementRef<'_>, removed: &RemovedNodes, out: &mut String) {
    let tag = effective_tag(&element);
    out.push('<');
    out.push_str(tag);
    for (name, value) in element.value().attrs() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }

    if is_void_element(tag) {
        out.push_str("/>");
        return;
    }

    out.push('>');
    serialize_children(*element, removed, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Write the children of `node`, skipping removed subtrees.
pub fn serialize_children(node: NodeRef<'_, Node>, removed: &RemovedNodes, out: &mut String) {
    let raw = node
        .value()
        .as_element()
        .is_some_and(|el| RAW_TEXT_ELEMENTS.contains(&el.name()));

    for child in node.children() {
        if removed.contains(&child.id()) {
            continue;
        }
        match child.value() {
            Node::Text(text) if raw => out.push_str(text),
            Node::Text(text) => escape_text(text, out),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    write_element(el, removed, out);
                }
            }
            _ => {}
        }
    }
}

/// Inner HTML of an element without its removed descendants.
pub fn inner_html(element: &ElementRef, removed: &RemovedNodes) -> String {
    let mut out = String::new();
    serialize_children(**element, removed, &mut out);
    out
}
