// ABOUTME: DOM traversal, scoring and serialization helpers for the heuristic readability engine.
// ABOUTME: Works on scraper's immutable tree, tracking dropped subtrees in a NodeId set.

//! DOM utilities for HTML document analysis.
//!
//! scraper's [`Html`](scraper::Html) tree cannot be mutated, so nodes that the
//! readability pass drops are recorded in a [`RemovedNodes`] set and skipped by
//! every text, scoring and serialization helper.

pub mod cleaners;
pub mod scoring;
pub mod serialize;

use std::collections::HashSet;

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Node};

/// Roots of subtrees that are treated as removed from the document.
pub type RemovedNodes = HashSet<NodeId>;

/// Returns true when the element or one of its ancestors was removed.
pub fn is_removed(element: &ElementRef, removed: &RemovedNodes) -> bool {
    removed.contains(&element.id()) || element.ancestors().any(|a| removed.contains(&a.id()))
}

fn collect_text(node: NodeRef<'_, Node>, removed: &RemovedNodes, out: &mut String) {
    for child in node.children() {
        if removed.contains(&child.id()) {
            continue;
        }
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => collect_text(child, removed, out),
            _ => {}
        }
    }
}

/// Concatenated text of an element, skipping removed subtrees.
pub fn text_of(element: &ElementRef, removed: &RemovedNodes) -> String {
    let mut out = String::new();
    collect_text(**element, removed, &mut out);
    out
}

fn link_text_len(node: NodeRef<'_, Node>, removed: &RemovedNodes) -> usize {
    node.children()
        .filter(|child| !removed.contains(&child.id()))
        .filter_map(ElementRef::wrap)
        .map(|child| {
            if child.value().name() == "a" {
                text_of(&child, removed).len()
            } else {
                link_text_len(*child, removed)
            }
        })
        .sum()
}

/// Ratio of link text to all text inside the element.
pub fn link_density(element: &ElementRef, removed: &RemovedNodes) -> f32 {
    let total = text_of(element, removed).len();
    if total == 0 {
        return 0.0;
    }
    link_text_len(**element, removed) as f32 / total as f32
}
