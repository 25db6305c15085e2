// ABOUTME: Heuristic readability extraction over an already decoded HTML document.
// ABOUTME: Scores candidates, picks the best one and merges qualifying siblings into a single div.

//! Article body extraction.
//!
//! The pipeline is:
//! 1. Drop scripts, styles and unlikely candidates.
//! 2. Score the parents and grandparents of every text block.
//! 3. Pick the highest scoring candidate, or `<body>` when nothing scored.
//! 4. Walk the candidate's siblings and keep those that score well enough or
//!    read like prose.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::dom::cleaners::{effective_tag, removed_nodes};
use crate::dom::scoring::{score_candidates, top_candidate, Candidates};
use crate::dom::serialize::inner_html;
use crate::dom::{is_removed, link_density, text_of, RemovedNodes};

// A sentence end: a period followed by a space or the end of text
static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.( |$)").unwrap());

/// Minimum sibling score threshold.
const MIN_SIBLING_THRESHOLD: f32 = 10.0;

/// Length that separates long and short paragraphs when merging siblings.
const LONG_PARAGRAPH_LEN: usize = 80;

/// Extract the main content of `html` as an HTML fragment wrapped in a `<div>`.
///
/// Never fails: a document with no scorable text yields its body.
pub fn extract_content(html: &str) -> String {
    let doc = Html::parse_document(html);
    let removed = removed_nodes(&doc);
    let candidates = score_candidates(&doc, &removed);

    match top_candidate(&doc, &candidates) {
        Some((top, score)) => get_article(top, score, &candidates, &removed),
        None => String::new(),
    }
}

fn get_article(
    top: ElementRef<'_>,
    top_score: f32,
    candidates: &Candidates,
    removed: &RemovedNodes,
) -> String {
    let threshold = MIN_SIBLING_THRESHOLD.max(top_score * 0.2);
    let mut out = String::from("<div>");

    let siblings: Vec<ElementRef<'_>> = match top.parent() {
        Some(parent) => parent.children().filter_map(ElementRef::wrap).collect(),
        None => vec![top],
    };

    for sibling in siblings {
        if removed.contains(&sibling.id()) {
            continue;
        }
        if sibling.id() == top.id() || keep_sibling(&sibling, threshold, candidates, removed) {
            let tag = if effective_tag(&sibling) == "p" { "p" } else { "div" };
            out.push('<');
            out.push_str(tag);
            out.push('>');
            out.push_str(&inner_html(&sibling, removed));
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }

    out.push_str("</div>");
    out
}

fn keep_sibling(
    sibling: &ElementRef<'_>,
    threshold: f32,
    candidates: &Candidates,
    removed: &RemovedNodes,
) -> bool {
    if candidates
        .score(sibling.id())
        .is_some_and(|score| score >= threshold)
    {
        return true;
    }

    if effective_tag(sibling) != "p" || is_removed(sibling, removed) {
        return false;
    }

    let text = text_of(sibling, removed);
    let density = link_density(sibling, removed);
    if text.len() >= LONG_PARAGRAPH_LEN {
        density < 0.25
    } else {
        density == 0.0 && SENTENCE_END_RE.is_match(&text)
    }
}
