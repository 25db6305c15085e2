// ABOUTME: Readability candidate scoring: class/id weights, tag scores and paragraph-driven candidate scores.
// ABOUTME: Scores parents and grandparents of text blocks and scales them by link density.

use std::collections::HashMap;

use ego_tree::NodeId;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::cleaners::effective_tag;
use super::{is_removed, link_density, text_of, RemovedNodes};

static POSITIVE_SCORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story").unwrap()
});
static NEGATIVE_SCORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|foot|footer|footnote|masthead|media|meta|modal|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|tool|widget|byline|author|dateline|writtenby|p-author").unwrap()
});

/// Elements whose text contributes to the score of their ancestors.
const TAGS_TO_SCORE: &[&str] = &[
    "section", "h2", "h3", "h4", "h5", "h6", "p", "td", "pre", "div",
];

/// Text blocks shorter than this (in bytes) are ignored.
const MIN_TEXT_LEN: usize = 25;

/// Score storage using NodeId as key
pub type NodeScores = HashMap<NodeId, f32>;

/// Candidate scores plus the order in which candidates were first seen.
#[derive(Debug, Default)]
pub struct Candidates {
    scores: NodeScores,
    order: Vec<NodeId>,
}

impl Candidates {
    pub fn score(&self, id: NodeId) -> Option<f32> {
        self.scores.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn ensure(&mut self, element: &ElementRef) {
        if !self.scores.contains_key(&element.id()) {
            self.scores.insert(element.id(), initial_score(element));
            self.order.push(element.id());
        }
    }

    fn add(&mut self, id: NodeId, amount: f32) {
        if let Some(score) = self.scores.get_mut(&id) {
            *score += amount;
        }
    }
}

/// Get weight based on className and id patterns
pub fn class_weight(element: &ElementRef) -> f32 {
    let mut weight = 0.0;
    for value in [element.value().attr("class"), element.value().attr("id")]
        .into_iter()
        .flatten()
    {
        if value.is_empty() {
            continue;
        }
        if NEGATIVE_SCORE_RE.is_match(value) {
            weight -= 25.0;
        }
        if POSITIVE_SCORE_RE.is_match(value) {
            weight += 25.0;
        }
    }
    weight
}

fn tag_score(tag: &str) -> f32 {
    match tag {
        "div" => 5.0,
        "pre" | "td" | "blockquote" | "img" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    }
}

/// Base score of a newly discovered candidate.
fn initial_score(element: &ElementRef) -> f32 {
    tag_score(effective_tag(element)) + class_weight(element)
}

/// Score of a single text block: one point, commas plus one, and a point per
/// hundred bytes of text up to three.
fn content_score(text: &str) -> f32 {
    let commas = text.matches(',').count() as f32;
    let length_bonus = (text.len() / 100).min(3) as f32;
    1.0 + (commas + 1.0) + length_bonus
}

/// Score every candidate container in the document.
pub fn score_candidates(doc: &Html, removed: &RemovedNodes) -> Candidates {
    let mut candidates = Candidates::default();

    let selector = match Selector::parse("*") {
        Ok(s) => s,
        Err(_) => return candidates,
    };

    for element in doc.select(&selector) {
        if !TAGS_TO_SCORE.contains(&effective_tag(&element)) || is_removed(&element, removed) {
            continue;
        }

        let text = text_of(&element, removed);
        if text.len() < MIN_TEXT_LEN {
            continue;
        }

        let Some(parent) = element.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        let grandparent = parent.parent().and_then(ElementRef::wrap);

        candidates.ensure(&parent);
        if let Some(gp) = &grandparent {
            candidates.ensure(gp);
        }

        let score = content_score(&text);
        candidates.add(parent.id(), score);
        if let Some(gp) = &grandparent {
            candidates.add(gp.id(), score / 2.0);
        }
    }

    // Good content has a small link density and is mostly unaffected here
    for id in &candidates.order {
        if let Some(element) = doc.tree.get(*id).and_then(ElementRef::wrap) {
            let density = link_density(&element, removed);
            if let Some(score) = candidates.scores.get_mut(id) {
                *score *= 1.0 - density;
            }
        }
    }

    candidates
}

/// Find the top scoring candidate, falling back to `<body>` with a zero score.
///
/// Ties go to the candidate discovered first.
pub fn top_candidate<'a>(doc: &'a Html, candidates: &Candidates) -> Option<(ElementRef<'a>, f32)> {
    let mut best: Option<(NodeId, f32)> = None;
    for id in &candidates.order {
        let score = candidates.scores[id];
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((*id, score));
        }
    }

    if let Some((id, score)) = best {
        if let Some(element) = doc.tree.get(id).and_then(ElementRef::wrap) {
            return Some((element, score));
        }
    }

    let body = Selector::parse("body").ok()?;
    doc.select(&body).next().map(|el| (el, 0.0))
}
