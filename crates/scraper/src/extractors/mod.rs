// ABOUTME: Content extraction strategies applied to a fetched page.
// ABOUTME: CSS selector capture, heuristic readability and the alternate readability engine.

//! Content extraction module.
//!
//! Submodules:
//! - `select`: outer HTML of every element matching a CSS selector.
//! - `content`: heuristic readability over an already decoded document.
//! - `alternate`: the independent readability engine used by the `ra` rule.

pub mod alternate;
pub mod content;
pub mod select;
