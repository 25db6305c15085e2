// ABOUTME: Pre-scoring cleaners: strips scripts, styles and unlikely candidates, and detects misused divs.
// ABOUTME: Produces the RemovedNodes set consumed by scoring and serialization.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::RemovedNodes;

static BLACKLIST_CANDIDATES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)popupbody|-ad|g-plus").unwrap());
static OK_MAYBE_CANDIDATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)and|article|body|column|main|shadow").unwrap());
static UNLIKELY_CANDIDATES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|foot|header|legends|menu|modal|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote").unwrap()
});

// Children that keep a div from being read as a paragraph
const DIV_TO_P_BLOCK_TAGS: &[&str] = &[
    "a",
    "blockquote",
    "dl",
    "div",
    "img",
    "ol",
    "p",
    "pre",
    "table",
    "ul",
];

/// Check if element should be stripped as unlikely candidate.
///
/// Class and id are matched as one concatenated string; html and body are never stripped.
pub fn is_unlikely_candidate(element: &ElementRef) -> bool {
    let tag = element.value().name();
    if tag == "html" || tag == "body" {
        return false;
    }

    let class = element.value().attr("class").unwrap_or("");
    let id = element.value().attr("id").unwrap_or("");
    let hints = format!("{}{}", class, id);
    if hints.is_empty() {
        return false;
    }

    BLACKLIST_CANDIDATES_RE.is_match(&hints)
        || (UNLIKELY_CANDIDATES_RE.is_match(&hints) && !OK_MAYBE_CANDIDATE_RE.is_match(&hints))
}

/// A div with no block-level descendants is really a paragraph.
pub fn is_misused_div(element: &ElementRef) -> bool {
    if element.value().name() != "div" {
        return false;
    }
    !element
        .descendants()
        .filter_map(ElementRef::wrap)
        .skip(1)
        .any(|el| DIV_TO_P_BLOCK_TAGS.contains(&el.value().name()))
}

/// Tag name the element is treated as: misused divs read as `p`.
pub fn effective_tag<'a>(element: &ElementRef<'a>) -> &'a str {
    if is_misused_div(element) {
        "p"
    } else {
        element.value().name()
    }
}

/// Collect the subtrees dropped before scoring: scripts, styles and unlikely candidates.
pub fn removed_nodes(doc: &Html) -> RemovedNodes {
    let mut removed = RemovedNodes::new();

    if let Ok(sel) = Selector::parse("script, style") {
        removed.extend(doc.select(&sel).map(|el| el.id()));
    }

    if let Ok(sel) = Selector::parse("*") {
        for el in doc.select(&sel) {
            if is_unlikely_candidate(&el) {
                removed.insert(el.id());
            }
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        let sel = Selector::parse(css).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn unlikely_candidates() {
        let doc = Html::parse_document(
            r#"<body class="comment">
                <div id="sidebar">s</div>
                <div class="comments">c</div>
                <div class="main-sidebar">m</div>
                <div class="popupbody">p</div>
                <div class="story">x</div>
            </body>"#,
        );
        assert!(is_unlikely_candidate(&first(&doc, "#sidebar")));
        assert!(is_unlikely_candidate(&first(&doc, ".comments")));
        // "main" rescues an otherwise unlikely element
        assert!(!is_unlikely_candidate(&first(&doc, ".main-sidebar")));
        // blacklist wins regardless
        assert!(is_unlikely_candidate(&first(&doc, ".popupbody")));
        assert!(!is_unlikely_candidate(&first(&doc, ".story")));
        assert!(!is_unlikely_candidate(&first(&doc, "body")));
    }

    #[test]
    fn misused_divs() {
        let doc = Html::parse_fragment(
            r#"<div id="a">just <b>text</b></div><div id="b"><p>para</p></div>"#,
        );
        assert!(is_misused_div(&first(&doc, "#a")));
        assert_eq!(effective_tag(&first(&doc, "#a")), "p");
        assert!(!is_misused_div(&first(&doc, "#b")));
        assert_eq!(effective_tag(&first(&doc, "#b")), "div");
    }

    #[test]
    fn removed_nodes_covers_scripts_and_unlikely() {
        let doc = Html::parse_document(
            r#"<html><head><style>p{}</style></head><body>
                <script>var a;</script>
                <nav class="menu">nav</nav>
                <article>body</article>
            </body></html>"#,
        );
        let removed = removed_nodes(&doc);
        assert!(removed.contains(&first(&doc, "style").id()));
        assert!(removed.contains(&first(&doc, "script").id()));
        assert!(removed.contains(&first(&doc, "nav").id()));
        assert!(!removed.contains(&first(&doc, "article").id()));
    }
}
