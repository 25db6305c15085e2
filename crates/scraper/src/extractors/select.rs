// ABOUTME: Selector-based extraction that concatenates the outer HTML of every match.
// ABOUTME: An unparseable selector matches nothing and yields empty output.

use dom_query::{Document, Matcher};

/// Outer HTML of every element matching `css`, in document order.
///
/// No matches yields an empty string, and so does a selector that does not parse.
pub fn select_outer_html(html: &str, css: &str) -> String {
    let matcher = match Matcher::new(css) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(selector = %css, error = ?e, "invalid selector matches nothing");
            return String::new();
        }
    };

    let doc = Document::from(html);
    let mut out = String::new();
    for el in doc.select_matcher(&matcher).iter() {
        out.push_str(&el.html());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<html><body>
        <div class="article"><p>One</p><p>Two</p></div>
        <p>Outside</p>
    </body></html>"#;

    #[test]
    fn concatenates_matches_in_order() {
        let out = select_outer_html(PAGE, ".article p");
        assert_eq!(out, "<p>One</p><p>Two</p>");
    }

    #[test]
    fn keeps_attributes_of_matched_elements() {
        let html = r#"<div><span class="x" data-id="7">a</span></div>"#;
        let out = select_outer_html(html, "span.x");
        assert_eq!(out, r#"<span class="x" data-id="7">a</span>"#);
    }

    #[test]
    fn no_match_is_empty() {
        assert_eq!(select_outer_html(PAGE, "article.missing"), "");
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        assert_eq!(select_outer_html(PAGE, "div["), "");
        assert_eq!(select_outer_html("<p>a</p>", "p["), "");
    }
}
