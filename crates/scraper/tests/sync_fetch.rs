// ABOUTME: Integration tests for the blocking fetch entry point and Scraper::scrape_blocking.
// ABOUTME: Runs outside any async runtime against a local httpmock server.

use digests_scraper::{fetch, ExtractionRequest, RuleTable, Scraper};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;

const PAGE: &str = r#"<html><body>
    <div class="article"><p>One</p><p>Two</p></div>
</body></html>"#;

#[test]
fn test_fetch_with_selector_rule() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/page")
            .header("user-agent", "sync-agent")
            .header("cookie", "a=b");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(PAGE);
    });

    let out = fetch(
        &server.url("/page"),
        ".article p",
        "sync-agent",
        "a=b",
        false,
        false,
    )
    .unwrap();
    mock.assert();
    assert_eq!(out, "<p>One</p><p>Two</p>");
}

#[test]
fn test_fetch_rejects_images() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/logo.png");
        then.status(200)
            .header("content-type", "image/png")
            .body(&b"\x89PNG\r\n\x1a\n"[..]);
    });

    let err = fetch(&server.url("/logo.png"), "", "", "", false, false).unwrap_err();
    assert!(err.is_unsupported_content_type());
    assert_eq!(err.content_type(), Some("image/png"));
}

#[test]
fn test_scrape_blocking_uses_configured_rules() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/page");
        then.status(200).header("content-type", "text/html").body(PAGE);
    });

    let scraper = Scraper::builder()
        .rules(RuleTable::new().with("127.0.0.1", ".article p:first-child"))
        .build();
    let out = scraper
        .scrape_blocking(&ExtractionRequest::new(server.url("/page")))
        .unwrap();
    assert_eq!(out, "<p>One</p>");
}
