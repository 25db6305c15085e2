// ABOUTME: Alternate readability engine backed by the readability crate.
// ABOUTME: Runs on a separately fetched body with the effective URL as base.

use std::io::Cursor;

use anyhow::Context;
use url::Url;

/// Extract the readable content of `body` using the alternate engine.
pub fn extract_alternate(body: &[u8], base_url: &Url) -> anyhow::Result<String> {
    let mut cursor = Cursor::new(body);
    let product = readability::extractor::extract(&mut cursor, base_url)
        .context("alternate readability extraction failed")?;
    Ok(product.content)
}
