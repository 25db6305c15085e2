// ABOUTME: Synchronous adapter for the async Scraper API.
// ABOUTME: Provides the blocking fetch entry point and Scraper::scrape_blocking.

use tokio::runtime::Runtime;

use crate::error::ScraperError;
use crate::options::{ExtractionRequest, Options};
use crate::Scraper;

/// Fetch `website_url` and extract its main content, blocking the calling thread.
///
/// Uses [`Options::from_env`] and the builtin domain rules. `rules` may be
/// empty (use the domain table or the heuristic engine), `"ra"` (alternate
/// readability) or a CSS selector.
///
/// Must not be called from within an async runtime.
pub fn fetch(
    website_url: &str,
    rules: &str,
    user_agent: &str,
    cookie: &str,
    allow_self_signed_certificates: bool,
    use_proxy: bool,
) -> Result<String, ScraperError> {
    let request = ExtractionRequest::new(website_url)
        .rules(rules)
        .user_agent(user_agent)
        .cookie(cookie)
        .allow_self_signed_certificates(allow_self_signed_certificates)
        .use_proxy(use_proxy);

    Scraper::new(Options::from_env()).scrape_blocking(&request)
}

impl Scraper {
    /// Run [`Scraper::scrape`] to completion on a local tokio runtime.
    pub fn scrape_blocking(&self, request: &ExtractionRequest) -> Result<String, ScraperError> {
        let rt = Runtime::new().map_err(|e| {
            ScraperError::fetch(
                &request.url,
                "ScrapeBlocking",
                Some(anyhow::anyhow!("Failed to create runtime: {}", e)),
            )
        })?;

        rt.block_on(self.scrape(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_rejects_invalid_url() {
        let err = fetch("not a url", "", "", "", false, false).unwrap_err();
        assert!(err.is_invalid_url());
        assert!(err.is_fetch());
    }

    #[test]
    fn test_fetch_rejects_unsupported_scheme() {
        let err = fetch("ftp://example.com/file", "", "", "", false, false).unwrap_err();
        assert!(err.is_invalid_url());
    }
}
