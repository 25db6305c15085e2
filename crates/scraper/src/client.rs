// ABOUTME: The Scraper that fetches a page and extracts its main content.
// ABOUTME: Gates on content type, normalizes encoding, resolves the rule on the effective URL and dispatches.

use std::sync::Arc;

use url::Url;

use crate::error::ScraperError;
use crate::extractors::alternate::extract_alternate;
use crate::extractors::content::extract_content;
use crate::extractors::select::select_outer_html;
use crate::options::{ExtractionRequest, Options, ScraperBuilder};
use crate::resource::{fetch, FetchOptions};
use crate::rules::{builtin_rules, Rule, RuleTable};

/// Extracts the main content of web pages.
///
/// A `Scraper` is immutable once built and can be shared between tasks; each
/// call to [`Scraper::scrape`] is independent.
#[derive(Debug, Clone)]
pub struct Scraper {
    opts: Options,
    rules: Arc<RuleTable>,
}

impl Scraper {
    /// Create a new ScraperBuilder for configuring a Scraper.
    pub fn builder() -> ScraperBuilder {
        ScraperBuilder::new()
    }

    /// Create a Scraper using the builtin domain rules.
    pub fn new(opts: Options) -> Self {
        Self::with_rules(opts, builtin_rules())
    }

    /// Create a Scraper with a caller supplied rule table.
    pub fn with_rules(opts: Options, rules: Arc<RuleTable>) -> Self {
        Self { opts, rules }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Pick the extraction rule: the explicit one when given, else the first
    /// table entry whose domain occurs in the URL's host, else `Rule::Unset`.
    pub fn resolve_rule(&self, explicit: &str, effective_url: &str) -> Rule {
        let rule = Rule::parse(explicit);
        if !rule.is_unset() {
            return rule;
        }
        self.rules.resolve(effective_url)
    }

    /// Fetch `request.url` and return its main content as HTML.
    pub async fn scrape(&self, request: &ExtractionRequest) -> Result<String, ScraperError> {
        let fetch_opts = self.fetch_options(request);
        let response = fetch(&request.url, &fetch_opts).await.map_err(|e| {
            tracing::debug!(url = %request.url, error = %e, "primary fetch failed");
            e
        })?;

        if !response.is_html() {
            tracing::debug!(
                url = %response.effective_url,
                content_type = %response.content_type,
                "refusing to scrape a non-HTML document"
            );
            return Err(ScraperError::unsupported_content_type(
                &response.effective_url,
                "Scrape",
                &response.content_type,
            ));
        }

        let body = response.ensure_unicode_body()?;

        // Rules and the alternate engine follow the page we landed on
        let page_url = response.effective_url.as_str();
        let rule = self.resolve_rule(&request.rules, page_url);
        tracing::debug!(url = %page_url, rule = %rule, "extracting content");

        match rule {
            Rule::Selector(css) => Ok(select_outer_html(&body, &css)),
            Rule::AlternateReadability => self.readability_content(page_url).await,
            Rule::Unset => Ok(extract_content(&body)),
        }
    }

    fn fetch_options(&self, request: &ExtractionRequest) -> FetchOptions {
        let user_agent = if request.user_agent.is_empty() {
            self.opts.user_agent.clone()
        } else {
            request.user_agent.clone()
        };

        FetchOptions {
            user_agent,
            cookie: request.cookie.clone(),
            headers: self.opts.headers.clone(),
            proxy_url: self.opts.proxy_url.clone().filter(|_| request.use_proxy),
            allow_self_signed_certificates: request.allow_self_signed_certificates,
            timeout: self.opts.timeout,
            max_body_size: self.opts.max_body_size,
            allow_server_failure: false,
        }
    }

    /// Run the alternate engine on a second fetch of `page_url`.
    ///
    /// Every failure on this path is reported as the same opaque error.
    async fn readability_content(&self, page_url: &str) -> Result<String, ScraperError> {
        self.fetch_alternate(page_url).await.map_err(|e| {
            tracing::debug!(url = %page_url, error = %e, "alternate readability failed");
            ScraperError::scrape(page_url, "ReadabilityContent")
        })
    }

    async fn fetch_alternate(&self, page_url: &str) -> anyhow::Result<String> {
        let base_url = Url::parse(page_url)?;
        let opts = FetchOptions {
            user_agent: self.opts.user_agent.clone(),
            allow_self_signed_certificates: true,
            timeout: self.opts.alternate_timeout,
            max_body_size: self.opts.max_body_size,
            allow_server_failure: true,
            ..Default::default()
        };
        let response = fetch(page_url, &opts).await?;
        extract_alternate(&response.body, &base_url)
    }
}

impl Default for Scraper {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
