// ABOUTME: Resource handling module for fetching web pages.
// ABOUTME: Handles per-request HTTP clients, body-size limits, server failures and the HTML content-type gate.

pub mod encoding;

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, COOKIE};

use crate::error::ScraperError;
use crate::options::{DEFAULT_MAX_BODY_SIZE, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

/// Options for fetching a resource.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub cookie: String,
    pub headers: HashMap<String, String>,
    pub proxy_url: Option<String>,
    pub allow_self_signed_certificates: bool,
    pub timeout: Duration,
    pub max_body_size: usize,
    pub allow_server_failure: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cookie: String::new(),
            headers: HashMap::new(),
            proxy_url: None,
            allow_self_signed_certificates: false,
            timeout: DEFAULT_TIMEOUT,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            allow_server_failure: false,
        }
    }
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub effective_url: String,
    pub content_type: String,
    pub body: Bytes,
}

impl FetchResult {
    /// Returns true when the server answered with an error status.
    pub fn has_server_failure(&self) -> bool {
        self.status >= 400
    }

    /// Returns true when the response is an HTML or XHTML document.
    pub fn is_html(&self) -> bool {
        is_html_content_type(&self.content_type)
    }

    /// Decode the body to UTF-8 text.
    pub fn ensure_unicode_body(&self) -> Result<String, ScraperError> {
        let ct = Some(self.content_type.as_str()).filter(|ct| !ct.is_empty());
        let decoded = encoding::decode_body(&self.body, ct).map_err(|e| {
            ScraperError::encoding(&self.effective_url, "EnsureUnicodeBody", Some(e.into()))
        })?;
        if decoded.had_errors {
            tracing::debug!(
                url = %self.effective_url,
                encoding = decoded.encoding.name(),
                "body contained malformed sequences"
            );
        }
        Ok(decoded.text)
    }
}

/// Returns true if the content type denotes an HTML document.
///
/// Case-insensitive prefix test against `text/html` and `application/xhtml+xml`.
pub fn is_html_content_type(content_type: &str) -> bool {
    let lower = content_type.to_lowercase();
    lower.starts_with("text/html") || lower.starts_with("application/xhtml+xml")
}

fn build_client(opts: &FetchOptions) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .user_agent(&opts.user_agent)
        .timeout(opts.timeout)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .danger_accept_invalid_certs(opts.allow_self_signed_certificates);

    builder = match &opts.proxy_url {
        Some(proxy_url) => builder.proxy(reqwest::Proxy::all(proxy_url)?),
        None => builder.no_proxy(),
    };

    builder.build()
}

/// Fetch a resource from the given URL.
///
/// Redirects are followed; `effective_url` is the URL the response came from.
pub async fn fetch(url: &str, opts: &FetchOptions) -> Result<FetchResult, ScraperError> {
    if url.is_empty() {
        return Err(ScraperError::invalid_url(url, "Fetch", None));
    }

    let parsed_url = url::Url::parse(url).map_err(|e| {
        ScraperError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    let scheme = parsed_url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ScraperError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    let client = build_client(opts).map_err(|e| {
        ScraperError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
        )
    })?;

    let mut request = client.get(parsed_url);
    if !opts.cookie.is_empty() {
        request = request.header(COOKIE, &opts.cookie);
    }
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let response = request.send().await.map_err(|e| {
        let reason = if e.is_timeout() {
            anyhow::anyhow!("request timed out: {}", e)
        } else {
            anyhow::anyhow!("request failed: {}", e)
        };
        ScraperError::fetch(url, "Fetch", Some(reason))
    })?;

    if let Some(len) = response.content_length() {
        if len > opts.max_body_size as u64 {
            return Err(ScraperError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    // Capture response metadata before consuming the response
    let status = response.status().as_u16();
    let effective_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let body = response.bytes().await.map_err(|e| {
        ScraperError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    if body.len() > opts.max_body_size {
        return Err(ScraperError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    let result = FetchResult {
        status,
        url: url.to_string(),
        effective_url,
        content_type,
        body,
    };

    if result.has_server_failure() && !opts.allow_server_failure {
        return Err(ScraperError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    Ok(result)
}
