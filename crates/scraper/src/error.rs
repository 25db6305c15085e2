// ABOUTME: Error types for the scraper including the ErrorCode enum and ScraperError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the different stages an extraction can fail in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The request URL could not be fetched at all. A kind of fetch failure:
    /// [`ScraperError::is_fetch`] is true for it too.
    InvalidUrl,
    Fetch,
    UnsupportedContentType,
    Encoding,
    Scrape,
    Parse,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "unable to download web page",
            ErrorCode::UnsupportedContentType => "this resource is not a HTML document",
            ErrorCode::Encoding => "unable to normalize text encoding",
            ErrorCode::Scrape => "unable to extract content",
            ErrorCode::Parse => "parse error",
        };
        write!(f, "{}", s)
    }
}

/// The error returned by every extraction operation.
#[derive(Debug, thiserror::Error)]
pub struct ScraperError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
    content_type: Option<String>,
}

impl fmt::Display for ScraperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scraper: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref ct) = self.content_type {
            write!(f, " ({})", ct)?;
        }
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScraperError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
            content_type: None,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, url, op, source)
    }

    /// Create an UnsupportedContentType error carrying the offending content type.
    pub fn unsupported_content_type(
        url: impl Into<String>,
        op: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            content_type: Some(content_type.into()),
            ..Self::new(ErrorCode::UnsupportedContentType, url, op, None)
        }
    }

    /// Create an Encoding error.
    pub fn encoding(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Encoding, url, op, source)
    }

    /// Create the opaque Scrape error used by the alternate readability path.
    ///
    /// It never carries a source: whatever went wrong on that path is reported the same way.
    pub fn scrape(url: impl Into<String>, op: impl Into<String>) -> Self {
        Self::new(ErrorCode::Scrape, url, op, None)
    }

    /// Create a Parse error.
    pub fn parse(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Parse, url, op, source)
    }

    /// The rejected content type, for UnsupportedContentType errors.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if the primary fetch failed, including for an invalid URL.
    pub fn is_fetch(&self) -> bool {
        matches!(self.code, ErrorCode::Fetch | ErrorCode::InvalidUrl)
    }

    /// Returns true if this is an UnsupportedContentType error.
    pub fn is_unsupported_content_type(&self) -> bool {
        self.code == ErrorCode::UnsupportedContentType
    }

    /// Returns true if this is an Encoding error.
    pub fn is_encoding(&self) -> bool {
        self.code == ErrorCode::Encoding
    }

    /// Returns true if this is a Scrape error.
    pub fn is_scrape(&self) -> bool {
        self.code == ErrorCode::Scrape
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        self.code == ErrorCode::Parse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_url_and_source() {
        let err = ScraperError::fetch(
            "https://example.com/a",
            "Fetch",
            Some(anyhow::anyhow!("HTTP status 500")),
        );
        assert_eq!(
            err.to_string(),
            "scraper: Fetch https://example.com/a: unable to download web page: HTTP status 500"
        );
        assert!(err.is_fetch());
    }

    #[test]
    fn invalid_url_is_a_fetch_failure() {
        let err = ScraperError::invalid_url("ftp://example.com/f", "Fetch", None);
        assert!(err.is_invalid_url());
        assert!(err.is_fetch());
        assert!(!ScraperError::scrape("https://example.com/", "ReadabilityContent").is_fetch());
    }

    #[test]
    fn unsupported_content_type_reports_offending_type() {
        let err = ScraperError::unsupported_content_type("https://example.com/x.png", "Scrape", "image/png");
        assert!(err.is_unsupported_content_type());
        assert_eq!(err.content_type(), Some("image/png"));
        assert!(err.to_string().contains("(image/png)"));
    }

    #[test]
    fn scrape_error_is_opaque() {
        let err = ScraperError::scrape("not a url", "ReadabilityContent");
        assert!(err.is_scrape());
        assert!(err.source.is_none());
        assert_eq!(
            err.to_string(),
            "scraper: ReadabilityContent not a url: unable to extract content"
        );
    }
}
