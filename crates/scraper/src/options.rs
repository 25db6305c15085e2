// ABOUTME: Configuration for the scraper: Options, ScraperBuilder and the per-call ExtractionRequest.
// ABOUTME: Options can be built fluently or read from the HTTP_CLIENT_* environment variables.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::client::Scraper;
use crate::rules::RuleTable;

/// Default timeout of the primary fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Fixed timeout of the second fetch made for the alternate readability engine.
pub const DEFAULT_ALTERNATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Default maximum body size (15 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 15 * 1024 * 1024;

/// User agent sent when the request does not supply one.
pub const DEFAULT_USER_AGENT: &str = "DigestsScraper/1.0";

/// Process-level configuration of the scraper.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub alternate_timeout: Duration,
    pub user_agent: String,
    pub proxy_url: Option<String>,
    pub max_body_size: usize,
    pub headers: HashMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            alternate_timeout: DEFAULT_ALTERNATE_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy_url: None,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            headers: HashMap::new(),
        }
    }
}

impl Options {
    /// Build options from the environment.
    ///
    /// Reads `HTTP_CLIENT_TIMEOUT` (seconds), `HTTP_CLIENT_MAX_BODY_SIZE` (MiB),
    /// `HTTP_CLIENT_PROXY` and `HTTP_CLIENT_USER_AGENT`. Missing or unparseable
    /// values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(secs) = lookup("HTTP_CLIENT_TIMEOUT").and_then(|v| v.trim().parse::<u64>().ok())
        {
            if secs > 0 {
                opts.timeout = Duration::from_secs(secs);
            }
        }

        if let Some(mib) =
            lookup("HTTP_CLIENT_MAX_BODY_SIZE").and_then(|v| v.trim().parse::<usize>().ok())
        {
            if mib > 0 {
                opts.max_body_size = mib * 1024 * 1024;
            }
        }

        if let Some(proxy) = lookup("HTTP_CLIENT_PROXY") {
            let proxy = proxy.trim();
            if !proxy.is_empty() {
                opts.proxy_url = Some(proxy.to_string());
            }
        }

        if let Some(ua) = lookup("HTTP_CLIENT_USER_AGENT") {
            let ua = ua.trim();
            if !ua.is_empty() {
                opts.user_agent = ua.to_string();
            }
        }

        opts
    }
}

/// Builder for constructing Scraper instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ScraperBuilder {
    opts: Options,
    rules: Option<Arc<RuleTable>>,
}

impl ScraperBuilder {
    /// Create a new ScraperBuilder with default options and the builtin rule table.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
            rules: None,
        }
    }

    /// Start from an existing set of options.
    pub fn options(mut self, opts: Options) -> Self {
        self.opts = opts;
        self
    }

    /// Set the primary fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the timeout of the alternate readability fetch.
    pub fn alternate_timeout(mut self, timeout: Duration) -> Self {
        self.opts.alternate_timeout = timeout;
        self
    }

    /// Set the fallback User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the proxy used by requests that opt in with `use_proxy`.
    pub fn proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.opts.proxy_url = Some(proxy_url.into());
        self
    }

    /// Set the maximum accepted body size in bytes.
    pub fn max_body_size(mut self, max: usize) -> Self {
        self.opts.max_body_size = max;
        self
    }

    /// Add a custom header to all primary requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom domain rule table instead of the builtin one.
    pub fn rules(mut self, rules: impl Into<Arc<RuleTable>>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Build the Scraper with the configured options.
    pub fn build(self) -> Scraper {
        match self.rules {
            Some(rules) => Scraper::with_rules(self.opts, rules),
            None => Scraper::new(self.opts),
        }
    }
}

impl Default for ScraperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of a single extraction call.
///
/// An empty `rules` string means "no explicit rule"; an empty `user_agent` falls
/// back to the configured default and an empty `cookie` sends no Cookie header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub url: String,
    pub rules: String,
    pub user_agent: String,
    pub cookie: String,
    pub allow_self_signed_certificates: bool,
    pub use_proxy: bool,
}

impl ExtractionRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = rules.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = cookie.into();
        self
    }

    pub fn allow_self_signed_certificates(mut self, allow: bool) -> Self {
        self.allow_self_signed_certificates = allow;
        self
    }

    pub fn use_proxy(mut self, use_proxy: bool) -> Self {
        self.use_proxy = use_proxy;
        self
    }
}
