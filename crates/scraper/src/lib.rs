// ABOUTME: Main library entry point for the Digests scraper.
// ABOUTME: Re-exports the public API: fetch, Scraper, ScraperBuilder, ExtractionRequest, Rule, RuleTable and errors.

//! Main-content extraction for web pages.
//!
//! A page is fetched, rejected unless it is HTML, decoded to UTF-8 and then
//! handed to one of three strategies chosen by a [`Rule`]: a CSS selector, the
//! heuristic readability engine, or the alternate readability engine, which
//! fetches the page a second time.
//!
//! # Example
//!
//! ```no_run
//! use digests_scraper::{ExtractionRequest, Scraper, ScraperError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ScraperError> {
//!     let scraper = Scraper::builder().build();
//!     let request = ExtractionRequest::new("https://example.com/article");
//!     let html = scraper.scrape(&request).await?;
//!     println!("{}", html);
//!     Ok(())
//! }
//! ```
//!
//! Blocking callers use [`fetch`]:
//!
//! ```no_run
//! let html = digests_scraper::fetch("https://example.com/article", "", "", "", false, false)?;
//! # Ok::<(), digests_scraper::ScraperError>(())
//! ```

pub mod client;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod options;
pub mod resource;
pub mod rules;
pub mod scrape_adapter;

pub use crate::client::Scraper;
pub use crate::error::{ErrorCode, ScraperError};
pub use crate::options::{ExtractionRequest, Options, ScraperBuilder};
pub use crate::rules::{builtin_rules, domain, Rule, RuleTable};
pub use crate::scrape_adapter::fetch;
