// ABOUTME: Extraction rules: the Rule variant, the ordered domain RuleTable and the builtin table loader.
// ABOUTME: Resolves a URL to the first table entry whose domain is a substring of the URL's host.

//! Domain rule resolution.
//!
//! A [`Rule`] is decided once per request, either from the caller's explicit
//! rule string or from a [`RuleTable`] lookup against the effective URL.
//!
//! The table is an ordered list and lookup is first-match-wins on substring
//! containment, so entry order is significant: when `example.com` is listed
//! before `sub.example.com`, the former wins for `sub.example.com` pages too.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Deserialize;

/// Explicit rule string that selects the alternate readability engine.
pub const ALTERNATE_READABILITY: &str = "ra";

/// Embedded JSON containing the builtin domain rules, in lookup order.
const BUILTIN_RULES_JSON: &str = include_str!("../../data/scraper_rules.json");

static BUILTIN_RULES: Lazy<Arc<RuleTable>> = Lazy::new(|| Arc::new(load_builtin_rules()));

/// The content-extraction strategy for a page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Rule {
    /// No rule: the heuristic readability engine is used.
    #[default]
    Unset,
    /// Concatenate the outer HTML of every node matching this CSS selector.
    Selector(String),
    /// Refetch the page and run the alternate readability engine on it.
    AlternateReadability,
}

impl Rule {
    /// Parse a rule string: empty is `Unset`, `"ra"` is `AlternateReadability`,
    /// anything else is kept verbatim as a CSS selector.
    pub fn parse(rules: &str) -> Self {
        match rules {
            "" => Rule::Unset,
            ALTERNATE_READABILITY => Rule::AlternateReadability,
            selector => Rule::Selector(selector.to_string()),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Rule::Unset)
    }
}

impl From<&str> for Rule {
    fn from(s: &str) -> Self {
        Rule::parse(s)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Unset => Ok(()),
            Rule::Selector(selector) => write!(f, "{}", selector),
            Rule::AlternateReadability => write!(f, "{}", ALTERNATE_READABILITY),
        }
    }
}

/// One entry of the JSON rule table.
#[derive(Debug, Deserialize)]
struct RuleEntry {
    domain: String,
    #[serde(default)]
    rules: String,
}

/// Ordered, read-only mapping from domain substring to rule.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuleTable {
    entries: Vec<(String, Rule)>,
}

impl RuleTable {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a table from a JSON array of `{"domain": ..., "rules": ...}` objects.
    ///
    /// Entry order in the array is the lookup order.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<RuleEntry> = serde_json::from_str(json)?;
        Ok(entries
            .into_iter()
            .map(|e| (e.domain, Rule::parse(&e.rules)))
            .collect())
    }

    /// Appends an entry; it is consulted after every entry already present.
    pub fn push(&mut self, domain: impl Into<String>, rule: impl Into<Rule>) {
        self.entries.push((domain.into().to_lowercase(), rule.into()));
    }

    /// Builder-style [`RuleTable::push`].
    pub fn with(mut self, domain: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.push(domain, rule);
        self
    }

    /// Returns the rule of the first entry whose domain is contained in `host`.
    pub fn lookup(&self, host: &str) -> Option<&Rule> {
        self.entries
            .iter()
            .find(|(domain, _)| host.contains(domain.as_str()))
            .map(|(_, rule)| rule)
    }

    /// Resolves the predefined rule for a URL, or `Rule::Unset` when no entry matches.
    pub fn resolve(&self, url: &str) -> Rule {
        self.lookup(&domain(url)).cloned().unwrap_or_default()
    }

    /// Iterates entries in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.entries.iter().map(|(d, r)| (d.as_str(), r))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D: Into<String>, R: Into<Rule>> FromIterator<(D, R)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (D, R)>>(iter: I) -> Self {
        let mut table = RuleTable::new();
        for (domain, rule) in iter {
            table.push(domain, rule);
        }
        table
    }
}

/// Returns the lower-cased host of a URL, without port.
///
/// A string that does not parse as an absolute URL is returned unchanged.
pub fn domain(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|h| h.to_lowercase())
            .unwrap_or_default(),
        Err(_) => url.to_string(),
    }
}

/// Loads the builtin rule table from embedded JSON.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed.
pub fn load_builtin_rules() -> RuleTable {
    RuleTable::from_json(BUILTIN_RULES_JSON).expect("failed to parse builtin scraper rules")
}

/// Returns the shared builtin rule table, parsed once per process.
pub fn builtin_rules() -> Arc<RuleTable> {
    Arc::clone(&BUILTIN_RULES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_rule_strings() {
        assert_eq!(Rule::parse(""), Rule::Unset);
        assert_eq!(Rule::parse("ra"), Rule::AlternateReadability);
        assert_eq!(
            Rule::parse(".article p"),
            Rule::Selector(".article p".to_string())
        );
        // Only the exact sentinel selects the alternate engine.
        assert_eq!(Rule::parse("RA"), Rule::Selector("RA".to_string()));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for s in ["", "ra", "div#comic"] {
            assert_eq!(Rule::parse(s).to_string(), s);
        }
    }

    #[test]
    fn domain_strips_port_and_lowercases() {
        assert_eq!(domain("https://WWW.Example.com:8443/a?b=c"), "www.example.com");
        assert_eq!(domain("http://127.0.0.1:8080/x"), "127.0.0.1");
        assert_eq!(domain("not a url"), "not a url");
    }

    #[test]
    fn resolve_matches_substring_of_host() {
        let table = RuleTable::new().with("example.com", "article");
        assert_eq!(
            table.resolve("https://blog.example.com/post"),
            Rule::Selector("article".to_string())
        );
        assert_eq!(table.resolve("https://example.org/post"), Rule::Unset);
    }

    #[test]
    fn resolve_ignores_path_and_query() {
        let table = RuleTable::new().with("example.com", "article");
        assert_eq!(
            table.resolve("https://other.org/example.com?ref=example.com"),
            Rule::Unset
        );
    }

    #[test]
    fn first_match_wins_in_entry_order() {
        let table = RuleTable::new()
            .with("example.com", ".generic")
            .with("sub.example.com", ".specific");
        assert_eq!(
            table.resolve("https://sub.example.com/a"),
            Rule::Selector(".generic".to_string())
        );

        let reversed = RuleTable::new()
            .with("sub.example.com", ".specific")
            .with("example.com", ".generic");
        assert_eq!(
            reversed.resolve("https://sub.example.com/a"),
            Rule::Selector(".specific".to_string())
        );
    }

    #[test]
    fn table_can_select_alternate_engine() {
        let table: RuleTable = vec![("news.test", "ra")].into_iter().collect();
        assert_eq!(
            table.resolve("https://news.test/story"),
            Rule::AlternateReadability
        );
    }

    #[test]
    fn from_json_keeps_order() {
        let table = RuleTable::from_json(
            r#"[{"domain": "b.test", "rules": ".b"}, {"domain": "a.test", "rules": ".a"}]"#,
        )
        .unwrap();
        let domains: Vec<&str> = table.iter().map(|(d, _)| d).collect();
        assert_eq!(domains, vec!["b.test", "a.test"]);
    }

    #[test]
    fn builtin_rules_load() {
        let table = load_builtin_rules();
        assert!(table.len() > 40, "expected over 40 rules, got {}", table.len());
        assert_eq!(
            table.resolve("https://github.com/blog/123"),
            Rule::Selector("article.entry-content".to_string())
        );
        assert_eq!(
            table.resolve("https://www.npr.org/2024/01/01/story"),
            Rule::Selector("#storytext".to_string())
        );
        assert_eq!(table.resolve("https://unknown.test/"), Rule::Unset);
    }

    #[test]
    fn builtin_rules_are_shared() {
        let a = builtin_rules();
        let b = builtin_rules();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
