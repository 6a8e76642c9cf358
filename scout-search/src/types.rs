//! Core types for search results, engine identification and outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// Text returned to callers when a search cannot produce the requested record.
pub const NO_EVIDENCE: &str = "No evidence found, please change query.";

/// Minimum number of characters a record's `page` must carry to be kept.
pub const MIN_PAGE_CHARS: usize = 10;

/// A single organic result scraped from a search engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result.
    pub title: String,
    /// Destination URL with the engine's redirect wrapper removed.
    pub link: String,
    /// The href as it appeared on the results page, resolved to an absolute URL.
    pub raw_url: String,
    /// The engine's short snippet, possibly several fragments joined by `...`.
    pub description: String,
    /// Recovered source passage, or the best fallback text available.
    pub page: String,
}

impl SearchResult {
    /// Whether `page` carries enough text for the record to be served.
    pub fn has_usable_page(&self) -> bool {
        self.page.trim().chars().count() >= MIN_PAGE_CHARS
    }
}

/// Supported search engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchEngine {
    /// Google: two result layouts, snippet passage recovery.
    Google,
    /// Bing: single layout.
    Bing,
    /// DuckDuckGo HTML endpoint: single layout.
    DuckDuckGo,
}

impl SearchEngine {
    /// Returns the human-readable name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Bing => "Bing",
            Self::DuckDuckGo => "DuckDuckGo",
        }
    }

    /// Directory name of this engine's page cache scope.
    pub fn cache_dir(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Bing => "bing",
            Self::DuckDuckGo => "duckduckgo",
        }
    }

    /// Short description shown by `--show-summary`.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Google => {
                "The largest general-purpose engine. Results are served in two \
                 different page layouts; snippets are expanded into full source \
                 passages by locating them in the linked page."
            }
            Self::Bing => "Microsoft's engine, with an index independent from Google's.",
            Self::DuckDuckGo => {
                "Privacy-focused engine; the JavaScript-free HTML endpoint is scraped."
            }
        }
    }

    /// Look an engine up by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownEngine`] if no engine matches.
    pub fn from_name(name: &str) -> Result<Self, SearchError> {
        let wanted = name.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|engine| engine.cache_dir() == wanted)
            .ok_or_else(|| SearchError::UnknownEngine(name.to_owned()))
    }

    /// Returns all available engine variants.
    pub fn all() -> &'static [SearchEngine] {
        &[Self::Google, Self::Bing, Self::DuckDuckGo]
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which fields of a result the caller is interested in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    /// Title, link, description and recovered page.
    #[default]
    Full,
    /// Title only.
    Title,
    /// Description only.
    Description,
    /// Link only.
    Link,
}

impl ReturnType {
    /// Whether the title should be extracted.
    pub fn wants_title(self) -> bool {
        matches!(self, Self::Full | Self::Title)
    }

    /// Whether the link should be extracted.
    pub fn wants_link(self) -> bool {
        matches!(self, Self::Full | Self::Link)
    }

    /// Whether the description should be extracted.
    pub fn wants_description(self) -> bool {
        matches!(self, Self::Full | Self::Description)
    }
}

impl FromStr for ReturnType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "link" => Ok(Self::Link),
            other => Err(SearchError::InvalidInput(format!(
                "unknown return type `{other}` (expected full, title, description or link)"
            ))),
        }
    }
}

/// Parameters of one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    /// 1-based results page. Non-positive values are treated as 1.
    pub page: i32,
    /// 1-based rank of the record to return.
    pub topk: usize,
    /// Which fields to extract.
    pub return_type: ReturnType,
    /// Read fetched pages from the content cache.
    pub use_cache: bool,
    /// Read the ranked result list cache. Fresh lists are always written.
    pub use_result_cache: bool,
    /// How many times the whole search may be retried without the page cache.
    pub retry: u32,
    /// Restrict results to pages dated up to this year (Google `tbs` filter).
    pub end_year: Option<i32>,
    /// Engine-specific query parameters such as `hl` or `tbs`. Engines
    /// ignore keys they do not understand.
    pub extra_params: Vec<(String, String)>,
    /// Replacement search host, e.g. `google.de` or `https://www.google.de`.
    pub base_url: Option<String>,
}

impl SearchRequest {
    /// A request for the first record of the first page, with caching on.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            topk: 1,
            return_type: ReturnType::Full,
            use_cache: true,
            use_result_cache: true,
            retry: 1,
            end_year: None,
            extra_params: Vec::new(),
            base_url: None,
        }
    }

    /// Set the 1-based rank of the record to return.
    pub fn with_topk(mut self, topk: usize) -> Self {
        self.topk = topk;
        self
    }

    /// Set the results page.
    pub fn with_page(mut self, page: i32) -> Self {
        self.page = page;
        self
    }

    /// Set the fields to extract.
    pub fn with_return_type(mut self, return_type: ReturnType) -> Self {
        self.return_type = return_type;
        self
    }

    /// Bypass both the page cache and the result cache for reads.
    pub fn bypass_cache(mut self) -> Self {
        self.use_cache = false;
        self.use_result_cache = false;
        self
    }

    /// Set the retry budget.
    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    /// Add an engine-specific query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.push((key.into(), value.into()));
        self
    }

    /// The results page, coerced to at least 1.
    pub fn page_number(&self) -> u32 {
        u32::try_from(self.page).ok().filter(|p| *p > 0).unwrap_or(1)
    }

    /// Value of an extra parameter, if given.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.extra_params
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Result of a ranked search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The requested record.
    Found(SearchResult),
    /// No usable record could be produced, even after retrying.
    NoEvidence,
}

impl SearchOutcome {
    /// Returns the found record, if any.
    pub fn result(&self) -> Option<&SearchResult> {
        match self {
            Self::Found(result) => Some(result),
            Self::NoEvidence => None,
        }
    }

    /// The passage to show the user: the record's page, or the no-evidence text.
    pub fn page(&self) -> &str {
        match self {
            Self::Found(result) => &result.page,
            Self::NoEvidence => NO_EVIDENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(page: &str) -> SearchResult {
        SearchResult {
            title: "Example".into(),
            link: "https://example.com/".into(),
            raw_url: "https://www.google.com/url?q=https://example.com/".into(),
            description: "An example page".into(),
            page: page.into(),
        }
    }

    #[test]
    fn usable_page_requires_ten_chars() {
        assert!(sample("0123456789").has_usable_page());
        assert!(!sample("012345678").has_usable_page());
        assert!(!sample("   short   ").has_usable_page());
    }

    #[test]
    fn search_result_serde_preserves_every_field() {
        let result = sample("The full passage of the page.");
        let json = serde_json::to_string(&result).expect("serialize");
        let decoded: SearchResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, result);
    }

    #[test]
    fn engine_from_name_ignores_case() {
        assert_eq!(SearchEngine::from_name("Google").ok(), Some(SearchEngine::Google));
        assert_eq!(SearchEngine::from_name("BING").ok(), Some(SearchEngine::Bing));
        assert_eq!(
            SearchEngine::from_name(" duckduckgo ").ok(),
            Some(SearchEngine::DuckDuckGo)
        );
    }

    #[test]
    fn engine_from_unknown_name_is_user_error() {
        let err = SearchEngine::from_name("yahoo").unwrap_err();
        assert!(matches!(err, SearchError::UnknownEngine(ref name) if name == "yahoo"));
    }

    #[test]
    fn engine_display_and_cache_dir() {
        assert_eq!(SearchEngine::Google.to_string(), "Google");
        assert_eq!(SearchEngine::DuckDuckGo.cache_dir(), "duckduckgo");
        assert_eq!(SearchEngine::all().len(), 3);
    }

    #[test]
    fn return_type_parses_all_variants() {
        assert_eq!("full".parse::<ReturnType>().ok(), Some(ReturnType::Full));
        assert_eq!("Title".parse::<ReturnType>().ok(), Some(ReturnType::Title));
        assert_eq!(
            "description".parse::<ReturnType>().ok(),
            Some(ReturnType::Description)
        );
        assert_eq!("link".parse::<ReturnType>().ok(), Some(ReturnType::Link));
        assert!("page".parse::<ReturnType>().is_err());
    }

    #[test]
    fn return_type_field_selection() {
        assert!(ReturnType::Full.wants_title());
        assert!(ReturnType::Full.wants_link());
        assert!(ReturnType::Full.wants_description());
        assert!(!ReturnType::Title.wants_link());
        assert!(!ReturnType::Link.wants_description());
        assert!(!ReturnType::Description.wants_title());
    }

    #[test]
    fn request_defaults() {
        let request = SearchRequest::new("rust");
        assert_eq!(request.topk, 1);
        assert_eq!(request.retry, 1);
        assert!(request.use_cache);
        assert!(request.use_result_cache);
        assert_eq!(request.return_type, ReturnType::Full);
    }

    #[test]
    fn request_page_coerced_to_one() {
        assert_eq!(SearchRequest::new("q").with_page(0).page_number(), 1);
        assert_eq!(SearchRequest::new("q").with_page(-3).page_number(), 1);
        assert_eq!(SearchRequest::new("q").with_page(4).page_number(), 4);
    }

    #[test]
    fn request_bypass_disables_both_caches() {
        let request = SearchRequest::new("q").bypass_cache();
        assert!(!request.use_cache);
        assert!(!request.use_result_cache);
    }

    #[test]
    fn request_last_param_wins() {
        let request = SearchRequest::new("q")
            .with_param("hl", "en")
            .with_param("hl", "de");
        assert_eq!(request.param("hl"), Some("de"));
        assert_eq!(request.param("tbs"), None);
    }

    #[test]
    fn outcome_page_falls_back_to_sentinel() {
        assert_eq!(SearchOutcome::NoEvidence.page(), NO_EVIDENCE);
        assert!(SearchOutcome::NoEvidence.result().is_none());
        let found = SearchOutcome::Found(sample("A long enough page"));
        assert_eq!(found.page(), "A long enough page");
    }
}
