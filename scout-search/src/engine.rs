//! Trait definition for pluggable search engine backends.
//!
//! Extraction runs in two phases. [`ResultExtractor::extract`] walks a parsed
//! results page synchronously and produces owned [`Candidate`]s; the
//! orchestrator then enriches each candidate (passage recovery needs network
//! access) and turns it into a [`SearchResult`] with [`Candidate::finish`].
//! The parsed tree never crosses an await point.

use scraper::{ElementRef, Html};
use url::Url;

use crate::config::SearchConfig;
use crate::engines::{BingExtractor, DuckDuckGoExtractor, GoogleExtractor};
use crate::types::{ReturnType, SearchEngine, SearchRequest, SearchResult, MIN_PAGE_CHARS};

/// Which of an engine's result page layouts a node was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// The engine's main layout.
    Primary,
    /// A fallback layout, tried when the primary pattern matches nothing.
    Secondary,
}

/// One result block on a results page.
#[derive(Debug, Clone, Copy)]
pub struct ResultNode<'a> {
    /// Root element of the block.
    pub element: ElementRef<'a>,
    /// Layout the block was matched under.
    pub layout: Layout,
}

/// Why a result block did not become a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// Suggestions, "people also ask" boxes and similar.
    #[error("not an organic result")]
    NotOrganic,
    /// The block does not have the shape the layout expects.
    #[error("unexpected result structure: {0}")]
    Structure(&'static str),
    /// The link matches the site blocklist.
    #[error("blocked site: {0}")]
    Blocked(String),
    /// A field the return type asks for is empty.
    #[error("missing {0}")]
    MissingField(&'static str),
    /// The page text is under the minimum length.
    #[error("page shorter than {MIN_PAGE_CHARS} characters")]
    TooShort,
}

/// An owned record draft, before passage recovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Result title.
    pub title: String,
    /// Canonical destination URL.
    pub link: String,
    /// Href as found on the page, made absolute.
    pub raw_url: String,
    /// Snippet text.
    pub description: String,
    /// Text built from the result block itself, used when no passage is recovered.
    pub fallback_page: String,
    /// Whether the linked page should be fetched to recover a passage.
    pub needs_passage: bool,
}

impl Candidate {
    /// Turn the draft into a record.
    ///
    /// The page is the recovered passage if there is one, else the
    /// structural fallback, else the description.
    pub fn finish(self, passage: Option<String>) -> Result<SearchResult, Rejection> {
        let page = [passage.unwrap_or_default(), self.fallback_page]
            .into_iter()
            .map(|text| text.trim().to_owned())
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| self.description.trim().to_owned());

        let result = SearchResult {
            title: self.title,
            link: self.link,
            raw_url: self.raw_url,
            description: self.description,
            page,
        };
        if result.has_usable_page() {
            Ok(result)
        } else {
            Err(Rejection::TooShort)
        }
    }
}

/// A search engine scraper.
///
/// Implementors know how to build a search URL for a [`SearchRequest`] and
/// how to turn the engine's results page into [`Candidate`]s. Fetching,
/// caching, retrying and passage recovery are shared and live elsewhere.
///
/// All implementations must be `Send + Sync` so one extractor can serve
/// concurrent searches.
pub trait ResultExtractor: Send + Sync {
    /// Returns which [`SearchEngine`] variant this implementation represents.
    fn engine_type(&self) -> SearchEngine;

    /// Hosts to rotate through when the configuration names none.
    fn default_domains(&self) -> &'static [&'static str];

    /// Path of the search endpoint, relative to the host.
    fn search_path(&self) -> &'static str {
        "search"
    }

    /// Base that relative result hrefs are resolved against.
    fn base_url(&self) -> &'static str;

    /// Query-string parameters for `request`.
    fn params(&self, request: &SearchRequest) -> Vec<(String, String)>;

    /// Locate the result blocks of a results page.
    fn parse_soup<'a>(&self, document: &'a Html) -> Vec<ResultNode<'a>>;

    /// Extract a draft record from one result block.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when the block is not a usable organic result.
    fn parse_single_result(
        &self,
        node: &ResultNode<'_>,
        return_type: ReturnType,
        base: &Url,
    ) -> Result<Candidate, Rejection>;

    /// Parse a results page into candidates.
    ///
    /// Candidates missing a field `return_type` asks for, or linking to a
    /// blocklisted site, are logged and skipped. `base` overrides
    /// [`ResultExtractor::base_url`] when the search went to a different host.
    fn extract(
        &self,
        html: &str,
        return_type: ReturnType,
        base: Option<&Url>,
        config: &SearchConfig,
    ) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let nodes = self.parse_soup(&document);
        if nodes.is_empty() {
            tracing::warn!(engine = %self.engine_type(), "engine failure: no result blocks on page");
            return Vec::new();
        }

        let default_base = match base {
            Some(base) => base.clone(),
            None => match Url::parse(self.base_url()) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(engine = %self.engine_type(), "bad base url: {e}");
                    return Vec::new();
                }
            },
        };

        nodes
            .iter()
            .filter_map(|node| {
                let checked = self
                    .parse_single_result(node, return_type, &default_base)
                    .and_then(|candidate| {
                        require_fields(&candidate, return_type)?;
                        if config.is_blocked_site(&candidate.link) {
                            Err(Rejection::Blocked(candidate.link))
                        } else {
                            Ok(candidate)
                        }
                    });
                match checked {
                    Ok(candidate) => Some(candidate),
                    Err(rejection) => {
                        tracing::debug!(engine = %self.engine_type(), %rejection, "result dropped");
                        None
                    }
                }
            })
            .collect()
    }
}

/// Require the fields `return_type` asks for.
///
/// # Errors
///
/// [`Rejection::MissingField`] naming the first empty field.
pub fn require_fields(candidate: &Candidate, return_type: ReturnType) -> Result<(), Rejection> {
    if return_type.wants_title() && candidate.title.trim().is_empty() {
        return Err(Rejection::MissingField("title"));
    }
    if return_type.wants_link() && candidate.link.trim().is_empty() {
        return Err(Rejection::MissingField("link"));
    }
    Ok(())
}

/// The extractor for `engine`.
pub fn extractor_for(engine: SearchEngine) -> Box<dyn ResultExtractor> {
    match engine {
        SearchEngine::Google => Box::new(GoogleExtractor),
        SearchEngine::Bing => Box::new(BingExtractor),
        SearchEngine::DuckDuckGo => Box::new(DuckDuckGoExtractor),
    }
}
