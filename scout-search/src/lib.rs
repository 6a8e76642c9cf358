//! # scout-search
//!
//! Web search scraping with source-passage recovery.
//!
//! This crate scrapes public search engines directly: no API keys, no
//! external services. For each query it returns the title, link and snippet
//! of a ranked result, and for Google it goes further: it fetches the linked
//! page and locates the passage the snippet was cut from, so callers get a
//! few full sentences of evidence instead of a truncated fragment.
//!
//! ## Design
//!
//! - Scrapes Google (two page layouts), Bing and DuckDuckGo with CSS selectors
//! - On-disk, content-addressed cache for pages and ranked result lists
//! - User-Agent and search-host rotation, bounded retry with linear backoff
//! - Snippet fragments are located with approximate (edit-distance) matching
//!   and extended to sentence boundaries
//! - Expected failures (a dead link, an unmatched snippet, a rejected result)
//!   are values, not errors; the caller sees fewer results or
//!   [`SearchOutcome::NoEvidence`]
//!
//! ## Security
//!
//! - No API keys or secrets to leak
//! - No network listeners; this is a library, not a server
//! - Search queries are logged only at trace level

pub mod cache;
pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod passage;
pub mod types;

pub use cache::{CacheScope, ContentCache};
pub use config::{ProxyConfig, SearchConfig};
pub use engine::{Candidate, Rejection, ResultExtractor};
pub use error::{Result, SearchError};
pub use orchestrator::Searcher;
pub use passage::{PassageMiss, PassageRecovery};
pub use types::{
    ReturnType, SearchEngine, SearchOutcome, SearchRequest, SearchResult, NO_EVIDENCE,
};

/// Return the `request.topk`-th result for a query on the named engine.
///
/// Builds a one-off [`Searcher`]; keep a `Searcher` around instead when
/// running many queries.
///
/// # Errors
///
/// Returns [`SearchError::UnknownEngine`] if `engine` names no engine,
/// [`SearchError::Config`] for an invalid configuration, and
/// [`SearchError::InvalidInput`] for an empty query or zero `topk`.
/// Running out of results is not an error; see [`SearchOutcome::NoEvidence`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> scout_search::Result<()> {
/// let request = scout_search::SearchRequest::new("who designed the rust language");
/// let config = scout_search::SearchConfig::default();
/// let outcome = scout_search::search("google", &request, config).await?;
/// println!("{}", outcome.page());
/// # Ok(())
/// # }
/// ```
pub async fn search(engine: &str, request: &SearchRequest, config: SearchConfig) -> Result<SearchOutcome> {
    Searcher::for_engine_name(engine, config)?.search(request).await
}

/// Search Google with the default configuration and return the passage
/// for the top result, or [`NO_EVIDENCE`].
///
/// # Errors
///
/// Same as [`search`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> scout_search::Result<()> {
/// let passage = scout_search::search_default("boiling point of water at altitude").await?;
/// println!("{passage}");
/// # Ok(())
/// # }
/// ```
pub async fn search_default(query: &str) -> Result<String> {
    let outcome = search("google", &SearchRequest::new(query), SearchConfig::default()).await?;
    Ok(outcome.page().to_owned())
}
