//! Search orchestrator: URL building, retrying passes, ranked-list caching.
//!
//! [`Searcher`] ties the pieces together for one engine: it builds the
//! search URL, fetches and parses the results page, enriches candidates
//! with recovered passages and selects the requested rank.

pub mod search;
pub mod search_url;

pub use search::Searcher;
