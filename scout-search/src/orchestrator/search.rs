//! Ranked search: query cache, fetch, extract, enrich, select, persist.
//!
//! A [`Searcher`] serves one engine. Each call to [`Searcher::search`] runs
//! the pipeline below, retrying the whole pass without the page cache when
//! it cannot produce the requested record.
//!
//! # Pipeline
//!
//! 1. Serve the record from the ranked-list cache if it is there and usable
//! 2. Build a search URL on a randomly drawn host
//! 3. Fetch the results page (page cache allowed on the first pass only)
//! 4. Extract candidates synchronously from the parsed page
//! 5. Enrich candidates one by one until `topk` records survive
//! 6. Return the `topk`-th record and persist the list, or retry
//! 7. After `retry + 1` passes, give up with [`SearchOutcome::NoEvidence`]

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use url::Url;

use super::search_url::{domain_pool, override_root, search_root, search_url};
use crate::cache::{CacheScope, ContentCache};
use crate::config::SearchConfig;
use crate::engine::{extractor_for, ResultExtractor};
use crate::error::{Result, SearchError};
use crate::http::{seeded_rng, PageFetcher};
use crate::passage::PassageRecovery;
use crate::types::{SearchEngine, SearchOutcome, SearchRequest, SearchResult};

/// Runs searches against one engine.
///
/// `Searcher` is `Send + Sync`; share it behind an `Arc` to serve
/// concurrent queries. The on-disk cache may also be shared between
/// processes.
pub struct Searcher {
    config: SearchConfig,
    extractor: Box<dyn ResultExtractor>,
    fetcher: Arc<PageFetcher>,
    recovery: PassageRecovery,
    cache: ContentCache,
    rng: Mutex<StdRng>,
}

impl Searcher {
    /// Build a searcher for `engine`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(engine: SearchEngine, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = Arc::new(PageFetcher::new(&config, engine)?);
        Ok(Self {
            extractor: extractor_for(engine),
            recovery: PassageRecovery::new(Arc::clone(&fetcher), config.max_page_chars),
            cache: ContentCache::new(config.cache_root.clone()),
            rng: Mutex::new(seeded_rng(config.seed.map(|seed| seed.rotate_left(32)))),
            fetcher,
            config,
        })
    }

    /// Build a searcher for the engine called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownEngine`] if no engine has that name,
    /// otherwise as [`Searcher::new`].
    pub fn for_engine_name(name: &str, config: SearchConfig) -> Result<Self> {
        Self::new(SearchEngine::from_name(name)?, config)
    }

    /// The engine this searcher scrapes.
    pub fn engine(&self) -> SearchEngine {
        self.extractor.engine_type()
    }

    /// The configuration this searcher was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search URL for `request` on a host drawn from the domain pool, or on
    /// the request's host override.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the blocklist empties the domain
    /// pool, or [`SearchError::InvalidInput`] for a malformed override.
    pub fn build_url(&self, request: &SearchRequest) -> Result<Url> {
        let scheme = self.config.search_scheme.as_str();
        let root = match request.base_url.as_deref() {
            Some(base) => override_root(scheme, base)?,
            None => {
                let pool = domain_pool(
                    &self.config.domains,
                    self.extractor.default_domains(),
                    &self.config.blocked_domains,
                );
                let host = {
                    let mut rng = match self.rng.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    pool.choose(&mut *rng).copied()
                };
                let host = host.ok_or_else(|| {
                    SearchError::Config(format!(
                        "no {} search hosts left after applying the domain blocklist",
                        self.engine()
                    ))
                })?;
                search_root(scheme, host)?
            }
        };
        search_url(&root, self.extractor.search_path(), &self.extractor.params(request))
    }

    /// Return the `request.topk`-th result for the query.
    ///
    /// Failing to find enough usable results is not an error: after
    /// `request.retry + 1` passes the outcome is [`SearchOutcome::NoEvidence`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] for an empty query or a zero
    /// `topk`, and propagates URL construction errors.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        validate(request)?;
        if request.topk == 0 {
            return Err(SearchError::InvalidInput("topk must be at least 1".into()));
        }
        let rank = request.topk - 1;

        if request.use_result_cache {
            if let Some(cached) = self.cached_record(request, rank).await {
                return Ok(SearchOutcome::Found(cached));
            }
        }

        let passes = request.retry.saturating_add(1);
        let mut use_page_cache = request.use_cache;
        for pass in 1..=passes {
            let url = self.build_url(request)?;
            tracing::trace!(query = %request.query, %url, pass, "searching");

            let results = self.run_pass(request, &url, use_page_cache, Some(request.topk)).await;
            if let Some(found) = results.get(rank).filter(|r| r.has_usable_page()).cloned() {
                if let Err(e) = self.cache.put(CacheScope::Pages, &request.query, &results).await {
                    tracing::warn!(error = %e, "failed to cache ranked results");
                }
                return Ok(SearchOutcome::Found(found));
            }

            tracing::warn!(
                engine = %self.engine(),
                pass,
                passes,
                found = results.len(),
                wanted = request.topk,
                "not enough usable results"
            );
            use_page_cache = false;
        }

        Ok(SearchOutcome::NoEvidence)
    }

    /// Every usable result of one pass over the results page, in rank order.
    ///
    /// The ranked-list cache is neither read nor written.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] for an empty query, and
    /// propagates URL construction errors.
    pub async fn results(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        validate(request)?;
        let url = self.build_url(request)?;
        tracing::trace!(query = %request.query, %url, "listing results");
        Ok(self.run_pass(request, &url, request.use_cache, None).await)
    }

    /// Delete this engine's cached pages, or every cache entry when `all`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Cache`] if a cache directory cannot be removed.
    pub async fn clear_cache(&self, all: bool) -> Result<()> {
        let scope = if all {
            CacheScope::All
        } else {
            CacheScope::Engine(self.engine())
        };
        self.cache.clear(scope).await
    }

    async fn cached_record(&self, request: &SearchRequest, rank: usize) -> Option<SearchResult> {
        let list: Vec<SearchResult> = self.cache.get(CacheScope::Pages, &request.query).await?;
        let record = list.into_iter().nth(rank).filter(SearchResult::has_usable_page)?;
        tracing::debug!(engine = %self.engine(), rank, "serving ranked result from cache");
        Some(record)
    }

    /// Fetch, extract and enrich one results page. Stops once `limit`
    /// records have survived.
    async fn run_pass(
        &self,
        request: &SearchRequest,
        url: &Url,
        use_page_cache: bool,
        limit: Option<usize>,
    ) -> Vec<SearchResult> {
        let fetched = self.fetcher.fetch(url.as_str(), use_page_cache).await;
        if fetched.is_empty() {
            tracing::warn!(engine = %self.engine(), "results page unavailable");
            return Vec::new();
        }
        tracing::trace!(bytes = fetched.html.len(), cache_hit = fetched.cache_hit, "results page received");

        // Links are resolved against the override host when one was given.
        let base = request.base_url.as_ref().and_then(|_| url.join("/").ok());
        let candidates = self.extractor.extract(
            &fetched.html,
            request.return_type,
            base.as_ref(),
            &self.config,
        );

        let mut results = Vec::new();
        for candidate in candidates {
            if limit.is_some_and(|limit| results.len() >= limit) {
                break;
            }

            let passage = if candidate.needs_passage {
                match self
                    .recovery
                    .recover_passage(&candidate.link, &candidate.description)
                    .await
                {
                    Ok(passage) => Some(passage),
                    Err(miss) => {
                        tracing::debug!(link = %candidate.link, ?miss, "no passage recovered");
                        None
                    }
                }
            } else {
                None
            };

            match candidate.finish(passage) {
                Ok(result) => results.push(result),
                Err(rejection) => tracing::debug!(%rejection, "result dropped"),
            }
        }
        results
    }
}

fn validate(request: &SearchRequest) -> Result<()> {
    if request.query.trim().is_empty() {
        return Err(SearchError::InvalidInput("query must not be empty".into()));
    }
    Ok(())
}
