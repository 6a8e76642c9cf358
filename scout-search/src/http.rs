//! Cache-aware page fetching with User-Agent rotation and bounded retry.
//!
//! [`PageFetcher`] owns a configured [`reqwest::Client`] and the content
//! cache. A fetch consults the cache first (unless bypassed), then tries the
//! network up to `max_attempts` times with a linearly growing pause between
//! attempts. Transport failures never escape: exhausting every attempt
//! yields an empty [`Fetched`] that callers treat as a hard miss for that URL.

use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use reqwest::header::{CACHE_CONTROL, CONNECTION, USER_AGENT};

use crate::cache::{CacheScope, ContentCache};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::SearchEngine;

/// Why a single network attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    /// Connection, TLS, timeout or redirect failure.
    #[error("request failed: {0}")]
    Request(String),
    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),
    /// The body could not be read.
    #[error("response read failed: {0}")]
    Body(String),
    /// The server answered with an empty body.
    #[error("empty response body")]
    Empty,
}

/// HTML returned by [`PageFetcher::fetch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fetched {
    /// Page source. Empty when every attempt failed.
    pub html: String,
    /// Whether the page came from the content cache.
    pub cache_hit: bool,
}

impl Fetched {
    /// Whether nothing could be retrieved.
    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// Fetches pages on behalf of one engine, caching them under its scope.
pub struct PageFetcher {
    client: reqwest::Client,
    cache: ContentCache,
    scope: CacheScope,
    user_agents: Vec<String>,
    max_attempts: u32,
    backoff: Duration,
    rng: Mutex<StdRng>,
}

impl PageFetcher {
    /// Build a fetcher for `engine` from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the client or proxy cannot be built.
    pub fn new(config: &SearchConfig, engine: SearchEngine) -> Result<Self, SearchError> {
        Ok(Self {
            client: build_client(config)?,
            cache: ContentCache::new(config.cache_root.clone()),
            scope: CacheScope::Engine(engine),
            user_agents: config.user_agents.clone(),
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.backoff_millis),
            rng: Mutex::new(seeded_rng(config.seed)),
        })
    }

    /// Return the HTML of `url`, from the cache when allowed, else the network.
    ///
    /// A network result always overwrites the cached entry, even when the
    /// cache was bypassed for the read.
    pub async fn fetch(&self, url: &str, use_cache: bool) -> Fetched {
        if use_cache {
            if let Some(html) = self.cache.get::<String>(self.scope, url).await {
                if !html.is_empty() {
                    return Fetched {
                        html,
                        cache_hit: true,
                    };
                }
            }
        }

        for attempt in 1..=self.max_attempts {
            match self.attempt(url).await {
                Ok(html) => {
                    tracing::trace!(bytes = html.len(), attempt, "page received");
                    if let Err(e) = self.cache.put(self.scope, url, &html).await {
                        tracing::warn!(error = %e, "failed to cache page");
                    }
                    return Fetched {
                        html,
                        cache_hit: false,
                    };
                }
                Err(failure) => {
                    tracing::warn!(url, attempt, error = %failure, "fetch attempt failed");
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.backoff * attempt).await;
                    }
                }
            }
        }

        tracing::warn!(url, attempts = self.max_attempts, "giving up on page");
        Fetched::default()
    }

    async fn attempt(&self, url: &str) -> Result<String, FetchFailure> {
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(CONNECTION, "keep-alive")
            .header(USER_AGENT, self.pick_user_agent())
            .send()
            .await
            .map_err(|e| FetchFailure::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchFailure::Body(e.to_string()))?;
        if html.trim().is_empty() {
            return Err(FetchFailure::Empty);
        }
        Ok(html)
    }

    /// Draw a User-Agent from the configured pool.
    pub fn pick_user_agent(&self) -> String {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.user_agents
            .choose(&mut *rng)
            .cloned()
            .unwrap_or_default()
    }
}

/// Build a [`reqwest::Client`] configured for scraping.
///
/// The client has:
/// - Cookie store enabled (for consent pages)
/// - Timeout from config
/// - Up to 10 redirects
/// - Optional proxy with basic auth
///
/// The User-Agent is set per request, not on the client.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let mut builder = reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(ref proxy) = config.proxy {
        let mut routed = reqwest::Proxy::all(&proxy.url)
            .map_err(|e| SearchError::Http(format!("invalid proxy `{}`: {e}", proxy.url)))?;
        if let (Some(user), Some(password)) = (&proxy.username, &proxy.password) {
            routed = routed.basic_auth(user, password);
        }
        builder = builder.proxy(routed);
    }

    builder
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// RNG seeded from `seed`, or from entropy when unset.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
