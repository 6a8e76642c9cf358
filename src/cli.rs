//! Command-line surface of `scout`.
//!
//! Two modes:
//!
//! - with `--rank` or `--topk`, print one ranked result (or the no-evidence
//!   line), going through the ranked-list cache;
//! - otherwise list every usable result of a single pass.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use scout_search::{ProxyConfig, ReturnType, SearchConfig, SearchEngine, SearchRequest, Searcher};

use crate::display;
use crate::error::{Result, ScoutError};

/// Highest accepted `--rank`.
pub const MAX_RANK: usize = 10;

/// Scout: web search that answers with source passages, not snippets.
#[derive(Debug, Parser)]
#[command(name = "scout", version, about)]
pub struct Cli {
    /// Search engine: google, bing or duckduckgo.
    #[arg(short, long, default_value = "google")]
    pub engine: String,

    /// Free-text query.
    pub query: Option<String>,

    /// Results page, starting at 1.
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i32,

    /// Print only the result at this 0-based rank.
    #[arg(short, long, conflicts_with = "topk")]
    pub rank: Option<usize>,

    /// Print only the result at this 1-based rank.
    #[arg(long)]
    pub topk: Option<usize>,

    /// Fields to extract and print: full, title, description or link.
    #[arg(short = 't', long = "type", default_value = "full")]
    pub return_type: ReturnType,

    /// Ignore cached pages and ranked lists (fresh results are still written).
    #[arg(long)]
    pub no_cache: bool,

    /// Delete this engine's cached pages before searching.
    #[arg(long)]
    pub clear_cache: bool,

    /// Delete the whole cache before searching.
    #[arg(long, conflicts_with = "clear_cache")]
    pub clear_all_cache: bool,

    /// Retries without the page cache when too few results survive.
    #[arg(long, default_value_t = 1)]
    pub retry: u32,

    /// Proxy URL for every request.
    #[arg(long, requires_all = ["proxy_user", "proxy_password"])]
    pub proxy: Option<String>,

    /// Proxy user name.
    #[arg(long)]
    pub proxy_user: Option<String>,

    /// Proxy password.
    #[arg(long, env = "SCOUT_PROXY_PASSWORD", hide_env_values = true)]
    pub proxy_password: Option<String>,

    /// Search on this host instead of a random one, e.g. `google.de`.
    #[arg(short = 'u', long = "url")]
    pub base_url: Option<String>,

    /// Only return pages dated up to the end of this year.
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Interface language (Google `hl`).
    #[arg(long)]
    pub hl: Option<String>,

    /// Raw Google `tbs` filter.
    #[arg(long)]
    pub tbs: Option<String>,

    /// Describe the engine and exit.
    #[arg(long)]
    pub show_summary: bool,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The 1-based rank asked for, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Usage`] for a rank above [`MAX_RANK`] or a zero
    /// `--topk`.
    pub fn topk(&self) -> Result<Option<usize>> {
        match (self.rank, self.topk) {
            (Some(rank), _) if rank > MAX_RANK => Err(ScoutError::Usage(format!(
                "results are limited to {MAX_RANK} per page, ask for a different --page instead"
            ))),
            (Some(rank), _) => Ok(Some(rank + 1)),
            (None, Some(0)) => Err(ScoutError::Usage("--topk starts at 1".into())),
            (None, topk) => Ok(topk),
        }
    }

    /// Search parameters for `query`.
    pub fn search_request(&self, query: &str, topk: Option<usize>) -> SearchRequest {
        let mut request = SearchRequest::new(query)
            .with_page(self.page)
            .with_topk(topk.unwrap_or(1))
            .with_return_type(self.return_type)
            .with_retry(self.retry);
        if self.no_cache {
            request = request.bypass_cache();
        }
        if let Some(hl) = &self.hl {
            request = request.with_param("hl", hl);
        }
        if let Some(tbs) = &self.tbs {
            request = request.with_param("tbs", tbs);
        }
        request.end_year = self.end_year;
        request.base_url = self.base_url.clone();
        request
    }

    /// Fold command-line overrides into `config`.
    pub fn apply_to(&self, config: &mut SearchConfig) {
        if let Some(url) = &self.proxy {
            config.proxy = Some(ProxyConfig {
                url: url.clone(),
                username: self.proxy_user.clone(),
                password: self.proxy_password.clone(),
            });
        }
    }
}

/// Run one invocation, writing results to `out`.
///
/// # Errors
///
/// Fails before touching the cache or the network for an unknown engine,
/// a missing query or an out-of-range rank. Running out of results is not
/// an error: the no-evidence line is printed instead.
pub async fn run<W: Write>(cli: &Cli, mut config: SearchConfig, out: &mut W) -> Result<()> {
    let engine = SearchEngine::from_name(&cli.engine)?;
    if cli.show_summary {
        out.write_all(display::render_summary(engine).as_bytes())?;
        return Ok(());
    }

    let query = cli
        .query
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ScoutError::Usage("a query is required unless --show-summary is given".into()))?;
    let topk = cli.topk()?;

    cli.apply_to(&mut config);
    let searcher = Searcher::new(engine, config)?;
    if cli.clear_all_cache || cli.clear_cache {
        searcher.clear_cache(cli.clear_all_cache).await?;
        tracing::info!(all = cli.clear_all_cache, "cache cleared");
    }

    let request = cli.search_request(query, topk);
    let started = Instant::now();
    let text = match topk {
        Some(_) => {
            let outcome = searcher.search(&request).await?;
            display::render_outcome(&outcome, request.return_type)
        }
        None => {
            let results = searcher.results(&request).await?;
            display::render_listing(&results, request.return_type)
        }
    };
    out.write_all(text.as_bytes())?;
    out.flush()?;
    tracing::info!(engine = %engine, elapsed = ?started.elapsed(), "total search time");
    Ok(())
}
