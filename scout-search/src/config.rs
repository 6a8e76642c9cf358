//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] holds everything that used to be process-wide state in a
//! scraper: the user-agent and domain pools, blocklists, retry policy, proxy
//! and the cache location. It is deserializable so the CLI can load it from
//! a TOML table, and every field has a default.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Realistic browser User-Agent strings, one picked per request.
const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Windows NT 6.1; rv:11.0) Gecko/20100101 Firefox/11.0",
];

/// Search hosts that must never be picked from a domain pool.
const DEFAULT_BLOCKED_DOMAINS: &[&str] = &["www.google.io", "www.google.com.lc", "www.google.cn"];

/// Result links containing any of these are dropped: binary documents and
/// sites whose pages never yield a usable passage.
const DEFAULT_BLOCKED_SITES: &[&str] = &[
    "amazon.com",
    "amazon.cn",
    ".pdf",
    ".ppt",
    ".xlsx",
    ".cgi",
    ".csv",
    ".xls",
    "linkedin.com",
    "linkedin.cn",
    "youtube.com",
    "facebook.com",
    "bestbuy.com",
    "ncpc.gov",
    "thevogue.com",
    "arkansas.gov",
    "ancestorium.com",
];

/// Proxy routing for every outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy URL, e.g. `http://127.0.0.1:8080`.
    pub url: String,
    /// Basic-auth user name.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
}

/// Configuration for fetching, caching and extraction.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Root directory of the on-disk content cache.
    pub cache_root: PathBuf,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Network attempts per fetch before giving up.
    pub max_attempts: u32,
    /// Backoff unit in milliseconds; attempt `i` waits `i` units after failing.
    pub backoff_millis: u64,
    /// User-Agent pool. One entry is drawn at random per request.
    pub user_agents: Vec<String>,
    /// Search hosts to rotate through. Empty means the engine's own defaults.
    pub domains: Vec<String>,
    /// Hosts removed from the domain pool.
    pub blocked_domains: Vec<String>,
    /// Substrings that disqualify a result link.
    pub blocked_sites: Vec<String>,
    /// Scheme used for search URLs.
    pub search_scheme: String,
    /// Cap on the plain text taken from a result page, in characters.
    pub max_page_chars: usize,
    /// Seed for user-agent and domain selection. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Optional proxy for every request.
    pub proxy: Option<ProxyConfig>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_root: PathBuf::from("cache"),
            timeout_seconds: 10,
            max_attempts: 3,
            backoff_millis: 1000,
            user_agents: to_strings(DEFAULT_USER_AGENTS),
            domains: Vec::new(),
            blocked_domains: to_strings(DEFAULT_BLOCKED_DOMAINS),
            blocked_sites: to_strings(DEFAULT_BLOCKED_SITES),
            search_scheme: "https".into(),
            max_page_chars: 10_000,
            seed: None,
            proxy: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` and `max_attempts` must be greater than 0
    /// - `user_agents` must not be empty
    /// - `search_scheme` must be `http` or `https`
    /// - `max_page_chars` must be greater than 0
    /// - proxy credentials must be given together
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(SearchError::Config(
                "max_attempts must be greater than 0".into(),
            ));
        }
        if self.user_agents.is_empty() {
            return Err(SearchError::Config(
                "at least one user agent must be configured".into(),
            ));
        }
        if self.search_scheme != "http" && self.search_scheme != "https" {
            return Err(SearchError::Config(format!(
                "search_scheme must be http or https, got `{}`",
                self.search_scheme
            )));
        }
        if self.max_page_chars == 0 {
            return Err(SearchError::Config(
                "max_page_chars must be greater than 0".into(),
            ));
        }
        if let Some(ref proxy) = self.proxy {
            if proxy.username.is_some() != proxy.password.is_some() {
                return Err(SearchError::Config(
                    "proxy username and password must be set together".into(),
                ));
            }
        }
        Ok(())
    }

    /// Whether `link` matches the result blocklist.
    pub fn is_blocked_site(&self, link: &str) -> bool {
        self.blocked_sites.iter().any(|site| link.contains(site.as_str()))
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff_millis, 1000);
        assert_eq!(config.max_page_chars, 10_000);
        assert_eq!(config.search_scheme, "https");
        assert!(config.domains.is_empty());
        assert!(config.proxy.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_attempts_rejected() {
        let config = SearchConfig {
            max_attempts: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn empty_user_agents_rejected() {
        let config = SearchConfig {
            user_agents: vec![],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("user agent"));
    }

    #[test]
    fn unknown_scheme_rejected() {
        let config = SearchConfig {
            search_scheme: "ftp".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn half_configured_proxy_credentials_rejected() {
        let config = SearchConfig {
            proxy: Some(ProxyConfig {
                url: "http://127.0.0.1:8080".into(),
                username: Some("user".into()),
                password: None,
            }),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("proxy"));
    }

    #[test]
    fn blocklist_matches_domains_and_extensions() {
        let config = SearchConfig::default();
        assert!(config.is_blocked_site("https://www.amazon.com/dp/B000"));
        assert!(config.is_blocked_site("https://example.org/report.pdf"));
        assert!(!config.is_blocked_site("https://en.wikipedia.org/wiki/Rust"));
    }

    #[test]
    fn blocked_domains_default() {
        let config = SearchConfig::default();
        assert!(config.blocked_domains.iter().any(|d| d == "www.google.cn"));
    }

    #[test]
    fn partial_toml_like_json_keeps_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"max_attempts": 5, "seed": 7}"#).expect("deserialize");
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_page_chars, 10_000);
    }
}
