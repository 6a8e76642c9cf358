//! Search URL construction: host rotation, host overrides and query strings.

use url::Url;

use crate::error::{Result, SearchError};

/// Hosts to rotate through: `configured` when non-empty, else `defaults`,
/// minus every host in `blocked`. Order is preserved.
pub fn domain_pool<'a>(configured: &'a [String], defaults: &'a [&'a str], blocked: &[String]) -> Vec<&'a str> {
    let candidates: Vec<&str> = if configured.is_empty() {
        defaults.to_vec()
    } else {
        configured.iter().map(String::as_str).collect()
    };
    candidates
        .into_iter()
        .filter(|host| !blocked.iter().any(|b| b == host))
        .collect()
}

/// `<scheme>://<host>/`.
///
/// # Errors
///
/// [`SearchError::Config`] if the pair does not form a valid URL.
pub fn search_root(scheme: &str, host: &str) -> Result<Url> {
    Url::parse(&format!("{scheme}://{host}/"))
        .map_err(|e| SearchError::Config(format!("invalid search host `{host}`: {e}")))
}

/// Root URL for a caller-supplied host override.
///
/// Accepts a bare host such as `google.de` (the default `scheme` is used)
/// or a full URL, whose path and query are discarded.
///
/// # Errors
///
/// [`SearchError::InvalidInput`] if `base` is not a host or URL.
pub fn override_root(scheme: &str, base: &str) -> Result<Url> {
    let base = base.trim();
    let parsed = if base.contains("://") {
        Url::parse(base)
    } else {
        Url::parse(&format!("{scheme}://{}", base.trim_end_matches('/')))
    };
    let mut root = parsed
        .ok()
        .filter(|url| url.host_str().is_some())
        .ok_or_else(|| SearchError::InvalidInput(format!("invalid base url `{base}`")))?;
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    Ok(root)
}

/// Append `path` and the form-encoded `params` to `root`.
///
/// # Errors
///
/// [`SearchError::Config`] if `path` cannot be joined onto `root`.
pub fn search_url(root: &Url, path: &str, params: &[(String, String)]) -> Result<Url> {
    let mut url = root
        .join(path)
        .map_err(|e| SearchError::Config(format!("invalid search path `{path}`: {e}")))?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}
