//! Search engine implementations.
//!
//! Each module provides a struct implementing [`crate::engine::ResultExtractor`]
//! that scrapes a specific search engine's HTML results page.

pub mod bing;
pub(crate) mod dom;
pub mod duckduckgo;
pub mod google;

pub use bing::BingExtractor;
pub use duckduckgo::DuckDuckGoExtractor;
pub use google::GoogleExtractor;

use crate::types::SearchRequest;

/// Copy the caller's values for the `allowed` keys into `params`,
/// replacing any value the engine set itself. Other keys are ignored.
pub(crate) fn apply_overrides(
    params: &mut Vec<(String, String)>,
    request: &SearchRequest,
    allowed: &[&str],
) {
    for key in allowed {
        let Some(value) = request.param(key).filter(|v| !v.is_empty()) else {
            continue;
        };
        params.retain(|(name, _)| name != key);
        params.push(((*key).to_owned(), value.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_and_filter() {
        let request = SearchRequest::new("q")
            .with_param("hl", "fr")
            .with_param("unknown", "x")
            .with_param("tbs", "");
        let mut params = vec![
            ("q".to_owned(), "q".to_owned()),
            ("hl".to_owned(), "en".to_owned()),
        ];
        apply_overrides(&mut params, &request, &["hl", "tbs"]);
        assert_eq!(
            params,
            vec![
                ("q".to_owned(), "q".to_owned()),
                ("hl".to_owned(), "fr".to_owned()),
            ]
        );
    }
}
