//! Bing results pages.
//!
//! Single layout: each organic result is an `li.b_algo`. Links are direct,
//! and the snippet doubles as the page text.

use scraper::Html;
use url::Url;

use super::apply_overrides;
use super::dom::{href, raw_text, select_first, selector};
use crate::engine::{Candidate, Layout, Rejection, ResultExtractor, ResultNode};
use crate::types::{ReturnType, SearchEngine, SearchRequest};

const EXTRA_PARAMS: &[&str] = &["setlang", "cc"];

/// Bing HTML search scraper.
pub struct BingExtractor;

impl ResultExtractor for BingExtractor {
    fn engine_type(&self) -> SearchEngine {
        SearchEngine::Bing
    }

    fn default_domains(&self) -> &'static [&'static str] {
        &["www.bing.com"]
    }

    fn base_url(&self) -> &'static str {
        "https://www.bing.com/"
    }

    fn params(&self, request: &SearchRequest) -> Vec<(String, String)> {
        let mut params = vec![("q".to_owned(), request.query.clone())];
        let page = request.page_number();
        if page > 1 {
            params.push(("first".to_owned(), ((page - 1) * 10 + 1).to_string()));
        }
        apply_overrides(&mut params, request, EXTRA_PARAMS);
        params
    }

    fn parse_soup<'a>(&self, document: &'a Html) -> Vec<ResultNode<'a>> {
        selector("li.b_algo")
            .map(|sel| {
                document
                    .select(&sel)
                    .map(|element| ResultNode {
                        element,
                        layout: Layout::Primary,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parse_single_result(
        &self,
        node: &ResultNode<'_>,
        _return_type: ReturnType,
        base: &Url,
    ) -> Result<Candidate, Rejection> {
        let heading = select_first(node.element, "h2").ok_or(Rejection::Structure("no h2"))?;
        let raw = select_first(heading, "a")
            .and_then(href)
            .and_then(|h| base.join(h).ok())
            .map(|url| url.to_string())
            .unwrap_or_default();

        let description = select_first(node.element, ".b_caption p, .b_lineclamp2")
            .map(raw_text)
            .unwrap_or_default();

        Ok(Candidate {
            title: raw_text(heading),
            link: raw.clone(),
            raw_url: raw,
            fallback_page: description.clone(),
            description,
            needs_passage: false,
        })
    }
}
