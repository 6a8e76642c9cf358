//! DuckDuckGo's JavaScript-free HTML endpoint.
//!
//! Uses the HTML-only version at `https://html.duckduckgo.com/html/`
//! which doesn't require JavaScript. Result links go through a
//! `//duckduckgo.com/l/?uddg=` redirect that is unwrapped here.

use scraper::Html;
use url::Url;

use super::apply_overrides;
use super::dom::{href, raw_text, select_first, selector};
use crate::engine::{Candidate, Layout, Rejection, ResultExtractor, ResultNode};
use crate::types::{ReturnType, SearchEngine, SearchRequest};

const RESULT: &str =
    ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)";

const EXTRA_PARAMS: &[&str] = &["kl"];

/// DuckDuckGo HTML search scraper.
pub struct DuckDuckGoExtractor;

impl DuckDuckGoExtractor {
    /// Extract the real URL from a DuckDuckGo redirect link.
    ///
    /// DDG wraps URLs like: `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`
    /// The `uddg` query parameter comes back URL-decoded.
    fn extract_url(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&full_href).ok()?;

        if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        } else {
            Some(full_href)
        }
    }
}

impl ResultExtractor for DuckDuckGoExtractor {
    fn engine_type(&self) -> SearchEngine {
        SearchEngine::DuckDuckGo
    }

    fn default_domains(&self) -> &'static [&'static str] {
        &["html.duckduckgo.com"]
    }

    fn search_path(&self) -> &'static str {
        "html/"
    }

    fn base_url(&self) -> &'static str {
        "https://html.duckduckgo.com/"
    }

    fn params(&self, request: &SearchRequest) -> Vec<(String, String)> {
        let mut params = vec![("q".to_owned(), request.query.clone())];
        let page = request.page_number();
        if page > 1 {
            params.push(("s".to_owned(), ((page - 1) * 30).to_string()));
        }
        apply_overrides(&mut params, request, EXTRA_PARAMS);
        params
    }

    fn parse_soup<'a>(&self, document: &'a Html) -> Vec<ResultNode<'a>> {
        selector(RESULT)
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
        let anchor =
            select_first(node.element, ".result__a").ok_or(Rejection::Structure("no result__a"))?;
        let raw_url = href(anchor)
            .and_then(|h| {
                if h.starts_with("//") {
                    Some(format!("https:{h}"))
                } else {
                    base.join(h).ok().map(|url| url.to_string())
                }
            })
            .unwrap_or_default();
        let link = Self::extract_url(&raw_url).unwrap_or_default();

        let description = select_first(node.element, ".result__snippet")
            .map(raw_text)
            .unwrap_or_default();

        Ok(Candidate {
            title: raw_text(anchor),
            link,
            raw_url,
            fallback_page: description.clone(),
            description,
            needs_passage: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;

    const MOCK_DDG_HTML: &str = r#"
<html>
<body>
<div class="result results_links results_links_deep web-result">
  <div class="links_main links_deep result__body">
    <h2 class="result__title">
      <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc123">
        Rust Programming Language
      </a>
    </h2>
    <a class="result__snippet">A language empowering everyone to build reliable and efficient software.</a>
  </div>
</div>
<div class="result results_links results_links_deep web-result result--ad">
  <div class="links_main links_deep result__body">
    <h2 class="result__title"><a class="result__a" href="https://ads.example.com/">Buy Rust (Ad)</a></h2>
    <a class="result__snippet">Sponsored listing for rust removal products.</a>
  </div>
</div>
<div class="result results_links results_links_deep web-result">
  <div class="links_main links_deep result__body">
    <h2 class="result__title">
      <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FRust_(programming_language)&amp;rut=def456">
        Rust (programming language) - Wikipedia
      </a>
    </h2>
    <a class="result__snippet">Rust is a multi-paradigm, general-purpose programming language.</a>
  </div>
</div>
</body>
</html>"#;

    #[test]
    fn extract_url_from_ddg_redirect() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=abc";
        let result = DuckDuckGoExtractor::extract_url(href);
        assert_eq!(result, Some("https://example.com/page".to_string()));
    }

    #[test]
    fn extract_url_direct_link() {
        let href = "https://example.com/direct";
        let result = DuckDuckGoExtractor::extract_url(href);
        assert_eq!(result, Some("https://example.com/direct".to_string()));
    }

    #[test]
    fn extract_url_invalid() {
        assert!(DuckDuckGoExtractor::extract_url("not-a-url").is_none());
    }

    #[test]
    fn parse_mock_html_skips_ads() {
        let results = DuckDuckGoExtractor.extract(
            MOCK_DDG_HTML,
            ReturnType::Full,
            None,
            &SearchConfig::default(),
        );
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].link, "https://www.rust-lang.org/");
        assert!(results[0].raw_url.starts_with("https://duckduckgo.com/l/?uddg="));
        assert!(results[0].description.contains("reliable and efficient"));

        assert!(results[1].link.contains("wikipedia.org"));
        assert!(results.iter().all(|r| !r.title.contains("(Ad)")));
    }

    #[test]
    fn params_use_html_endpoint_offset() {
        let request = SearchRequest::new("rust").with_page(3).with_param("kl", "us-en");
        let params = DuckDuckGoExtractor.params(&request);
        assert!(params.contains(&("s".to_owned(), "60".to_owned())));
        assert!(params.contains(&("kl".to_owned(), "us-en".to_owned())));
        assert_eq!(DuckDuckGoExtractor.search_path(), "html/");
    }

    #[test]
    fn engine_type_is_duckduckgo() {
        assert_eq!(DuckDuckGoExtractor.engine_type(), SearchEngine::DuckDuckGo);
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DuckDuckGoExtractor>();
    }
}
