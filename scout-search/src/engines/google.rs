//! Google results pages, served in two competing layouts.
//!
//! Google serves the JavaScript-free results page in (at least) two
//! layouts. The primary one wraps each result in `div.Gx5Zad` with
//! `div.kCrYT` blocks inside; the secondary one uses `div.ezO2md` with
//! dedicated title and snippet elements. Result links point at Google's
//! `/url?q=` redirect and are unwrapped with [`clean_url`].
//!
//! Snippets are short, so Google candidates ask for passage recovery.

use scraper::{ElementRef, Html};
use url::Url;

use super::dom::{contains, href, joined_text, select_all, select_first, selector, visible_text};
use super::apply_overrides;
use crate::engine::{Candidate, Layout, Rejection, ResultExtractor, ResultNode};
use crate::passage::text::ELLIPSIS;
use crate::types::{ReturnType, SearchEngine, SearchRequest};

const PRIMARY_RESULT: &str = "div.Gx5Zad.xpd.EtOod.pkphOe";
const SECONDARY_RESULT: &str = "div.ezO2md";

/// Timestamps and thumbnails, ignored wherever text is read.
const DECORATIONS: &str =
    "span.r0bn4c.rQMQod, span.fYyStc.YVIcad, sub.gMUaMb.r0bn4c.rQMQod, div.synv3b, img";

/// Blocks that make up a primary-layout result.
const TEXT_BLOCKS: &str = "div.kCrYT, div.CgE3Ac, div.X7NTVe";

/// Query parameters callers may pass through.
const EXTRA_PARAMS: &[&str] = &["hl", "tbs"];

/// Snippet pieces this short are dropped from descriptions.
const MIN_PIECE_CHARS: usize = 10;

const DOMAINS: &[&str] = &[
    "www.google.com",
    "www.google.co.uk",
    "www.google.ca",
    "www.google.com.au",
    "www.google.co.nz",
    "www.google.ie",
    "www.google.co.in",
    "www.google.com.sg",
];

/// Google HTML search scraper.
pub struct GoogleExtractor;

impl ResultExtractor for GoogleExtractor {
    fn engine_type(&self) -> SearchEngine {
        SearchEngine::Google
    }

    fn default_domains(&self) -> &'static [&'static str] {
        DOMAINS
    }

    fn base_url(&self) -> &'static str {
        "https://www.google.com/"
    }

    fn params(&self, request: &SearchRequest) -> Vec<(String, String)> {
        let mut params = vec![
            ("q".to_owned(), request.query.clone()),
            ("gl".to_owned(), "US".to_owned()),
        ];
        let page = request.page_number();
        if page > 1 {
            params.push(("start".to_owned(), ((page - 1) * 10).to_string()));
        }
        if let Some(year) = request.end_year {
            params.push(("tbs".to_owned(), format!("cdr:1,cd_min:,cd_max:{year}")));
        }
        apply_overrides(&mut params, request, EXTRA_PARAMS);
        params
    }

    fn parse_soup<'a>(&self, document: &'a Html) -> Vec<ResultNode<'a>> {
        let find = |css: &str, layout: Layout| -> Vec<ResultNode<'a>> {
            selector(css)
                .map(|sel| {
                    document
                        .select(&sel)
                        .map(|element| ResultNode { element, layout })
                        .collect()
                })
                .unwrap_or_default()
        };

        let nodes = find(PRIMARY_RESULT, Layout::Primary);
        if nodes.is_empty() {
            find(SECONDARY_RESULT, Layout::Secondary)
        } else {
            nodes
        }
    }

    fn parse_single_result(
        &self,
        node: &ResultNode<'_>,
        return_type: ReturnType,
        base: &Url,
    ) -> Result<Candidate, Rejection> {
        let element = node.element;
        if is_non_organic(element) {
            return Err(Rejection::NotOrganic);
        }
        let decorations = select_all(element, DECORATIONS);

        match node.layout {
            Layout::Primary => parse_primary(element, return_type, base, &decorations),
            Layout::Secondary => Ok(parse_secondary(element, base, &decorations)),
        }
    }
}

/// Suggestion boxes, "people also ask" and similar blocks.
fn is_non_organic(element: ElementRef<'_>) -> bool {
    (contains(element, "h2.wITvVb") && contains(element, "div.LKSyXe"))
        || contains(element, "div.BmP5tf")
        || contains(element, "span.qXLe6d.x3G5ab")
        || contains(element, "span.C7GS5b.rkGIWe")
}

fn parse_primary(
    element: ElementRef<'_>,
    return_type: ReturnType,
    base: &Url,
    decorations: &[ElementRef<'_>],
) -> Result<Candidate, Rejection> {
    let blocks = select_all(element, "div.kCrYT");
    if blocks.is_empty() {
        return Err(Rejection::Structure("no kCrYT blocks"));
    }

    let mut candidate = Candidate {
        needs_passage: return_type == ReturnType::Full,
        ..Candidate::default()
    };

    let mut title_block = None;
    if let [first, second, rest @ ..] = blocks.as_slice() {
        // Usually the first block holds the heading; otherwise they are swapped
        // and the title sits in a plain BNeawe div.
        let (title_el, desc_el, heading) =
            match select_first(*first, "h3").or_else(|| select_first(*first, "h2")) {
                Some(heading) => (*first, *second, Some(heading)),
                None => (*second, *first, select_first(*second, "div.BNeawe")),
            };
        title_block = Some(title_el);

        if return_type.wants_title() {
            candidate.title = heading
                .map(|heading| title_text(heading, decorations))
                .unwrap_or_default();
        }
        if return_type.wants_link() {
            if let Some(raw) = select_first(title_el, "a").and_then(href) {
                set_link(&mut candidate, base, raw);
            }
        }
        if return_type.wants_description() {
            let mut text = joined_text(desc_el, " ", decorations);
            for block in rest {
                text.push_str("...\n");
                text.push_str(&joined_text(*block, " ", decorations));
            }
            candidate.description = long_pieces(&text);
        }
    }

    candidate.fallback_page = fallback_page(element, title_block, decorations);
    Ok(candidate)
}

fn parse_secondary(element: ElementRef<'_>, base: &Url, decorations: &[ElementRef<'_>]) -> Candidate {
    let mut candidate = Candidate::default();

    let anchor = select_first(element, "a.fuLhoc.ZWRArf");
    let snippet = select_first(element, "span.qXLe6d.FrIlee");
    match (anchor, snippet) {
        (Some(anchor), Some(snippet)) => {
            candidate.title = title_text(anchor, decorations);
            if let Some(raw) = href(anchor) {
                set_link(&mut candidate, base, raw);
            }
            candidate.description = visible_text(snippet, decorations);
            candidate.needs_passage = true;
        }
        _ => candidate.description = joined_text(element, " ", decorations),
    }

    candidate.fallback_page = candidate.description.clone();
    candidate
}

fn set_link(candidate: &mut Candidate, base: &Url, raw: &str) {
    match base.join(raw) {
        Ok(resolved) => {
            candidate.raw_url = resolved.to_string();
            candidate.link = clean_url(&candidate.raw_url);
        }
        Err(e) => tracing::debug!(href = raw, "unresolvable result link: {e}"),
    }
}

/// Heading text with breadcrumb pieces (those containing `›`) removed.
fn title_text(heading: ElementRef<'_>, decorations: &[ElementRef<'_>]) -> String {
    joined_text(heading, ELLIPSIS, decorations)
        .split(ELLIPSIS)
        .filter(|piece| !piece.contains('›'))
        .collect::<Vec<_>>()
        .join(ELLIPSIS)
}

/// Keep only snippet pieces longer than [`MIN_PIECE_CHARS`].
fn long_pieces(text: &str) -> String {
    text.split(ELLIPSIS)
        .filter(|piece| piece.chars().count() > MIN_PIECE_CHARS)
        .collect::<Vec<_>>()
        .join(ELLIPSIS)
        .trim()
        .to_owned()
}

/// All text blocks of a primary-layout result except the title block,
/// one per line. Tables are rendered as pipe-separated rows.
fn fallback_page(
    element: ElementRef<'_>,
    title_block: Option<ElementRef<'_>>,
    decorations: &[ElementRef<'_>],
) -> String {
    select_all(element, TEXT_BLOCKS)
        .into_iter()
        .filter(|block| title_block.map_or(true, |title| title.id() != block.id()))
        .map(|block| {
            if block.value().classes().any(|class| class == "CgE3Ac") {
                table_text(block, decorations)
            } else {
                joined_text(block, " ", decorations).replace('\n', " ").trim().to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

fn table_text(block: ElementRef<'_>, decorations: &[ElementRef<'_>]) -> String {
    let rows = select_all(block, "tr");
    if rows.is_empty() {
        return joined_text(block, " ", decorations);
    }
    rows.into_iter()
        .map(|row| {
            let cells: Vec<String> = select_all(row, "th, td")
                .into_iter()
                .map(|cell| joined_text(cell, " ", decorations))
                .collect();
            format!("| {} |", cells.join(" | "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the destination URL from a Google redirect link.
///
/// The `q` (or else `url`) query parameter is returned, decoded, when it
/// holds an absolute URL. Anything else is returned unchanged.
///
/// ```
/// use scout_search::engines::google::clean_url;
///
/// assert_eq!(
///     clean_url("https://www.google.com/url?q=https://example.com/x&sa=U"),
///     "https://example.com/x"
/// );
/// assert_eq!(clean_url("https://example.com/y"), "https://example.com/y");
/// ```
pub fn clean_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_owned();
    };
    ["q", "url"]
        .iter()
        .find_map(|key| {
            parsed
                .query_pairs()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.into_owned())
                .filter(|value| Url::parse(value).is_ok())
        })
        .unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;

    const PRIMARY_HTML: &str = r#"<!DOCTYPE html>
<html><body><div id="main">
<div class="Gx5Zad fP1Qef xpd EtOod pkphOe">
  <div class="egMi0 kCrYT"><a href="/url?q=https://www.rust-lang.org/&amp;sa=U&amp;ved=2ahUKE"><h3 class="zBAuLc l97dzf"><div class="BNeawe vvjwJb AP7Wnd">Rust Programming Language</div><span>www.rust-lang.org › learn</span></h3></a></div>
  <div class="kCrYT"><div><div class="BNeawe s3v9rd AP7Wnd"><span class="r0bn4c rQMQod">3 days ago</span> A language empowering everyone to build reliable and efficient software. ... ok ... Rust has great documentation, a friendly compiler with useful error messages.</div></div></div>
</div>
<div class="Gx5Zad xpd EtOod pkphOe">
  <div class="kCrYT"><span class="qXLe6d x3G5ab">People also ask</span></div>
</div>
<div class="Gx5Zad xpd EtOod pkphOe">
  <div class="kCrYT"><div class="BNeawe">Rust release history with milestones and dates</div></div>
  <div class="kCrYT"><a href="/url?q=https://en.wikipedia.org/wiki/Rust_(programming_language)&amp;sa=U"><div class="BNeawe">Rust (programming language) - Wikipedia</div></a></div>
  <div class="CgE3Ac"><table><tr><th>Year</th><th>Event</th></tr><tr><td>2015</td><td>Rust 1.0</td></tr></table></div>
</div>
<div class="Gx5Zad xpd EtOod pkphOe">
  <div class="kCrYT"><a href="/url?q=https://www.youtube.com/watch%3Fv%3Dabc&amp;sa=U"><h3>Rust in 100 seconds</h3></a></div>
  <div class="kCrYT"><div class="BNeawe">A quick video tour of the Rust programming language.</div></div>
</div>
<div class="Gx5Zad xpd EtOod pkphOe"><div class="BNeawe">no blocks here</div></div>
</div></body></html>"#;

    const SECONDARY_HTML: &str = r#"<html><body>
<div class="ezO2md"><a class="fuLhoc ZWRArf" href="/url?q=https://doc.rust-lang.org/book/&amp;sa=U"><span class="CVA68e qXLe6d">The Rust Programming Language</span></a><span class="qXLe6d FrIlee"><span>An introductory book about Rust, covering ownership and borrowing.</span></span></div>
<div class="ezO2md"><span>Related searches: rust book online free edition</span></div>
</body></html>"#;

    fn base() -> Url {
        Url::parse("https://www.google.com/").expect("base url")
    }

    fn parse(html: &str, return_type: ReturnType) -> Vec<Result<Candidate, Rejection>> {
        let document = Html::parse_document(html);
        let engine = GoogleExtractor;
        engine
            .parse_soup(&document)
            .iter()
            .map(|node| engine.parse_single_result(node, return_type, &base()))
            .collect()
    }

    #[test]
    fn primary_layout_detected_first() {
        let document = Html::parse_document(PRIMARY_HTML);
        let nodes = GoogleExtractor.parse_soup(&document);
        assert_eq!(nodes.len(), 5);
        assert!(nodes.iter().all(|n| n.layout == Layout::Primary));
    }

    #[test]
    fn secondary_layout_used_when_primary_absent() {
        let document = Html::parse_document(SECONDARY_HTML);
        let nodes = GoogleExtractor.parse_soup(&document);
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.layout == Layout::Secondary));
    }

    #[test]
    fn primary_result_fields() {
        let parsed = parse(PRIMARY_HTML, ReturnType::Full);
        let first = parsed[0].as_ref().expect("organic result");
        assert_eq!(first.title, "Rust Programming Language");
        assert_eq!(first.link, "https://www.rust-lang.org/");
        assert_eq!(
            first.raw_url,
            "https://www.google.com/url?q=https://www.rust-lang.org/&sa=U&ved=2ahUKE"
        );
        assert_eq!(
            first.description,
            "A language empowering everyone to build reliable and efficient software. \
             ... Rust has great documentation, a friendly compiler with useful error messages."
        );
        assert!(first.needs_passage);
        assert!(!first.fallback_page.contains("3 days ago"));
        assert!(first.fallback_page.starts_with("A language empowering"));
    }

    #[test]
    fn non_organic_block_rejected() {
        let parsed = parse(PRIMARY_HTML, ReturnType::Full);
        assert_eq!(parsed[1], Err(Rejection::NotOrganic));
    }

    #[test]
    fn swapped_blocks_take_title_from_second() {
        let parsed = parse(PRIMARY_HTML, ReturnType::Full);
        let swapped = parsed[2].as_ref().expect("swapped result");
        assert_eq!(swapped.title, "Rust (programming language) - Wikipedia");
        assert_eq!(
            swapped.link,
            "https://en.wikipedia.org/wiki/Rust_(programming_language)"
        );
        assert_eq!(swapped.description, "Rust release history with milestones and dates");
        assert_eq!(
            swapped.fallback_page,
            "Rust release history with milestones and dates\n| Year | Event |\n| 2015 | Rust 1.0 |"
        );
    }

    #[test]
    fn missing_blocks_is_structure_rejection() {
        let parsed = parse(PRIMARY_HTML, ReturnType::Full);
        assert!(matches!(parsed[4], Err(Rejection::Structure(_))));
    }

    #[test]
    fn return_type_limits_extracted_fields() {
        let parsed = parse(PRIMARY_HTML, ReturnType::Title);
        let first = parsed[0].as_ref().expect("organic result");
        assert_eq!(first.title, "Rust Programming Language");
        assert!(first.link.is_empty());
        assert!(first.description.is_empty());
        assert!(!first.needs_passage);
    }

    #[test]
    fn secondary_result_fields() {
        let parsed = parse(SECONDARY_HTML, ReturnType::Full);
        let first = parsed[0].as_ref().expect("result");
        assert_eq!(first.title, "The Rust Programming Language");
        assert_eq!(first.link, "https://doc.rust-lang.org/book/");
        assert_eq!(
            first.description,
            "An introductory book about Rust, covering ownership and borrowing."
        );
        assert_eq!(first.fallback_page, first.description);
    }

    #[test]
    fn secondary_description_skips_timestamps_and_images() {
        let html = r#"<html><body>
<div class="ezO2md"><a class="fuLhoc ZWRArf" href="/url?q=https://doc.rust-lang.org/book/&amp;sa=U"><span class="CVA68e qXLe6d">The Rust Programming Language</span></a><span class="qXLe6d FrIlee"><span class="fYyStc YVIcad">Mar 3, 2021 · </span><img src="thumb.png"><span>An introductory book about Rust, covering ownership and borrowing.</span></span></div>
</body></html>"#;
        let parsed = parse(html, ReturnType::Full);
        let first = parsed[0].as_ref().expect("result");
        assert_eq!(
            first.description,
            "An introductory book about Rust, covering ownership and borrowing."
        );
        assert_eq!(first.fallback_page, first.description);
    }

    #[test]
    fn secondary_without_anchor_uses_whole_text() {
        let parsed = parse(SECONDARY_HTML, ReturnType::Full);
        let second = parsed[1].as_ref().expect("result");
        assert!(second.title.is_empty());
        assert_eq!(second.description, "Related searches: rust book online free edition");
        assert!(!second.needs_passage);
    }

    #[test]
    fn extract_drops_blocked_and_untitled_results() {
        let candidates = GoogleExtractor.extract(
            PRIMARY_HTML,
            ReturnType::Full,
            None,
            &SearchConfig::default(),
        );
        let links: Vec<&str> = candidates.iter().map(|c| c.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://www.rust-lang.org/",
                "https://en.wikipedia.org/wiki/Rust_(programming_language)"
            ]
        );
    }

    #[test]
    fn extract_empty_page_is_empty() {
        let candidates = GoogleExtractor.extract(
            "<html><body><p>unusual traffic</p></body></html>",
            ReturnType::Full,
            None,
            &SearchConfig::default(),
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn clean_url_unwraps_redirect() {
        assert_eq!(
            clean_url("https://www.google.com/url?q=https://example.com/x&sa=U"),
            "https://example.com/x"
        );
        assert_eq!(
            clean_url("https://www.google.com/url?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"),
            "https://example.com/a?b=c"
        );
    }

    #[test]
    fn clean_url_keeps_non_redirects() {
        assert_eq!(clean_url("https://example.com/page"), "https://example.com/page");
        assert_eq!(
            clean_url("https://www.google.com/search?q=rust+book"),
            "https://www.google.com/search?q=rust+book"
        );
        assert_eq!(clean_url("not a url"), "not a url");
    }

    #[test]
    fn params_cover_paging_and_year() {
        let request = SearchRequest {
            end_year: Some(2020),
            ..SearchRequest::new("rust borrow checker").with_page(3)
        };
        let params = GoogleExtractor.params(&request);
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("q"), Some("rust borrow checker"));
        assert_eq!(get("gl"), Some("US"));
        assert_eq!(get("start"), Some("20"));
        assert_eq!(get("tbs"), Some("cdr:1,cd_min:,cd_max:2020"));
    }

    #[test]
    fn params_first_page_has_no_offset() {
        let params = GoogleExtractor.params(&SearchRequest::new("q"));
        assert!(params.iter().all(|(k, _)| k != "start"));
        assert!(params.iter().all(|(k, _)| k != "tbs"));
    }

    #[test]
    fn params_pass_through_overrides() {
        let request = SearchRequest {
            end_year: Some(2020),
            ..SearchRequest::new("q")
                .with_param("hl", "de")
                .with_param("tbs", "qdr:w")
                .with_param("setlang", "en")
        };
        let params = GoogleExtractor.params(&request);
        assert!(params.contains(&("hl".to_owned(), "de".to_owned())));
        assert!(params.contains(&("tbs".to_owned(), "qdr:w".to_owned())));
        assert_eq!(params.iter().filter(|(k, _)| k == "tbs").count(), 1);
        assert!(params.iter().all(|(k, _)| k != "setlang"));
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GoogleExtractor>();
    }
}
