//! Snippet-to-passage recovery.
//!
//! Search engines show a truncated, ellipsis-joined snippet of each result.
//! [`PassageRecovery`] fetches the linked page, finds where each snippet
//! fragment occurs in the page's paragraph text (tolerating small edits),
//! grows those matches to sentence boundaries, merges them and renders the
//! fuller passage.
//!
//! # Pipeline
//!
//! 1. Reject descriptions too short to anchor on
//! 2. Fetch the page (cache enabled) and extract normalised paragraph text
//! 3. Split the description into fragments longer than 25 characters
//! 4. Fuzzy-match each fragment with a 10% edit budget
//! 5. Extend matches to stop characters
//! 6. If nothing matched, drop bracketed text from the page and retry once
//! 7. Merge overlapping or touching spans and render them joined by `...`

pub mod fuzzy;
pub mod span;
pub mod text;

use std::sync::Arc;

use crate::http::PageFetcher;

use fuzzy::{find_near_match, tolerance};
use span::{extend_to_boundaries, merge_spans, render, MatchSpan};
use text::{fragments, page_text, post_process, strip_bracketed};

/// Descriptions shorter than this (after trimming) carry too little signal.
pub const MIN_DESCRIPTION_CHARS: usize = 30;

/// Fragments must be longer than this to be used as anchors.
pub const MIN_FRAGMENT_CHARS: usize = 25;

/// Why no passage could be recovered. None of these are errors; the caller
/// falls back to text taken from the result block itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassageMiss {
    /// Missing link, or a description under [`MIN_DESCRIPTION_CHARS`].
    TooLittleSignal,
    /// Every fetch attempt for the page failed.
    Unreachable,
    /// The page source has no `<body>` tag.
    NoBody,
    /// No fragment could be located in the page text.
    NoMatch,
}

/// Recovers full passages for result snippets.
pub struct PassageRecovery {
    fetcher: Arc<PageFetcher>,
    max_page_chars: usize,
}

impl PassageRecovery {
    /// Create a recovery stage that fetches pages through `fetcher`.
    pub fn new(fetcher: Arc<PageFetcher>, max_page_chars: usize) -> Self {
        Self {
            fetcher,
            max_page_chars,
        }
    }

    /// Locate `description` in the page at `link` and return the passage.
    pub async fn recover_passage(&self, link: &str, description: &str) -> Result<String, PassageMiss> {
        if link.trim().is_empty() || description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(PassageMiss::TooLittleSignal);
        }

        let fetched = self.fetcher.fetch(link, true).await;
        if fetched.is_empty() {
            return Err(PassageMiss::Unreachable);
        }

        let text = page_text(&fetched.html, self.max_page_chars).ok_or(PassageMiss::NoBody)?;
        tracing::trace!(chars = text.len(), cache_hit = fetched.cache_hit, "matching snippet");

        locate_passage(&text, description).ok_or(PassageMiss::NoMatch)
    }
}

/// Find the passage of `page_text` that `description` was cut from.
///
/// Returns `None` when no fragment can be located, even after bracketed
/// text has been removed from the page.
pub fn locate_passage(page_text: &str, description: &str) -> Option<String> {
    let anchors = fragments(description, MIN_FRAGMENT_CHARS);
    if anchors.is_empty() {
        return None;
    }

    let mut chars: Vec<char> = page_text.chars().collect();
    let mut spans = match_spans(&chars, &anchors);

    if spans.is_empty() {
        chars = strip_bracketed(page_text).chars().collect();
        spans = match_spans(&chars, &anchors);
    }
    if spans.is_empty() {
        return None;
    }

    let merged = merge_spans(spans);
    let passage = post_process(&render(&chars, &merged));
    (!passage.is_empty()).then_some(passage)
}

/// Locate every fragment in `text`, returning extended spans sorted by start.
pub fn match_spans(text: &[char], anchors: &[&str]) -> Vec<MatchSpan> {
    let mut spans: Vec<MatchSpan> = anchors
        .iter()
        .filter_map(|anchor| {
            let pattern: Vec<char> = anchor.chars().collect();
            find_near_match(&pattern, text, tolerance(pattern.len()))
        })
        .map(|found| extend_to_boundaries(text, &found))
        .collect();
    spans.sort();
    spans
}
