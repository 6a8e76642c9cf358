//! Plain-text extraction and normalisation for passage matching.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};

/// Separator search engines put between snippet fragments.
pub const ELLIPSIS: &str = "...";

fn citation_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[0-9]*\]").expect("valid citation regex"))
}

fn horizontal_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\S\n]+").expect("valid space regex"))
}

fn line_break_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" ?\n[\s]*").expect("valid line break regex"))
}

fn bracketed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\(\[].*?[\)\]]").expect("valid bracket regex"))
}

fn body_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<body[\s/>]").expect("valid body regex"))
}

/// Extract the paragraph text of an HTML page.
///
/// Every `<p>` contributes its text followed by a newline. The result is
/// normalised with [`post_process`] and capped at `max_chars` characters.
/// Returns `None` when the source has no `<body>` tag. The parser would
/// synthesise one, so the check runs on the raw markup.
pub fn page_text(html: &str, max_chars: usize) -> Option<String> {
    if !body_tag().is_match(html) {
        return None;
    }
    let document = Html::parse_document(html);

    let paragraph = Selector::parse("p").ok()?;
    let mut text = String::new();
    for p in document.select(&paragraph) {
        text.extend(p.text());
        text.push('\n');
    }

    Some(truncate_chars(&post_process(&text), max_chars))
}

/// Normalise extracted or rendered text.
///
/// - trims the ends
/// - replaces citation markers such as `[12]` with a space
/// - turns `\r` and `\t` into `\n`
/// - collapses other whitespace runs into one space and line-break runs
///   into one `\n`
pub fn post_process(text: &str) -> String {
    let text = citation_marker().replace_all(text.trim(), " ");
    let text = text.replace("\r\n", "\n").replace(['\r', '\t'], "\n");
    let text = horizontal_space().replace_all(&text, " ");
    let text = line_break_run().replace_all(&text, "\n");
    text.trim().to_owned()
}

/// Remove every `(...)` or `[...]` group, shortest match first.
pub fn strip_bracketed(text: &str) -> String {
    bracketed().replace_all(text, "").into_owned()
}

/// Split a description on the ellipsis marker, keeping fragments longer
/// than `min_chars` characters, in their original order.
pub fn fragments(description: &str, min_chars: usize) -> Vec<&str> {
    description
        .split(ELLIPSIS)
        .filter(|fragment| fragment.chars().count() > min_chars)
        .collect()
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_owned(),
        None => text.to_owned(),
    }
}
