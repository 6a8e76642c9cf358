//! Plain-text rendering of results for the terminal.

use std::fmt::Write;

use scout_search::{ReturnType, SearchEngine, SearchOutcome, SearchResult, NO_EVIDENCE};

const RULE: &str = "\t-----------------------------------------------------";

/// One result: header lines, then the snippet, then the remaining fields
/// as `name : value` lines. Only fields `return_type` asks for are shown.
pub fn render_result(result: &SearchResult, return_type: ReturnType) -> String {
    let mut out = String::new();
    if return_type.wants_title() && !result.title.is_empty() {
        let _ = writeln!(out, "\t{}", result.title);
    }
    if return_type.wants_link() && !result.link.is_empty() {
        let _ = writeln!(out, "\t{}", result.link);
        let _ = writeln!(out, "{RULE}");
    }
    if return_type.wants_description() && !result.description.is_empty() {
        let _ = writeln!(out, "{}", result.description);
    }
    if return_type == ReturnType::Full {
        for (name, value) in [("raw_url", &result.raw_url), ("page", &result.page)] {
            if !value.is_empty() {
                let _ = writeln!(out, "{name} : {value}");
            }
        }
    }
    out.push('\n');
    out
}

/// A ranked search outcome.
pub fn render_outcome(outcome: &SearchOutcome, return_type: ReturnType) -> String {
    match outcome {
        SearchOutcome::Found(result) => render_result(result, return_type),
        SearchOutcome::NoEvidence => format!("{NO_EVIDENCE}\n"),
    }
}

/// Every result of a listing, or the no-evidence line when there are none.
pub fn render_listing(results: &[SearchResult], return_type: ReturnType) -> String {
    if results.is_empty() {
        return format!("{NO_EVIDENCE}\n");
    }
    results
        .iter()
        .map(|result| render_result(result, return_type))
        .collect()
}

/// Name and description of an engine.
pub fn render_summary(engine: SearchEngine) -> String {
    format!("\t{}\n{RULE}\n{}\n", engine.name(), engine.summary())
}
