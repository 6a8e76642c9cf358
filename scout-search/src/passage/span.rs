//! Match spans: boundary extension, merging and rendering.

use super::fuzzy::NearMatch;
use super::text::ELLIPSIS;

/// Characters that end a sentence-like unit of page text.
pub const STOP_CHARS: [char; 4] = ['\n', '\t', '.', '}'];

/// Half-open character range `[start, end)` into page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchSpan {
    /// First character covered.
    pub start: usize,
    /// One past the last character covered.
    pub end: usize,
}

impl MatchSpan {
    /// Create a span. `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} after end {end}");
        Self { start, end }
    }
}

fn is_stop(ch: &char) -> bool {
    STOP_CHARS.contains(ch)
}

/// Grow a match outwards so it covers whole sentences.
///
/// The end moves forward to include the first stop character at or after
/// the match's last character; a match whose last character is already a
/// stop character keeps its end. The start moves back to just after the
/// closest stop character before it, or to the beginning of the text.
pub fn extend_to_boundaries(text: &[char], found: &NearMatch) -> MatchSpan {
    let end = found.end.min(text.len());
    let start = found.start.min(end);

    let end = match end
        .checked_sub(1)
        .and_then(|last| text[last..].iter().position(is_stop))
    {
        Some(offset) if offset > 0 => end + offset,
        _ => end,
    };

    let start = text[..start]
        .iter()
        .rposition(is_stop)
        .map_or(0, |stop| stop + 1);

    MatchSpan::new(start, end)
}

/// Merge spans into a minimal set of disjoint covering ranges.
///
/// Spans are sorted by start. A span starting at or before the running end
/// of the previous merged span extends it; touching spans therefore merge.
pub fn merge_spans(mut spans: Vec<MatchSpan>) -> Vec<MatchSpan> {
    spans.sort();

    let mut merged: Vec<MatchSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Concatenate the text of `spans`, separated by the ellipsis marker.
pub fn render(text: &[char], spans: &[MatchSpan]) -> String {
    spans
        .iter()
        .map(|span| {
            let end = span.end.min(text.len());
            let start = span.start.min(end);
            text[start..end].iter().collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(ELLIPSIS)
}
