//! Approximate substring search under Levenshtein distance.
//!
//! Sellers' dynamic programme: the pattern must be matched completely, but
//! may start anywhere in the text. One column of costs is kept per text
//! position together with the text index each alignment started at, so a
//! match's full range is known as soon as its end is found.

/// A region of the text within the allowed edit distance of the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearMatch {
    /// First character of the match.
    pub start: usize,
    /// One past the last character of the match.
    pub end: usize,
    /// Edit distance between the pattern and `text[start..end]`.
    pub distance: usize,
}

/// Find the first region of `text` within `max_distance` edits of `pattern`.
///
/// Among the consecutive end positions of that first region, the one with
/// the lowest distance wins (earliest on ties). Indices are character
/// indices into `text`.
pub fn find_near_match(pattern: &[char], text: &[char], max_distance: usize) -> Option<NearMatch> {
    let m = pattern.len();
    if m == 0 || text.is_empty() {
        return None;
    }

    // Column for the empty text prefix: matching i pattern chars against
    // nothing costs i deletions.
    let mut cost: Vec<usize> = (0..=m).collect();
    let mut origin: Vec<usize> = vec![0; m + 1];
    let mut next_cost = vec![0; m + 1];
    let mut next_origin = vec![0; m + 1];

    let mut best: Option<NearMatch> = None;

    for (j, &ch) in text.iter().enumerate() {
        next_cost[0] = 0;
        next_origin[0] = j + 1;

        for i in 1..=m {
            let substitution = cost[i - 1] + usize::from(pattern[i - 1] != ch);
            let deletion = next_cost[i - 1] + 1;
            let insertion = cost[i] + 1;

            let (value, from) = if substitution <= deletion && substitution <= insertion {
                (substitution, origin[i - 1])
            } else if deletion <= insertion {
                (deletion, next_origin[i - 1])
            } else {
                (insertion, origin[i])
            };
            next_cost[i] = value;
            next_origin[i] = from;
        }

        std::mem::swap(&mut cost, &mut next_cost);
        std::mem::swap(&mut origin, &mut next_origin);

        let end = j + 1;
        let distance = cost[m];
        let start = origin[m];
        if distance <= max_distance && start < end {
            if best.map_or(true, |current| distance < current.distance) {
                best = Some(NearMatch {
                    start,
                    end,
                    distance,
                });
            }
        } else if best.is_some() {
            // The first region has ended.
            break;
        }
    }

    best
}

/// Edit distance budget for a fragment: 10% of its length, rounded down.
pub fn tolerance(fragment_chars: usize) -> usize {
    fragment_chars / 10
}
