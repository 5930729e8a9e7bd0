//! Approximate substring search
//!
//! Sellers' variant of the Levenshtein dynamic program: the pattern must be
//! matched in full, but the match may start and end anywhere in the text.
//! Row 0 of every column is 0 (free start), and the last row of each column
//! holds the best distance of a match ending at that text position.

/// A match of the pattern somewhere in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearMatch {
    /// Edit distance between the pattern and the matched substring
    pub distance: usize,
    /// Char index one past the last matched char of the text
    pub end: usize,
}

/// Best approximate occurrence of `pattern` in `text` within `max_distance`
///
/// Returns the lowest-distance match (earliest end on ties), or `None` when
/// every substring of `text` is more than `max_distance` edits away.
/// Stops scanning as soon as an exact match is found.
pub fn find_best_match(pattern: &str, text: &str, max_distance: usize) -> Option<NearMatch> {
    let pattern: Vec<char> = pattern.chars().collect();
    let m = pattern.len();

    // The empty substring at position 0 is always m edits away
    let mut best = (m <= max_distance).then_some(NearMatch { distance: m, end: 0 });
    if m == 0 {
        return best;
    }

    let mut prev: Vec<usize> = (0..=m).collect();
    let mut cur = vec![0usize; m + 1];

    for (j, c) in text.chars().enumerate() {
        cur[0] = 0;
        for i in 1..=m {
            let substitution = prev[i - 1] + usize::from(pattern[i - 1] != c);
            let deletion = prev[i] + 1;
            let insertion = cur[i - 1] + 1;
            cur[i] = substitution.min(deletion).min(insertion);
        }

        let distance = cur[m];
        if distance <= max_distance && best.map_or(true, |b| distance < b.distance) {
            best = Some(NearMatch { distance, end: j + 1 });
            if distance == 0 {
                break;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}

/// Whether `text` contains `pattern` within `max_distance` edits
pub fn contains_near(pattern: &str, text: &str, max_distance: usize) -> bool {
    find_best_match(pattern, text, max_distance).is_some()
}

/// Collapse every whitespace run into a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
