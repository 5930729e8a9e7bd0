//! Explicit record of sources that have already been processed

use std::collections::HashSet;

/// Set of already-processed sources
///
/// Owned by whichever component walks a list of sources and passed around by
/// reference. Surrounding whitespace is always ignored. For URLs a
/// `#fragment` and a trailing `/` are ignored too; file paths are compared
/// as written, since `#` is an ordinary file name character.
#[derive(Debug, Clone, Default)]
pub struct SeenLinks {
    seen: HashSet<String>,
}

impl SeenLinks {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a source. Returns `true` if it had not been seen before.
    pub fn insert(&mut self, source: &str) -> bool {
        self.seen.insert(normalize(source))
    }

    /// Whether a source has already been recorded
    pub fn contains(&self, source: &str) -> bool {
        self.seen.contains(&normalize(source))
    }

    /// Number of distinct sources recorded
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

fn normalize(source: &str) -> String {
    let trimmed = source.trim();
    if !trimmed.starts_with("http") {
        return trimmed.to_string();
    }
    let without_fragment = trimmed.split('#').next().unwrap_or(trimmed);
    without_fragment.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_reports_first_sighting() {
        let mut seen = SeenLinks::new();
        assert!(seen.insert("https://example.com/post"));
        assert!(!seen.insert("https://example.com/post"));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_normalization() {
        let mut seen = SeenLinks::new();
        seen.insert("https://example.com/post/");

        assert!(seen.contains("https://example.com/post"));
        assert!(seen.contains("  https://example.com/post#comments "));
        assert!(!seen.contains("https://example.com/other"));
    }

    #[test]
    fn test_file_paths() {
        let mut seen = SeenLinks::new();
        assert!(seen.is_empty());
        seen.insert("docs/report.pdf");
        assert!(seen.contains("docs/report.pdf"));
        assert!(!seen.contains("docs/report.txt"));
    }

    #[test]
    fn test_hash_in_file_name_is_kept() {
        let mut seen = SeenLinks::new();
        assert!(seen.insert("reports/q#1.txt"));
        assert!(seen.insert("reports/q#2.txt"));
        assert!(!seen.insert(" reports/q#1.txt "));
        assert!(!seen.contains("reports/q"));
        assert_eq!(seen.len(), 2);
    }
}
