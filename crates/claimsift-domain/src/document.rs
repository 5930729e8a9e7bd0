//! Documents and the chunks they are split into

/// A document identified by its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Source identifier: a URL or a local file path
    pub source: String,

    /// Full plain text of the document
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// Whether the source looks like a web URL
    pub fn is_url(&self) -> bool {
        self.source.starts_with("http")
    }
}

/// A contiguous slice of a document's text
///
/// Chunks of one document are ordered by `index` and never overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in the document (0-based)
    pub index: usize,

    /// Char offset of the first char of this chunk within the document
    pub offset: usize,

    /// Raw chunk text
    pub text: String,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(index: usize, offset: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            offset,
            text: text.into(),
        }
    }

    /// Length of the chunk in chars
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(Document::new("https://example.com/a", "").is_url());
        assert!(Document::new("http://example.com", "").is_url());
        assert!(!Document::new("papers/report.pdf", "").is_url());
    }

    #[test]
    fn test_chunk_char_len_counts_chars_not_bytes() {
        let chunk = Chunk::new(0, 0, "café");
        assert_eq!(chunk.char_len(), 4);
        assert_eq!(chunk.text.len(), 5);
    }
}
