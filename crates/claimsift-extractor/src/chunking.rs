//! Text chunking for large documents
//!
//! Greedy sentence packing: sentences (UAX #29 boundaries, each keeping its
//! trailing whitespace) are appended to the current chunk until the next one
//! would overflow it. A sentence longer than the limit is split at word
//! boundaries, and a word longer than the limit at char boundaries.
//!
//! Every chunk is a contiguous slice of the input, so concatenating the
//! chunks reproduces the input exactly.

use claimsift_domain::Chunk;
use unicode_segmentation::UnicodeSegmentation;

/// Splits text into chunks of at most `max_chunk_size` chars
pub struct TextChunker {
    max_chunk_size: usize,
}

impl TextChunker {
    /// Create a new text chunker. A size of 0 is treated as 1.
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size: max_chunk_size.max(1),
        }
    }

    /// Chunk the given text. Empty text yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let mut packer = Packer::new(text, self.max_chunk_size);
        for (start, sentence) in text.split_sentence_bound_indices() {
            self.feed_sentence(&mut packer, start, sentence);
        }
        packer.finish()
    }

    fn feed_sentence(&self, packer: &mut Packer<'_>, start: usize, sentence: &str) {
        if sentence.chars().count() <= self.max_chunk_size {
            packer.push(start, sentence);
            return;
        }
        for (offset, word) in sentence.split_word_bound_indices() {
            self.feed_word(packer, start + offset, word);
        }
    }

    fn feed_word(&self, packer: &mut Packer<'_>, start: usize, word: &str) {
        if word.chars().count() <= self.max_chunk_size {
            packer.push(start, word);
            return;
        }
        // Split at char boundaries, max_chunk_size chars per piece
        let mut piece_start = 0;
        let mut count = 0;
        for (idx, _) in word.char_indices() {
            if count == self.max_chunk_size {
                packer.push(start + piece_start, &word[piece_start..idx]);
                piece_start = idx;
                count = 0;
            }
            count += 1;
        }
        packer.push(start + piece_start, &word[piece_start..]);
    }
}

/// Accumulates contiguous segments into chunks
struct Packer<'a> {
    text: &'a str,
    limit: usize,
    start: usize,
    end: usize,
    chars: usize,
    char_offset: usize,
    chunks: Vec<Chunk>,
}

impl<'a> Packer<'a> {
    fn new(text: &'a str, limit: usize) -> Self {
        Self {
            text,
            limit,
            start: 0,
            end: 0,
            chars: 0,
            char_offset: 0,
            chunks: Vec::new(),
        }
    }

    /// Append the segment at byte offset `start`; segments arrive in order
    /// and never exceed the limit on their own
    fn push(&mut self, start: usize, segment: &str) {
        let len = segment.chars().count();
        if self.chars > 0 && self.chars + len > self.limit {
            self.flush();
        }
        if self.chars == 0 {
            self.start = start;
        }
        self.end = start + segment.len();
        self.chars += len;
    }

    fn flush(&mut self) {
        if self.chars == 0 {
            return;
        }
        let index = self.chunks.len();
        self.chunks.push(Chunk::new(
            index,
            self.char_offset,
            &self.text[self.start..self.end],
        ));
        self.char_offset += self.chars;
        self.chars = 0;
        self.start = self.end;
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.flush();
        self.chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_no_chunking_needed_for_small_text() {
        let chunker = TextChunker::new(100);
        let text = "Short text here.";
        let chunks = chunker.chunk(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].offset, 0);
    }

    #[test]
    fn test_empty_text() {
        let chunker = TextChunker::new(100);
        assert!(chunker.chunk("").is_empty());
    }

    #[test]
    fn test_packs_whole_sentences() {
        let chunker = TextChunker::new(25);
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = chunker.chunk(text);

        assert_eq!(
            texts(&chunks),
            vec!["First sentence here. ", "Second sentence here. ", "Third sentence here."]
        );
    }

    #[test]
    fn test_combines_sentences_until_limit() {
        let chunker = TextChunker::new(45);
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = chunker.chunk(text);

        assert_eq!(
            texts(&chunks),
            vec!["First sentence here. Second sentence here. ", "Third sentence here."]
        );
        assert_eq!(chunks[1].index, 1);
        assert_eq!(chunks[1].offset, 43);
    }

    #[test]
    fn test_paragraphs_are_boundaries() {
        let chunker = TextChunker::new(30);
        let text = "First paragraph here\n\nSecond paragraph here";
        let chunks = chunker.chunk(text);

        assert_eq!(texts(&chunks), vec!["First paragraph here\n\n", "Second paragraph here"]);
    }

    #[test]
    fn test_long_sentence_split_at_words() {
        let chunker = TextChunker::new(12);
        let text = "alpha beta gamma delta epsilon";
        let chunks = chunker.chunk(text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.char_len() <= 12);
        }
        assert_eq!(chunks[0].text, "alpha beta ");
        assert_eq!(texts(&chunks).concat(), text);
    }

    #[test]
    fn test_very_long_word_split_at_chars() {
        let chunker = TextChunker::new(20);
        let text = "a".repeat(100);
        let chunks = chunker.chunk(&text);

        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| c.char_len() == 20));
    }

    #[test]
    fn test_multibyte_limit_counts_chars() {
        let chunker = TextChunker::new(3);
        let text = "ééééé";
        let chunks = chunker.chunk(text);

        assert_eq!(texts(&chunks), vec!["ééé", "éé"]);
        assert_eq!(chunks[1].offset, 3);
    }

    proptest! {
        /// Property: chunks cover the text exactly and respect the bound
        #[test]
        fn test_chunk_coverage(text in "\\PC{0,400}", size in 1usize..60) {
            let chunks = TextChunker::new(size).chunk(&text);

            let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
            prop_assert_eq!(&rebuilt, &text);

            let mut offset = 0;
            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.index, i);
                prop_assert_eq!(chunk.offset, offset);
                prop_assert!(!chunk.text.is_empty());
                prop_assert!(chunk.char_len() <= size);
                offset += chunk.char_len();
            }
        }

        /// Property: sentence-shaped text round-trips with whitespace intact
        #[test]
        fn test_chunk_coverage_sentences(
            sentences in proptest::collection::vec("[A-Z][a-z]{1,12}( [a-z]{1,10}){0,8}[.!?]", 0..20),
            size in 5usize..200,
        ) {
            let text = sentences.join(" \n");
            let chunks = TextChunker::new(size).chunk(&text);

            let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
            prop_assert_eq!(rebuilt, text);
            prop_assert!(chunks.iter().all(|c| c.char_len() <= size));
        }
    }
}
