//! CSV result sink
//!
//! The header is written once by `initialize`. Every `append` reopens the
//! file in append mode and flushes before returning, so rows written before
//! a crash stay on disk.

use crate::error::ExtractorError;
use claimsift_domain::traits::ResultSink;
use claimsift_domain::{OutputRow, OUTPUT_HEADER};
use csv::{Terminator, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Append-only CSV file with the fixed 8-column header
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvSink {
    /// Create a sink writing to `path`; nothing is touched until `initialize`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_record<I, S>(&self, file: File, record: I) -> Result<(), ExtractorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);
        writer.write_record(record)?;
        writer.flush()?;
        Ok(())
    }
}

/// Normalize `\r\n` and lone `\r` to `\n`
fn normalize_newlines(field: &str) -> String {
    field.replace("\r\n", "\n").replace('\r', "\n")
}

impl ResultSink for CsvSink {
    type Error = ExtractorError;

    fn initialize(&self) -> Result<(), Self::Error> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let file = File::create(&self.path)
            .map_err(|e| ExtractorError::Sink(format!("{}: {}", self.path.display(), e)))?;
        self.write_record(file, OUTPUT_HEADER)?;
        debug!(path = %self.path.display(), "Output initialized");
        Ok(())
    }

    fn append(&self, row: &OutputRow) -> Result<(), Self::Error> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| ExtractorError::Sink(format!("{}: {}", self.path.display(), e)))?;
        let record = row.to_record().map(|field| normalize_newlines(&field));
        self.write_record(file, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsift_domain::{Claim, ValidatedClaim};

    fn row(claim_text: &str, verified: bool) -> OutputRow {
        OutputRow::new(
            "doc.txt",
            ValidatedClaim {
                claim: Claim {
                    source_span: "Paris is the capital of France".to_string(),
                    claim_text: claim_text.to_string(),
                    relevant: true,
                    debate_question: "Is Paris the capital?".to_string(),
                    topic: "Geography".to_string(),
                    subtopic: "Capitals".to_string(),
                },
                verified_in_source: verified,
            },
        )
    }

    #[test]
    fn test_initialize_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out.csv"));
        sink.initialize().unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(
            contents,
            "Input,Source,Claim,Relevant,In Source Text,Topic,Subtopic,Debate Question\n"
        );
    }

    #[test]
    fn test_initialize_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out.csv"));
        sink.initialize().unwrap();
        sink.append(&row("first", true)).unwrap();
        sink.initialize().unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn test_append_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out.csv"));
        sink.initialize().unwrap();
        sink.append(&row("first", true)).unwrap();
        sink.append(&row("second", false)).unwrap();

        let mut reader = csv::Reader::from_path(sink.path()).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "doc.txt");
        assert_eq!(&records[0][2], "first");
        assert_eq!(&records[0][3], "true");
        assert_eq!(&records[0][4], "true");
        assert_eq!(&records[1][2], "second");
        assert_eq!(&records[1][4], "false");
    }

    #[test]
    fn test_fields_are_quoted_and_newlines_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out.csv"));
        sink.initialize().unwrap();
        sink.append(&row("one, two\r\nthree", true)).unwrap();

        let raw = std::fs::read_to_string(sink.path()).unwrap();
        assert!(!raw.contains('\r'));
        assert!(raw.contains("\"one, two\nthree\""));

        let mut reader = csv::Reader::from_path(sink.path()).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[2], "one, two\nthree");
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        use std::sync::Arc;

        const WRITERS: usize = 8;
        const ROWS: usize = 50;

        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(CsvSink::new(dir.path().join("out.csv")));
        sink.initialize().unwrap();

        let handles: Vec<_> = (0..WRITERS)
            .map(|writer| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for n in 0..ROWS {
                        let text = format!("writer {} row {}, with a comma\nand a newline", writer, n);
                        sink.append(&row(&text, n % 2 == 0)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut reader = csv::Reader::from_path(sink.path()).unwrap();
        assert_eq!(reader.headers().unwrap(), &csv::StringRecord::from(OUTPUT_HEADER.to_vec()));
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), WRITERS * ROWS);

        let mut claims: Vec<String> = records
            .iter()
            .inspect(|r| assert_eq!(r.len(), OUTPUT_HEADER.len()))
            .map(|r| r[2].to_string())
            .collect();
        claims.sort();
        let mut expected: Vec<String> = (0..WRITERS)
            .flat_map(|w| {
                (0..ROWS).map(move |n| format!("writer {} row {}, with a comma\nand a newline", w, n))
            })
            .collect();
        expected.sort();
        assert_eq!(claims, expected);
    }

    #[test]
    fn test_unwritable_path() {
        let sink = CsvSink::new("/nonexistent/dir/out.csv");
        assert!(matches!(sink.initialize(), Err(ExtractorError::Sink(_))));
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }
}
