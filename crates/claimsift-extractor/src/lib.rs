//! Claimsift Extractor
//!
//! Turns a document into rows of source-grounded factual claims.
//!
//! # Overview
//!
//! A document (URL, PDF or text file) is split into chunks. Each chunk is
//! sent to a structured completion provider, which must fill in an
//! `extract_claims` function call. Malformed batches are retried a bounded
//! number of times; a chunk that never yields a well-formed batch produces
//! nothing. Every accepted claim is checked against its chunk by the
//! Gatekeeper and appended to a CSV file straight away.
//!
//! # Architecture
//!
//! ```text
//! Source → DocumentLoader → TextChunker ─┬→ Summarizer → TopicIndex
//!                                        └→ ClaimExtractor → Gatekeeper → CsvSink
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use claimsift_domain::TopicTaxonomy;
//! use claimsift_extractor::{CsvSink, ExtractorConfig, Pipeline, StaticTopicIndex};
//! use claimsift_llm::OpenAiProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OpenAiProvider::from_env("gpt-4o-mini")?;
//! let topics = StaticTopicIndex::new(
//!     TopicTaxonomy::new().with_topic("Geography", ["Capital Cities"]),
//! );
//! let sink = CsvSink::new("claims.csv");
//!
//! let pipeline = Pipeline::new(provider, topics, sink, ExtractorConfig::default());
//! let report = pipeline.run("notes.txt", "geography facts", None).await?;
//!
//! println!("{} rows, {} verified", report.rows_written, report.verified_count);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod prompt;
mod chunking;
mod parser;
mod extractor;
mod summarizer;
mod topics;
mod content;
mod sink;
mod pipeline;


pub use error::{AttemptFailure, ExtractorError};
pub use config::ExtractorConfig;
pub use types::{
    BatchReport, ChunkExtraction, ChunkReport, DocumentFailure, DocumentSummary,
    ExtractionOutcome, PipelineReport,
};
pub use prompt::{claim_extraction_function, summarization_function, PromptBuilder};
pub use chunking::TextChunker;
pub use parser::{parse_claims, parse_summary};
pub use extractor::ClaimExtractor;
pub use summarizer::{truncate_summary, Summarizer};
pub use topics::{StaticTopicIndex, DEFAULT_MAX_TOPICS};
pub use content::{DocumentLoader, SourceKind};
pub use sink::CsvSink;
pub use pipeline::Pipeline;
