//! Report types for the extraction pipeline

use crate::error::AttemptFailure;
use claimsift_domain::Claim;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the retry loop for one chunk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionOutcome {
    /// An attempt produced a well-formed batch (possibly empty)
    Accepted,
    /// Every attempt failed; the chunk yields no claims
    Exhausted,
}

/// Result of extracting claims from one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkExtraction {
    /// Accepted claims in provider order; empty when exhausted
    pub claims: Vec<Claim>,

    /// Number of provider calls made
    pub attempts: u32,

    /// Terminal state of the retry loop
    pub outcome: ExtractionOutcome,

    /// Failure of each rejected attempt, in order
    pub failures: Vec<AttemptFailure>,
}

impl ChunkExtraction {
    /// Whether a batch was accepted
    pub fn accepted(&self) -> bool {
        self.outcome == ExtractionOutcome::Accepted
    }
}

/// Parsed output of the summarization call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Summary text, not yet truncated
    pub summary: String,

    /// Broad topic suggested by the model
    pub topic: Option<String>,

    /// Specific subtopic suggested by the model
    pub subtopic: Option<String>,

    /// Why the document is or isn't relevant to the goal
    pub explanation: Option<String>,

    /// Whether the document is relevant to the goal
    pub relevant: Option<bool>,
}

/// Per-chunk line of a pipeline report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkReport {
    /// Chunk position in the document
    pub index: usize,

    /// Chunk length in chars
    pub chars: usize,

    /// Provider calls made for this chunk
    pub attempts: u32,

    /// Terminal state of the retry loop
    pub outcome: ExtractionOutcome,

    /// Claims written for this chunk
    pub claims: usize,

    /// Claims whose source span was found in the chunk
    pub verified: usize,
}

/// Summary of one pipeline run over a single document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Unique id of this run (UUIDv7)
    pub run_id: Uuid,

    /// Document source (URL or path)
    pub source: String,

    /// Summary used for extraction, after truncation
    pub summary: String,

    /// Formatted topics passed to the extraction prompt
    pub topics: String,

    /// Number of extraction chunks
    pub chunk_count: usize,

    /// One entry per chunk, in order
    pub chunks: Vec<ChunkReport>,

    /// Data rows appended to the sink
    pub rows_written: usize,

    /// Rows with `verified_in_source = true`
    pub verified_count: usize,
}

/// A document that could not be processed in a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    /// Document source
    pub source: String,

    /// Error message
    pub reason: String,
}

/// Summary of a batch run over several documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Reports of documents that were processed
    pub documents: Vec<PipelineReport>,

    /// Documents that failed with an input error
    pub failures: Vec<DocumentFailure>,

    /// Sources skipped because they were already seen
    pub skipped: Vec<String>,
}

impl BatchReport {
    /// Total rows written across all documents
    pub fn rows_written(&self) -> usize {
        self.documents.iter().map(|d| d.rows_written).sum()
    }
}
