//! Error types for the Extractor

use thiserror::Error;

/// Errors that stop processing of a document
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Document content could not be acquired
    #[error("Content error: {0}")]
    Content(String),

    /// Source is neither a URL nor a supported file type
    #[error("Unsupported source: {0} (expected a URL, .pdf or .txt file)")]
    UnsupportedSource(String),

    /// Summarization call failed or returned no summary
    #[error("Summary error: {0}")]
    Summary(String),

    /// Result sink failed to write
    #[error("Sink error: {0}")]
    Sink(String),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Whether the error came from acquiring the document itself
    ///
    /// Input errors end the current document only; a batch run moves on.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ExtractorError::Content(_) | ExtractorError::UnsupportedSource(_)
        )
    }
}

impl From<std::io::Error> for ExtractorError {
    fn from(e: std::io::Error) -> Self {
        ExtractorError::Io(e.to_string())
    }
}

impl From<csv::Error> for ExtractorError {
    fn from(e: csv::Error) -> Self {
        ExtractorError::Csv(e.to_string())
    }
}

/// Why one extraction attempt produced no usable batch
///
/// Every variant is retryable. None of them ever escapes the retry loop as
/// an `Err`; exhausting the attempts yields an empty claim list instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// Provider returned no structured arguments at all
    #[error("no structured arguments returned")]
    NoArguments,

    /// Arguments lacked a `claims` array (absent, null, or not an array)
    #[error("claims array missing")]
    MissingClaims,

    /// One candidate in the batch failed shape validation
    #[error("claim {index} malformed: {reason}")]
    MalformedClaim {
        /// Position of the candidate in the returned array
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// Provider call failed at the transport level
    #[error("provider error: {0}")]
    Provider(String),

    /// Provider call exceeded the configured timeout
    #[error("provider call timed out")]
    Timeout,
}
