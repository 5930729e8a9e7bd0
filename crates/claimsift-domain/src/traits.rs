//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction logic and its
//! collaborators. Implementations live in other crates.

use crate::{FunctionSchema, OutputRow, TopicTaxonomy};
use serde_json::Value;

/// A structured completion request: a prompt plus the function whose
/// arguments the provider must fill in
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Full prompt text
    pub prompt: String,

    /// Schema of the expected arguments; its name selects the function
    pub function: FunctionSchema,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(prompt: impl Into<String>, function: FunctionSchema) -> Self {
        Self {
            prompt: prompt.into(),
            function,
        }
    }
}

/// What a completion provider produced for a request
///
/// `arguments` is `None` when the provider returned no structured output at
/// all. Callers treat that as a retryable signal, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    /// Parsed function arguments, if any
    pub arguments: Option<Value>,
}

impl CompletionResponse {
    /// Response carrying the given arguments
    pub fn with_arguments(arguments: Value) -> Self {
        Self {
            arguments: Some(arguments),
        }
    }

    /// Response with no structured output
    pub fn empty() -> Self {
        Self { arguments: None }
    }
}

/// Trait for structured completion providers
///
/// Implemented by the infrastructure layer (claimsift-llm). Calls are
/// blocking; async callers run them on a blocking thread.
pub trait CompletionProvider {
    /// Error type for transport-level failures
    type Error;

    /// Ask the provider to fill in the request's function arguments
    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, Self::Error>;
}

/// Trait for topic lookup by document summary
pub trait TopicIndex {
    /// Select the part of the taxonomy relevant to a summary
    fn search_topics(&self, summary: &str) -> TopicTaxonomy;

    /// Render a taxonomy subset for insertion into a prompt
    fn format_topics(&self, topics: &TopicTaxonomy) -> String {
        topics.format()
    }
}

/// Trait for append-only output destinations
///
/// The sink is the sole writer of its destination.
pub trait ResultSink {
    /// Error type for write failures
    type Error;

    /// Prepare the destination and write the fixed header
    fn initialize(&self) -> Result<(), Self::Error>;

    /// Append one row
    fn append(&self, row: &OutputRow) -> Result<(), Self::Error>;
}

/// Trait for turning a URL into the plain body text of the rendered page
pub trait PageRenderer {
    /// Navigate to `url` and return its visible body text
    fn body_text(&self, url: &str) -> Result<String, String>;
}
