//! Document summarization: one provider call, no retries

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::extractor::call_provider;
use crate::parser::parse_summary;
use crate::prompt::{summarization_function, summarization_prompt};
use crate::types::DocumentSummary;
use claimsift_domain::traits::{CompletionProvider, CompletionRequest};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Truncate `summary` to at most `max_chars` chars
pub fn truncate_summary(summary: &str, max_chars: usize) -> String {
    match summary.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => summary[..byte_idx].to_string(),
        None => summary.to_string(),
    }
}

/// Produces the document summary used as context for extraction
pub struct Summarizer<P> {
    provider: Arc<P>,
    call_timeout: Option<Duration>,
}

impl<P> Summarizer<P>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
{
    /// Create a new Summarizer
    pub fn new(provider: Arc<P>, config: &ExtractorConfig) -> Self {
        Self {
            provider,
            call_timeout: config.call_timeout(),
        }
    }

    /// Summarize `text` (the first large chunk) with respect to `goal`
    ///
    /// The returned summary is untruncated; callers apply
    /// [`truncate_summary`].
    pub async fn summarize(&self, text: &str, goal: &str) -> Result<DocumentSummary, ExtractorError> {
        let request = CompletionRequest::new(summarization_prompt(text, goal), summarization_function());
        let response = call_provider(&self.provider, request, self.call_timeout)
            .await
            .map_err(|e| ExtractorError::Summary(e.to_string()))?;

        let summary = parse_summary(response.arguments.as_ref()).map_err(ExtractorError::Summary)?;
        debug!(
            topic = summary.topic.as_deref().unwrap_or(""),
            subtopic = summary.subtopic.as_deref().unwrap_or(""),
            relevant = ?summary.relevant,
            explanation = summary.explanation.as_deref().unwrap_or(""),
            "Document summarized"
        );
        Ok(summary)
    }
}
