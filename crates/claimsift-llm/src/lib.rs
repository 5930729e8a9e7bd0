//! Claimsift Completion Provider Layer
//!
//! Pluggable implementations of the `CompletionProvider` trait from
//! `claimsift-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scripted provider for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions API with forced function calling
//!
//! # Examples
//!
//! ```
//! use claimsift_domain::traits::{CompletionProvider, CompletionRequest};
//! use claimsift_domain::FunctionSchema;
//! use claimsift_llm::MockProvider;
//! use serde_json::json;
//!
//! let provider = MockProvider::new(json!({ "summary": "A short summary" }));
//! let request = CompletionRequest::new("prompt", FunctionSchema::new("summarize_text", ""));
//! let response = provider.complete(&request).unwrap();
//! assert_eq!(response.arguments, Some(json!({ "summary": "A short summary" })));
//! ```

#![warn(missing_docs)]

pub mod openai;

use claimsift_domain::traits::{CompletionProvider, CompletionRequest, CompletionResponse};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur while talking to a completion provider
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded and retries exhausted
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider is missing required configuration (e.g. an API key)
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// One scripted reply of the [`MockProvider`]
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Return these function arguments
    Arguments(Value),
    /// Return a response with no structured arguments
    Empty,
    /// Fail with [`LlmError::Other`]
    Error(String),
}

impl MockReply {
    fn into_result(self) -> Result<CompletionResponse, LlmError> {
        match self {
            MockReply::Arguments(value) => Ok(CompletionResponse::with_arguments(value)),
            MockReply::Empty => Ok(CompletionResponse::empty()),
            MockReply::Error(msg) => Err(LlmError::Other(msg)),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    queued: HashMap<String, VecDeque<MockReply>>,
    per_function: HashMap<String, MockReply>,
    requests: Vec<CompletionRequest>,
}

/// Mock completion provider for deterministic testing
///
/// Replies are resolved per function name in this order: queued replies
/// (first in, first out), then the function's fixed reply, then the
/// provider-wide default. No network calls are made.
///
/// # Examples
///
/// ```
/// use claimsift_domain::traits::{CompletionProvider, CompletionRequest};
/// use claimsift_domain::FunctionSchema;
/// use claimsift_llm::{MockProvider, MockReply};
/// use serde_json::json;
///
/// let mut provider = MockProvider::empty();
/// provider.queue_reply("extract_claims", MockReply::Empty);
/// provider.add_response("extract_claims", json!({ "claims": [] }));
///
/// let request = CompletionRequest::new("prompt", FunctionSchema::new("extract_claims", ""));
/// assert_eq!(provider.complete(&request).unwrap().arguments, None);
/// assert_eq!(provider.complete(&request).unwrap().arguments, Some(json!({ "claims": [] })));
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a MockProvider returning the same arguments for every call
    pub fn new(arguments: Value) -> Self {
        Self::with_default(MockReply::Arguments(arguments))
    }

    /// Create a MockProvider that never returns structured arguments
    pub fn empty() -> Self {
        Self::with_default(MockReply::Empty)
    }

    /// Create a MockProvider with an explicit default reply
    pub fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Set the fixed arguments returned for a given function
    pub fn add_response(&mut self, function: impl Into<String>, arguments: Value) {
        self.lock()
            .per_function
            .insert(function.into(), MockReply::Arguments(arguments));
    }

    /// Configure a given function to always fail
    pub fn add_error(&mut self, function: impl Into<String>) {
        self.lock()
            .per_function
            .insert(function.into(), MockReply::Error("Mock error".to_string()));
    }

    /// Queue a one-shot reply for a given function
    pub fn queue_reply(&mut self, function: impl Into<String>, reply: MockReply) {
        self.lock()
            .queued
            .entry(function.into())
            .or_default()
            .push_back(reply);
    }

    /// Total number of calls made
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Number of calls made for a given function
    pub fn calls_for(&self, function: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.function.name == function)
            .count()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.lock().requests.iter().map(|r| r.prompt.clone()).collect()
    }

    /// Forget all recorded calls
    pub fn reset_call_count(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::empty()
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, Self::Error> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        let name = request.function.name.as_str();
        let reply = state
            .queued
            .get_mut(name)
            .and_then(VecDeque::pop_front)
            .or_else(|| state.per_function.get(name).cloned())
            .unwrap_or_else(|| self.default_reply.clone());

        reply.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsift_domain::FunctionSchema;
    use serde_json::json;

    fn request(function: &str) -> CompletionRequest {
        CompletionRequest::new(format!("prompt for {}", function), FunctionSchema::new(function, ""))
    }

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new(json!({ "summary": "s" }));
        let result = provider.complete(&request("anything")).unwrap();
        assert_eq!(result.arguments, Some(json!({ "summary": "s" })));
    }

    #[test]
    fn test_mock_provider_empty() {
        let provider = MockProvider::default();
        let result = provider.complete(&request("extract_claims")).unwrap();
        assert!(result.arguments.is_none());
    }

    #[test]
    fn test_mock_provider_per_function_responses() {
        let mut provider = MockProvider::empty();
        provider.add_response("summarize_text", json!({ "summary": "s" }));
        provider.add_response("extract_claims", json!({ "claims": [] }));

        assert_eq!(
            provider.complete(&request("summarize_text")).unwrap().arguments,
            Some(json!({ "summary": "s" }))
        );
        assert_eq!(
            provider.complete(&request("extract_claims")).unwrap().arguments,
            Some(json!({ "claims": [] }))
        );
        assert!(provider.complete(&request("other")).unwrap().arguments.is_none());
    }

    #[test]
    fn test_queued_replies_come_first_in_order() {
        let mut provider = MockProvider::new(json!({ "n": 0 }));
        provider.queue_reply("f", MockReply::Arguments(json!({ "n": 1 })));
        provider.queue_reply("f", MockReply::Empty);

        assert_eq!(provider.complete(&request("f")).unwrap().arguments, Some(json!({ "n": 1 })));
        assert_eq!(provider.complete(&request("f")).unwrap().arguments, None);
        assert_eq!(provider.complete(&request("f")).unwrap().arguments, Some(json!({ "n": 0 })));
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::empty();
        assert_eq!(provider.call_count(), 0);

        provider.complete(&request("a")).unwrap();
        provider.complete(&request("b")).unwrap();
        provider.complete(&request("a")).unwrap();

        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.calls_for("a"), 2);
        assert_eq!(provider.prompts()[1], "prompt for b");

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::empty();
        provider.add_error("extract_claims");

        let result = provider.complete(&request("extract_claims"));
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::empty();
        let provider2 = provider1.clone();

        provider1.complete(&request("a")).unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
