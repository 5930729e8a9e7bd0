//! OpenAI-compatible Provider Implementation
//!
//! Talks to any server exposing the `/chat/completions` API with tool
//! calling (OpenAI, Azure-style gateways, Ollama's `/v1` endpoint, ...).
//!
//! # Features
//!
//! - The request's `FunctionSchema` becomes a single forced tool call
//! - Retry logic with exponential backoff for transport errors, 429 and 5xx
//! - Timeout handling
//! - Unparsable tool arguments surface as `arguments: None`, not as an error
//!
//! # Examples
//!
//! ```no_run
//! use claimsift_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::from_env("gpt-4o-mini").unwrap();
//! ```

use crate::LlmError;
use claimsift_domain::traits::{CompletionProvider, CompletionRequest, CompletionResponse};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable overriding the endpoint
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";

/// Default timeout for completion requests (2 minutes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of transport attempts per completion
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// OpenAI-compatible completion provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    // Built on first use, on the calling (blocking) thread
    client: OnceLock<Client>,
    max_retries: u32,
    backoff_base: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    tools: Vec<Value>,
    tool_choice: Value,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
    #[serde(default)]
    function_call: Option<FunctionCall>,
}

#[derive(Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    #[serde(default)]
    arguments: Option<String>,
}

impl OpenAiProvider {
    /// Exponential backoff after the given failed attempt: base, 2x base,
    /// 4x base and so on, saturating instead of overflowing
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff_base.saturating_mul(factor)
    }

    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://api.openai.com/v1")
    /// - `model`: Model to use (e.g., "gpt-4o-mini")
    /// - `api_key`: Bearer token; `None` for local servers that need none
    ///
    /// The HTTP client is created lazily by the first `complete` call, so a
    /// provider can be built and dropped inside an async runtime.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, LlmError> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(LlmError::NotConfigured(format!("invalid endpoint: {}", endpoint)));
        }
        let model = model.into();
        if model.trim().is_empty() {
            return Err(LlmError::NotConfigured("model name is empty".to_string()));
        }

        Ok(Self {
            endpoint,
            model,
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client: OnceLock::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: Duration::from_secs(1),
        })
    }

    /// Create a provider from `OPENAI_API_KEY` (required) and
    /// `OPENAI_BASE_URL` (optional)
    pub fn from_env(model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| LlmError::NotConfigured(format!("missing {}", ENV_API_KEY)))?;
        let endpoint = std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        Self::new(endpoint, model, Some(api_key))
    }

    /// Set the maximum number of transport attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the base delay of the exponential backoff
    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.client = OnceLock::new();
        self
    }

    /// Model name in use
    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> Result<&Client, LlmError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let built = build_client(self.timeout)?;
        Ok(self.client.get_or_init(|| built))
    }

    fn request_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        let function = &request.function;
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            tools: vec![json!({
                "type": "function",
                "function": {
                    "name": function.name,
                    "description": function.description,
                    "parameters": function.to_parameters(),
                }
            })],
            tool_choice: json!({
                "type": "function",
                "function": { "name": function.name }
            }),
        }
    }
}

fn build_client(timeout: Duration) -> Result<Client, LlmError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))
}

/// Pull the function arguments out of a chat response
///
/// Prefers `tool_calls[0]`, falls back to the legacy `function_call`.
/// Arguments that are missing or not valid JSON yield `None`.
fn parse_arguments(response: ChatResponse) -> Option<Value> {
    let message = response.choices.into_iter().next()?.message;

    let raw = message
        .tool_calls
        .and_then(|calls| calls.into_iter().next())
        .map(|call| call.function)
        .or(message.function_call)
        .and_then(|f| f.arguments)?;

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Provider returned unparsable function arguments: {}", e);
            None
        }
    }
}

impl CompletionProvider for OpenAiProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, Self::Error> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = self.request_body(request);
        let client = self.client()?;

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            let mut builder = client.post(&url).json(&body);
            if let Some(key) = &self.api_key {
                builder = builder.bearer_auth(key);
            }

            match builder.send() {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response.json::<ChatResponse>().map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        let arguments = parse_arguments(parsed);
                        debug!(
                            function = %request.function.name,
                            has_arguments = arguments.is_some(),
                            "Completion received"
                        );
                        return Ok(CompletionResponse { arguments });
                    } else if status == StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else if status.is_server_error() {
                        let error_text = response
                            .text()
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    } else {
                        let error_text = response
                            .text()
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        return Err(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = self.backoff_delay(attempts);
                warn!(attempt = attempts, ?delay, "Completion request failed, backing off");
                thread::sleep(delay);
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsift_domain::{FieldSpec, FieldType, FunctionSchema};

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new("http://localhost:8080/v1/", "test-model", None).unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = provider();
        assert_eq!(provider.endpoint, "http://localhost:8080/v1");
        assert_eq!(provider.model(), "test-model");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            OpenAiProvider::new("localhost:8080", "m", None),
            Err(LlmError::NotConfigured(_))
        ));
        assert!(matches!(
            OpenAiProvider::new("http://localhost:8080", " ", None),
            Err(LlmError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_with_timeout() {
        let provider = provider().with_timeout(Duration::from_secs(5));
        assert_eq!(provider.timeout, Duration::from_secs(5));
        assert!(provider.client.get().is_none());
    }

    #[test]
    fn test_with_max_retries_never_zero() {
        let provider = provider().with_max_retries(0);
        assert_eq!(provider.max_retries, 1);
        let provider = provider.with_max_retries(5);
        assert_eq!(provider.max_retries, 5);
    }

    #[test]
    fn test_backoff_delay_saturates() {
        let provider = provider()
            .with_max_retries(100)
            .with_backoff(Duration::from_millis(10));
        assert_eq!(provider.backoff_delay(1), Duration::from_millis(10));
        assert_eq!(provider.backoff_delay(3), Duration::from_millis(40));
        assert_eq!(provider.backoff_delay(40), Duration::from_millis(10).saturating_mul(u32::MAX));
        assert_eq!(provider.backoff_delay(99), provider.backoff_delay(40));
    }

    #[test]
    fn test_request_body_forces_function() {
        let provider = provider();
        let schema = FunctionSchema::new("summarize_text", "Summarize the text.")
            .required_field(FieldSpec::new("summary", FieldType::String, "Summary"));
        let request = CompletionRequest::new("Hello", schema);

        let body = serde_json::to_value(provider.request_body(&request)).unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["content"], "Hello");
        assert_eq!(body["tools"][0]["function"]["name"], "summarize_text");
        assert_eq!(body["tools"][0]["function"]["parameters"]["required"], json!(["summary"]));
        assert_eq!(body["tool_choice"]["function"]["name"], "summarize_text");
    }

    fn response(value: Value) -> ChatResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_tool_call_arguments() {
        let parsed = parse_arguments(response(json!({
            "choices": [{ "message": { "tool_calls": [
                { "function": { "name": "f", "arguments": "{\"summary\": \"s\"}" } }
            ]}}]
        })));
        assert_eq!(parsed, Some(json!({ "summary": "s" })));
    }

    #[test]
    fn test_parse_legacy_function_call() {
        let parsed = parse_arguments(response(json!({
            "choices": [{ "message": {
                "tool_calls": null,
                "function_call": { "name": "f", "arguments": "{\"claims\": []}" }
            }}]
        })));
        assert_eq!(parsed, Some(json!({ "claims": [] })));
    }

    #[test]
    fn test_parse_invalid_arguments_is_none() {
        let parsed = parse_arguments(response(json!({
            "choices": [{ "message": { "tool_calls": [
                { "function": { "arguments": "{\"claims\": [" } }
            ]}}]
        })));
        assert!(parsed.is_none());
    }

    #[test]
    fn test_parse_no_choices_is_none() {
        assert!(parse_arguments(response(json!({ "choices": [] }))).is_none());
        assert!(parse_arguments(response(json!({
            "choices": [{ "message": { "content": "plain text" } }]
        })))
        .is_none());
    }

    #[test]
    fn test_connection_error_handling() {
        // Nothing listens on port 9 (discard) in the test environment
        let provider = OpenAiProvider::new("http://127.0.0.1:9", "test-model", None)
            .unwrap()
            .with_max_retries(1);
        let request = CompletionRequest::new("test", FunctionSchema::new("f", ""));

        match provider.complete(&request) {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other.map(|r| r.arguments)),
        }
    }
}
