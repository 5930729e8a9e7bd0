//! Claim extraction for one chunk: the bounded retry loop
//!
//! ```text
//! Attempting ─ok─→ Success
//!     │ failure
//!     ↓
//!   Retry ─attempts left─→ Attempting
//!     │ none left
//!     ↓
//!  Exhausted
//! ```

use crate::config::ExtractorConfig;
use crate::error::AttemptFailure;
use crate::parser::parse_claims;
use crate::prompt::{claim_extraction_function, PromptBuilder};
use crate::types::{ChunkExtraction, ExtractionOutcome};
use claimsift_domain::traits::{CompletionProvider, CompletionRequest, CompletionResponse};
use claimsift_domain::{Claim, FunctionSchema};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// State of the retry loop for one chunk
#[derive(Debug)]
enum AttemptState {
    /// About to make provider call number `attempt` (1-based)
    Attempting { attempt: u32 },
    /// Call number `attempt` failed
    Retry { attempt: u32, failure: AttemptFailure },
    /// A batch was accepted
    Success(Vec<Claim>),
    /// No attempts left
    Exhausted,
}

/// Requests structured claims for a chunk, retrying malformed output
pub struct ClaimExtractor<P> {
    provider: Arc<P>,
    function: FunctionSchema,
    max_attempts: u32,
    call_timeout: Option<Duration>,
}

impl<P> ClaimExtractor<P>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
{
    /// Create a new ClaimExtractor
    pub fn new(provider: Arc<P>, config: &ExtractorConfig) -> Self {
        Self {
            provider,
            function: claim_extraction_function(),
            max_attempts: config.max_attempts.max(1),
            call_timeout: config.call_timeout(),
        }
    }

    /// Maximum provider calls per chunk
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Extract claims from one chunk
    ///
    /// Never fails: when every attempt is rejected the result carries an
    /// empty claim list and `ExtractionOutcome::Exhausted`.
    pub async fn extract_from_chunk(
        &self,
        chunk_text: &str,
        summary: &str,
        goal: &str,
        topics: &str,
    ) -> ChunkExtraction {
        let prompt = PromptBuilder::new(chunk_text)
            .goal(goal)
            .topics(topics)
            .summary(summary)
            .build();
        let request = CompletionRequest::new(prompt, self.function.clone());

        let mut failures = Vec::new();
        let mut attempts = 0;
        let mut state = AttemptState::Attempting { attempt: 1 };

        loop {
            state = match state {
                AttemptState::Attempting { attempt } => {
                    attempts = attempt;
                    debug!(attempt, max = self.max_attempts, "Requesting claims");
                    match self.attempt(&request).await {
                        Ok(claims) => AttemptState::Success(claims),
                        Err(failure) => AttemptState::Retry { attempt, failure },
                    }
                }
                AttemptState::Retry { attempt, failure } => {
                    warn!(attempt, %failure, "Extraction attempt rejected");
                    failures.push(failure);
                    if attempt < self.max_attempts {
                        AttemptState::Attempting { attempt: attempt + 1 }
                    } else {
                        AttemptState::Exhausted
                    }
                }
                AttemptState::Success(claims) => {
                    info!(attempts, claims = claims.len(), "Claim batch accepted");
                    return ChunkExtraction {
                        claims,
                        attempts,
                        outcome: ExtractionOutcome::Accepted,
                        failures,
                    };
                }
                AttemptState::Exhausted => {
                    warn!(attempts, "Giving up on chunk; no claims extracted");
                    return ChunkExtraction {
                        claims: Vec::new(),
                        attempts,
                        outcome: ExtractionOutcome::Exhausted,
                        failures,
                    };
                }
            };
        }
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<Vec<Claim>, AttemptFailure> {
        let response = call_provider(&self.provider, request.clone(), self.call_timeout).await?;
        parse_claims(response.arguments.as_ref())
    }
}

/// Run one blocking provider call on the blocking pool
///
/// The timeout bounds the wait only; a timed-out call keeps running on its
/// thread until the provider returns.
pub(crate) async fn call_provider<P>(
    provider: &Arc<P>,
    request: CompletionRequest,
    call_timeout: Option<Duration>,
) -> Result<CompletionResponse, AttemptFailure>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
{
    let provider = Arc::clone(provider);
    let task = tokio::task::spawn_blocking(move || {
        provider
            .complete(&request)
            .map_err(|e| AttemptFailure::Provider(e.to_string()))
    });

    let joined = match call_timeout {
        Some(limit) => timeout(limit, task)
            .await
            .map_err(|_| AttemptFailure::Timeout)?,
        None => task.await,
    };

    joined.map_err(|e| AttemptFailure::Provider(format!("Task join error: {}", e)))?
}
