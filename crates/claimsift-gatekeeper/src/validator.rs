//! Source grounding checks for extracted claims

use crate::fuzzy::{collapse_whitespace, find_best_match};
use crate::GroundingConfig;
use claimsift_domain::{Claim, ValidatedClaim};
use std::borrow::Cow;
use tracing::debug;

/// Outcome of a grounding check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundingStatus {
    /// An approximate match of the span was found
    Verified,

    /// No substring of the chunk is within tolerance
    NotFound,

    /// The span was empty; no matching attempted
    EmptySource,
}

/// Result of verifying one source span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundingResult {
    /// Verification status
    pub status: GroundingStatus,

    /// Edit distance of the best match, when one was found
    pub best_distance: Option<usize>,
}

impl GroundingResult {
    /// Whether the span was found in the chunk
    pub fn verified(&self) -> bool {
        self.status == GroundingStatus::Verified
    }
}

/// The Gatekeeper verifies claims against their chunk before output
#[derive(Debug, Clone, Default)]
pub struct Gatekeeper {
    config: GroundingConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: GroundingConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(GroundingConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &GroundingConfig {
        &self.config
    }

    /// Check whether `source_span` approximately occurs in `chunk_text`
    ///
    /// The effective tolerance is `min(max_edit_distance, len - 1)` where
    /// `len` is the span length in chars, so at least one char must agree.
    /// Short spans can still match unrelated text within that bound.
    pub fn verify(&self, source_span: &str, chunk_text: &str) -> GroundingResult {
        let span = self.prepare(source_span);
        if span.trim().is_empty() {
            debug!("Claim source is empty");
            return GroundingResult {
                status: GroundingStatus::EmptySource,
                best_distance: None,
            };
        }

        let chunk = self.prepare(chunk_text);
        let span_len = span.chars().count();
        let tolerance = self.config.max_edit_distance.min(span_len - 1);

        match find_best_match(&span, &chunk, tolerance) {
            Some(found) => {
                debug!(distance = found.distance, "Claim source found in chunk");
                GroundingResult {
                    status: GroundingStatus::Verified,
                    best_distance: Some(found.distance),
                }
            }
            None => {
                debug!(tolerance, "Claim source not found in chunk");
                GroundingResult {
                    status: GroundingStatus::NotFound,
                    best_distance: None,
                }
            }
        }
    }

    /// `verified_in_source` for a claim extracted from `chunk_text`
    pub fn validate_claim(&self, claim: &Claim, chunk_text: &str) -> bool {
        self.verify(&claim.source_span, chunk_text).verified()
    }

    /// Attach the verification result to a claim
    pub fn annotate(&self, claim: Claim, chunk_text: &str) -> ValidatedClaim {
        let verified_in_source = self.validate_claim(&claim, chunk_text);
        ValidatedClaim {
            claim,
            verified_in_source,
        }
    }

    fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let text = if self.config.normalize_whitespace {
            Cow::Owned(collapse_whitespace(text))
        } else {
            Cow::Borrowed(text)
        };
        if self.config.case_sensitive {
            text
        } else {
            Cow::Owned(text.to_lowercase())
        }
    }
}

/// Check a claim against its chunk with the default configuration
pub fn validate_claim(claim: &Claim, chunk_text: &str) -> bool {
    Gatekeeper::default_config().validate_claim(claim, chunk_text)
}
