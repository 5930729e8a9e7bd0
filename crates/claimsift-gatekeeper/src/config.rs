//! Gatekeeper configuration

use crate::GatekeeperError;
use serde::{Deserialize, Serialize};

/// Largest accepted edit-distance tolerance
pub const MAX_EDIT_DISTANCE_LIMIT: usize = 64;

/// Configuration for source grounding checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingConfig {
    /// Maximum Levenshtein distance between the cited span and some
    /// substring of the chunk
    pub max_edit_distance: usize,

    /// Collapse whitespace runs in span and chunk before matching
    pub normalize_whitespace: bool,

    /// Compare case-sensitively
    pub case_sensitive: bool,
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: 6,
            normalize_whitespace: true,
            case_sensitive: true,
        }
    }
}

impl GroundingConfig {
    /// Exact substring matching only
    pub fn strict() -> Self {
        Self {
            max_edit_distance: 0,
            normalize_whitespace: false,
            case_sensitive: true,
        }
    }

    /// Wider tolerance, case-insensitive
    pub fn lenient() -> Self {
        Self {
            max_edit_distance: 12,
            normalize_whitespace: true,
            case_sensitive: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.max_edit_distance > MAX_EDIT_DISTANCE_LIMIT {
            return Err(GatekeeperError::Config(format!(
                "max_edit_distance {} exceeds limit {}",
                self.max_edit_distance, MAX_EDIT_DISTANCE_LIMIT
            )));
        }
        Ok(())
    }
}
