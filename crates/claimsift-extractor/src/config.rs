//! Configuration for the Extractor

use crate::error::ExtractorError;
use claimsift_gatekeeper::GroundingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the extraction pipeline
///
/// All sizes are in chars. Missing TOML keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum chunk size for the extraction pass
    pub chunk_size: usize,

    /// Maximum chunk size for the summarization pass (only the first
    /// chunk is summarized)
    pub summary_chunk_size: usize,

    /// Provider calls allowed per chunk before giving up on it
    pub max_attempts: u32,

    /// Summaries are truncated to this many chars before use
    pub max_summary_chars: usize,

    /// Per-call timeout in seconds; 0 disables the timeout
    pub call_timeout_secs: u64,

    /// Source grounding settings
    pub grounding: GroundingConfig,
}

impl ExtractorConfig {
    /// Get the per-call timeout as a Duration, if enabled
    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_secs > 0).then(|| Duration::from_secs(self.call_timeout_secs))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.summary_chunk_size == 0 {
            return Err("summary_chunk_size must be greater than 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        if self.max_summary_chars == 0 {
            return Err("max_summary_chars must be greater than 0".to_string());
        }
        self.grounding.validate().map_err(|e| e.to_string())?;
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            chunk_size: 7_200,
            summary_chunk_size: 40_000,
            max_attempts: 3,
            max_summary_chars: 1_200,
            call_timeout_secs: 120,
            grounding: GroundingConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: smaller chunks and a shorter timeout
    pub fn aggressive() -> Self {
        Self {
            chunk_size: 3_000,
            summary_chunk_size: 20_000,
            call_timeout_secs: 60,
            ..Self::default()
        }
    }

    /// Lenient preset: larger chunks, longer timeout, looser grounding
    pub fn lenient() -> Self {
        Self {
            chunk_size: 12_000,
            summary_chunk_size: 60_000,
            call_timeout_secs: 300,
            grounding: GroundingConfig::lenient(),
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExtractorError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&contents).map_err(ExtractorError::Config)?;
        config.validate().map_err(ExtractorError::Config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.max_summary_chars, 1_200);
        assert_eq!(config.grounding.max_edit_distance, 6);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::aggressive().validate().is_ok());
        assert!(ExtractorConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_chunk_size() {
        let mut config = ExtractorConfig::default();
        config.chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_max_attempts() {
        let mut config = ExtractorConfig::default();
        config.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_grounding_is_reported() {
        let mut config = ExtractorConfig::default();
        config.grounding.max_edit_distance = 1_000;
        assert!(config.validate().unwrap_err().contains("max_edit_distance"));
    }

    #[test]
    fn test_call_timeout() {
        let mut config = ExtractorConfig::default();
        assert_eq!(config.call_timeout(), Some(Duration::from_secs(120)));
        config.call_timeout_secs = 0;
        assert_eq!(config.call_timeout(), None);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml() {
        let parsed = ExtractorConfig::from_toml(
            "chunk_size = 500\n\n[grounding]\nmax_edit_distance = 3\n",
        )
        .unwrap();
        assert_eq!(parsed.chunk_size, 500);
        assert_eq!(parsed.max_attempts, 3);
        assert_eq!(parsed.grounding.max_edit_distance, 3);
        assert!(parsed.grounding.normalize_whitespace);
    }

    #[test]
    fn test_from_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_attempts = 0").unwrap();

        let result = ExtractorConfig::from_file(file.path());
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }
}
