//! Claimsift Gatekeeper
//!
//! Checks that extracted claims are grounded in the text they were
//! extracted from.
//!
//! The Gatekeeper provides:
//! - Empty source rejection
//! - Approximate substring search with a bounded edit distance
//! - Optional whitespace and case normalization before matching
//!
//! A failed check is never an error: it becomes `verified_in_source = false`
//! on the output row.
//!
//! # Examples
//!
//! ```
//! use claimsift_gatekeeper::{Gatekeeper, GroundingConfig};
//!
//! let gatekeeper = Gatekeeper::new(GroundingConfig::default());
//! let result = gatekeeper.verify("The sky is blue today", "... the sky is blue todey ...");
//! assert!(result.verified());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod fuzzy;
mod validator;

pub use config::GroundingConfig;
pub use error::GatekeeperError;
pub use validator::{validate_claim, Gatekeeper, GroundingResult, GroundingStatus};
