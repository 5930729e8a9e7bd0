//! Claimsift Domain Layer
//!
//! This crate contains the value types and collaborator boundaries shared by
//! every other Claimsift crate. It carries no I/O of its own: infrastructure
//! (completion providers, file readers, output sinks) lives in other crates
//! and plugs in through the traits defined here.
//!
//! ## Key Concepts
//!
//! - **Document**: a source (URL or path) plus its full text
//! - **Chunk**: a bounded, contiguous slice of a document's text
//! - **Claim**: a factual assertion with the exact source span it came from
//! - **TopicTaxonomy**: topics mapped to subtopics, used to classify claims
//! - **FunctionSchema**: the declarative output schema handed to a completion provider
//!
//! ## Architecture
//!
//! - Pure data and validation logic only
//! - Trait definitions for every external interaction
//! - `serde_json` is the only notable dependency, since provider output is JSON

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod document;
pub mod schema;
pub mod seen_links;
pub mod taxonomy;
pub mod traits;

// Re-exports for convenience
pub use claim::{Claim, OutputRow, ValidatedClaim, OUTPUT_HEADER};
pub use document::{Chunk, Document};
pub use schema::{FieldSpec, FieldType, FunctionSchema};
pub use seen_links::SeenLinks;
pub use taxonomy::TopicTaxonomy;
