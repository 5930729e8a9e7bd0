//! Parse structured provider arguments into typed claims and summaries
//!
//! Claim batches are all-or-nothing: if any candidate fails shape
//! validation the whole batch is rejected, and the retry loop asks again.

use crate::error::AttemptFailure;
use crate::prompt::{claim_extraction_function, summarization_function};
use crate::types::DocumentSummary;
use claimsift_domain::schema::missing_keys;
use claimsift_domain::Claim;
use serde_json::{Map, Value};
use tracing::debug;

/// Parse the arguments of an `extract_claims` call
///
/// Required keys, top level and per claim, come from
/// [`claim_extraction_function`]. `None` (no structured arguments) and a
/// missing or non-array `claims` key are attempt failures. `null` elements
/// are skipped.
pub fn parse_claims(arguments: Option<&Value>) -> Result<Vec<Claim>, AttemptFailure> {
    let arguments = match arguments {
        Some(Value::Null) | None => return Err(AttemptFailure::NoArguments),
        Some(args) => args,
    };

    let schema = claim_extraction_function();
    let object = arguments.as_object().ok_or(AttemptFailure::MissingClaims)?;
    if !schema.missing_required(object).is_empty() {
        return Err(AttemptFailure::MissingClaims);
    }
    let claims = object
        .get("claims")
        .and_then(Value::as_array)
        .ok_or(AttemptFailure::MissingClaims)?;
    let item_keys = schema
        .get("claims")
        .map(|field| field.item_keys())
        .unwrap_or_default();

    let mut parsed = Vec::with_capacity(claims.len());
    for (index, candidate) in claims.iter().enumerate() {
        match candidate {
            Value::Null => {
                debug!(index, "Skipping null claim");
            }
            Value::Object(object) => {
                let claim = parse_claim(object, &item_keys)
                    .map_err(|reason| AttemptFailure::MalformedClaim { index, reason })?;
                parsed.push(claim);
            }
            other => {
                return Err(AttemptFailure::MalformedClaim {
                    index,
                    reason: format!("expected an object, got {}", type_name(other)),
                });
            }
        }
    }

    Ok(parsed)
}

/// Shape-validate one candidate and build a `Claim` from it
fn parse_claim(object: &Map<String, Value>, required: &[&str]) -> Result<Claim, String> {
    let missing = missing_keys(object, required);
    if !missing.is_empty() {
        return Err(format!("missing keys: {}", missing.join(", ")));
    }

    Ok(Claim {
        source_span: string_field(object, "source")?,
        claim_text: string_field(object, "claim")?,
        relevant: bool_field(object, "relevant")?,
        debate_question: string_field(object, "debate_question")?,
        topic: string_field(object, "topic")?,
        subtopic: string_field(object, "subtopic")?,
    })
}

fn string_field(object: &Map<String, Value>, key: &str) -> Result<String, String> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(format!("'{}' must be a string, got {}", key, type_name(other))),
        None => Err(format!("missing '{}'", key)),
    }
}

fn bool_field(object: &Map<String, Value>, key: &str) -> Result<bool, String> {
    match object.get(key) {
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
        Some(other) => Err(format!("'{}' must be a boolean, got {}", key, type_name(other))),
        None => Err(format!("missing '{}'", key)),
    }
}

/// Parse the arguments of a `summarize_text` call
///
/// Required fields are those of [`summarization_function`]; optional fields
/// of the wrong type are ignored.
pub fn parse_summary(arguments: Option<&Value>) -> Result<DocumentSummary, String> {
    let object = arguments
        .and_then(Value::as_object)
        .ok_or_else(|| "no structured arguments returned".to_string())?;

    let schema = summarization_function();
    let missing = schema.missing_required(object);
    if !missing.is_empty() {
        return Err(format!("missing required fields: {}", missing.join(", ")));
    }

    let summary = match object.get("summary") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => return Err("summary missing".to_string()),
        Some(other) => return Err(format!("summary must be a string, got {}", type_name(other))),
    };

    let optional_string = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

    Ok(DocumentSummary {
        summary,
        topic: optional_string("topic"),
        subtopic: optional_string("subtopic"),
        explanation: optional_string("explanation"),
        relevant: object.get("relevant").and_then(Value::as_bool),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
