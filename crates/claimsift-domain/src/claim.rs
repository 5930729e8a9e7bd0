//! Claim module - the unit of output

use serde::{Deserialize, Serialize};

/// Fixed header of the tabular output, in column order
pub const OUTPUT_HEADER: [&str; 8] = [
    "Input",
    "Source",
    "Claim",
    "Relevant",
    "In Source Text",
    "Topic",
    "Subtopic",
    "Debate Question",
];

/// A factual claim extracted from one chunk of a document
///
/// All six fields are required. A `Claim` is only built after the whole
/// batch it arrived in has passed shape validation, so a partially formed
/// claim never exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Exact quoted text from the chunk the claim is derived from
    #[serde(rename = "source")]
    pub source_span: String,

    /// The factual assertion itself
    #[serde(rename = "claim")]
    pub claim_text: String,

    /// Whether the claim matches the research goal's topics
    pub relevant: bool,

    /// A debate question the claim is evidence for
    pub debate_question: String,

    /// Topic from the taxonomy (passed through unvalidated)
    pub topic: String,

    /// Subtopic from the taxonomy (passed through unvalidated)
    pub subtopic: String,
}

impl Claim {
    /// Wire names of the six required keys, in schema order
    pub const REQUIRED_KEYS: [&'static str; 6] = [
        "source",
        "claim",
        "relevant",
        "debate_question",
        "topic",
        "subtopic",
    ];
}

/// A claim annotated with the result of source verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedClaim {
    /// The claim as extracted
    pub claim: Claim,

    /// An approximate match of the source span was found in the chunk
    pub verified_in_source: bool,
}

/// One persisted row: the document source plus a validated claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    /// Document source (URL or file path)
    pub input: String,

    /// The validated claim
    pub claim: ValidatedClaim,
}

impl OutputRow {
    /// Create a new output row
    pub fn new(input: impl Into<String>, claim: ValidatedClaim) -> Self {
        Self {
            input: input.into(),
            claim,
        }
    }

    /// Flatten into the eight output columns, in [`OUTPUT_HEADER`] order
    pub fn to_record(&self) -> [String; 8] {
        let c = &self.claim.claim;
        [
            self.input.clone(),
            c.source_span.clone(),
            c.claim_text.clone(),
            c.relevant.to_string(),
            self.claim.verified_in_source.to_string(),
            c.topic.clone(),
            c.subtopic.clone(),
            c.debate_question.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claim() -> Claim {
        Claim {
            source_span: "Paris is the capital of France".to_string(),
            claim_text: "Paris is the capital city of France.".to_string(),
            relevant: true,
            debate_question: "Which city is the capital of France?".to_string(),
            topic: "Geography".to_string(),
            subtopic: "Capitals".to_string(),
        }
    }

    #[test]
    fn test_claim_deserializes_from_wire_names() {
        let json = serde_json::json!({
            "source": "Paris is the capital of France",
            "claim": "Paris is the capital city of France.",
            "relevant": true,
            "debate_question": "Which city is the capital of France?",
            "topic": "Geography",
            "subtopic": "Capitals"
        });

        let claim: Claim = serde_json::from_value(json).unwrap();
        assert_eq!(claim, sample_claim());
    }

    #[test]
    fn test_record_column_order() {
        let row = OutputRow::new(
            "notes.txt",
            ValidatedClaim {
                claim: sample_claim(),
                verified_in_source: false,
            },
        );

        let record = row.to_record();
        assert_eq!(record[0], "notes.txt");
        assert_eq!(record[1], "Paris is the capital of France");
        assert_eq!(record[3], "true");
        assert_eq!(record[4], "false");
        assert_eq!(record[5], "Geography");
        assert_eq!(record[6], "Capitals");
        assert_eq!(record[7], "Which city is the capital of France?");
        assert_eq!(record.len(), OUTPUT_HEADER.len());
    }
}
