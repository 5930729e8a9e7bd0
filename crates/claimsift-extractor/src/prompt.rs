//! Prompts and output schemas for the completion provider

use claimsift_domain::{FieldSpec, FieldType, FunctionSchema};

/// Name of the claim extraction function
pub const EXTRACT_CLAIMS: &str = "extract_claims";

/// Name of the summarization function
pub const SUMMARIZE_TEXT: &str = "summarize_text";

/// Builds the per-chunk claim extraction prompt
pub struct PromptBuilder<'a> {
    goal: &'a str,
    topics: &'a str,
    summary: &'a str,
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for one chunk
    pub fn new(text: &'a str) -> Self {
        Self {
            goal: "",
            topics: "",
            summary: "",
            text,
        }
    }

    /// Set the research goal
    pub fn goal(mut self, goal: &'a str) -> Self {
        self.goal = goal;
        self
    }

    /// Set the formatted topic list
    pub fn topics(mut self, topics: &'a str) -> Self {
        self.topics = topics;
        self
    }

    /// Set the document summary
    pub fn summary(mut self, summary: &'a str) -> Self {
        self.summary = summary;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("Research goal:\n");
        prompt.push_str(self.goal);
        prompt.push_str("\n\n");

        prompt.push_str("Topics and subtopics:\n");
        if self.topics.trim().is_empty() {
            prompt.push_str("(none provided)\n");
        } else {
            prompt.push_str(self.topics);
            if !self.topics.ends_with('\n') {
                prompt.push('\n');
            }
        }
        prompt.push('\n');

        prompt.push_str("Summary of the whole document:\n");
        prompt.push_str(self.summary);
        prompt.push_str("\n\n");

        prompt.push_str("Section to extract claims from:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt
    }
}

/// Build the summarization prompt for the first large chunk
pub fn summarization_prompt(text: &str, goal: &str) -> String {
    format!(
        "Document:\n---\n{}\n---\n\nResearch goal:\n{}\n\n{}",
        text, goal, SUMMARIZATION_INSTRUCTIONS
    )
}

/// Schema of the claim extraction call
pub fn claim_extraction_function() -> FunctionSchema {
    let claim = FieldType::Object(vec![
        FieldSpec::new(
            "source",
            FieldType::String,
            "The exact passage of the section the claim is taken from",
        ),
        FieldSpec::new("claim", FieldType::String, "One factual claim made by the passage"),
        FieldSpec::new(
            "relevant",
            FieldType::Boolean,
            "Whether the claim is relevant to the research goal and topics",
        ),
        FieldSpec::new(
            "debate_question",
            FieldType::String,
            "A debate question the claim answers or supports",
        ),
        FieldSpec::new("topic", FieldType::String, "Closest topic from the topic list"),
        FieldSpec::new(
            "subtopic",
            FieldType::String,
            "Closest subtopic of that topic from the topic list",
        ),
    ]);

    FunctionSchema::new(
        EXTRACT_CLAIMS,
        "Extract every factual claim from the section, classify each one by topic \
         and subtopic, mark whether it is relevant to the goal, and attach a debate question.",
    )
    .required_field(FieldSpec::new(
        "claims",
        FieldType::Array(Box::new(claim)),
        "Claims extracted from the current section, in reading order",
    ))
}

/// Schema of the summarization call
pub fn summarization_function() -> FunctionSchema {
    FunctionSchema::new(
        SUMMARIZE_TEXT,
        "Summarize the document and classify its topic and subtopic.",
    )
    .required_field(FieldSpec::new(
        "summary",
        FieldType::String,
        "Detailed summary of the document",
    ))
    .field(FieldSpec::new("topic", FieldType::String, "Broad primary topic"))
    .field(FieldSpec::new("subtopic", FieldType::String, "Specific subtopic"))
    .field(FieldSpec::new(
        "explanation",
        FieldType::String,
        "Why the document is or isn't relevant to the research goal",
    ))
    .field(FieldSpec::new(
        "relevant",
        FieldType::Boolean,
        "Whether the document is relevant to the research goal",
    ))
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract the factual claims made in the section above.

Rules:
- Quote the passage each claim comes from verbatim in "source". Copy it exactly from the section; do not paraphrase it.
- One statement per claim. Split compound sentences into separate claims; several claims may share a source.
- Skip questions, headings, fiction, opinions and rhetoric. Keep only claims that could be proven or disproven.
- Never use bare pronouns or nicknames. Name people, organizations and events in full, with titles and affiliations, so each claim stands alone without the section.
- Avoid duplicate claims.
- Pick "topic" and "subtopic" from the topic list above.
- Set "relevant" to true only when the claim bears on the research goal.
- Write a "debate_question" the claim answers or is foundational to.

Call the extract_claims function with a "claims" array. Each element has the keys source, claim, relevant, debate_question, topic and subtopic."#;

const SUMMARIZATION_INSTRUCTIONS: &str = r#"Read the document and:
- Summarize it in detail
- Name its closest topic and subtopic
- Decide whether it is relevant to the research goal
- Explain why it is or isn't relevant

Call the summarize_text function with your answer."#;
