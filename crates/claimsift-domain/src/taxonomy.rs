//! Topic taxonomy used to classify claims

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mapping from topic name to its subtopic names
///
/// Ordered maps keep the formatted prompt text stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTaxonomy {
    /// Topic name to subtopic names
    #[serde(default)]
    pub topics: BTreeMap<String, BTreeSet<String>>,
}

impl TopicTaxonomy {
    /// Create an empty taxonomy
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a topic with its subtopics, merging into any existing entry
    pub fn insert<I, S>(&mut self, topic: impl Into<String>, subtopics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics
            .entry(topic.into())
            .or_default()
            .extend(subtopics.into_iter().map(Into::into));
    }

    /// Builder-style variant of [`TopicTaxonomy::insert`]
    pub fn with_topic<I, S>(mut self, topic: impl Into<String>, subtopics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(topic, subtopics);
        self
    }

    /// Whether the topic exists and, if given, lists the subtopic
    pub fn contains(&self, topic: &str, subtopic: Option<&str>) -> bool {
        match (self.topics.get(topic), subtopic) {
            (Some(subs), Some(sub)) => subs.contains(sub),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Keep only the named topics
    pub fn subset<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let topics = names
            .into_iter()
            .filter_map(|name| {
                self.topics
                    .get_key_value(name)
                    .map(|(k, v)| (k.clone(), v.clone()))
            })
            .collect();
        Self { topics }
    }

    /// Number of topics
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether there are no topics
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Render as prompt-insertable text, one topic per line
    pub fn format(&self) -> String {
        let mut out = String::new();
        for (topic, subtopics) in &self.topics {
            out.push_str("- ");
            out.push_str(topic);
            if !subtopics.is_empty() {
                out.push_str(": ");
                let subs: Vec<&str> = subtopics.iter().map(String::as_str).collect();
                out.push_str(&subs.join(", "));
            }
            out.push('\n');
        }
        out
    }
}
