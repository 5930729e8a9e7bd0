//! Topic lookup from a fixed, file-backed taxonomy

use crate::error::ExtractorError;
use claimsift_domain::traits::TopicIndex;
use claimsift_domain::TopicTaxonomy;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

/// Default number of topics passed to the extraction prompt
pub const DEFAULT_MAX_TOPICS: usize = 5;

/// Topic index over a whole in-memory taxonomy
///
/// Topics are ranked by how many words of their name and subtopic names
/// also occur in the summary. Words shorter than three chars are ignored.
#[derive(Debug, Clone)]
pub struct StaticTopicIndex {
    taxonomy: TopicTaxonomy,
    max_topics: usize,
}

impl StaticTopicIndex {
    /// Create an index over the given taxonomy
    pub fn new(taxonomy: TopicTaxonomy) -> Self {
        Self {
            taxonomy,
            max_topics: DEFAULT_MAX_TOPICS,
        }
    }

    /// Set how many topics a search keeps
    pub fn with_max_topics(mut self, max_topics: usize) -> Self {
        self.max_topics = max_topics.max(1);
        self
    }

    /// Load from TOML: a `[topics]` table of `topic = ["subtopic", ...]`
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let taxonomy: TopicTaxonomy =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        Ok(Self::new(taxonomy))
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExtractorError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents).map_err(ExtractorError::Config)
    }

    /// The whole taxonomy
    pub fn taxonomy(&self) -> &TopicTaxonomy {
        &self.taxonomy
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.unicode_words()
        .filter(|w| w.chars().count() >= 3)
        .map(str::to_lowercase)
}

impl TopicIndex for StaticTopicIndex {
    fn search_topics(&self, summary: &str) -> TopicTaxonomy {
        let summary_words: HashSet<String> = words(summary).collect();

        let mut scored: Vec<(usize, &str)> = self
            .taxonomy
            .topics
            .iter()
            .map(|(topic, subtopics)| {
                let score = std::iter::once(topic)
                    .chain(subtopics.iter())
                    .flat_map(|name| words(name))
                    .filter(|w| summary_words.contains(w))
                    .count();
                (score, topic.as_str())
            })
            .filter(|(score, _)| *score > 0)
            .collect();

        if scored.is_empty() {
            debug!("No topic overlaps the summary; using the whole taxonomy");
            return self.taxonomy.clone();
        }

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored.truncate(self.max_topics);
        debug!(topics = scored.len(), "Topics selected from summary");
        self.taxonomy.subset(scored.into_iter().map(|(_, topic)| topic))
    }
}
