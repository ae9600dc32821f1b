//! Labelled phrase collections used to train a classifier bank.
//!
//! A `TopicCollection` maps topic -> label -> example phrases. It is the
//! inline form of a phrase source and the merged result of loading several
//! sources from disk.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Example phrases grouped by topic and label.
///
/// Serialized as a plain nested map, e.g. in TOML:
///
/// ```toml
/// [locations]
/// new_york = ["new york", "nyc"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicCollection {
    topics: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl TopicCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add phrases to a topic/label pair, skipping duplicates and blanks.
    pub fn add_phrases<I, S>(&mut self, topic: &str, label: &str, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self
            .topics
            .entry(topic.to_string())
            .or_default()
            .entry(label.to_string())
            .or_default();
        for phrase in phrases {
            let phrase = phrase.into();
            let phrase = phrase.trim();
            if phrase.is_empty() || entry.iter().any(|p| p == phrase) {
                continue;
            }
            entry.push(phrase.to_string());
        }
    }

    /// Builder-style variant of [`TopicCollection::add_phrases`].
    pub fn with_phrases<I, S>(mut self, topic: &str, label: &str, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_phrases(topic, label, phrases);
        self
    }

    /// Fold another collection into this one, appending phrases per pair.
    pub fn merge(&mut self, other: TopicCollection) {
        for (topic, labels) in other.topics {
            for (label, phrases) in labels {
                self.add_phrases(&topic, &label, phrases);
            }
        }
    }

    /// Iterate topics in sorted order.
    pub fn topics(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Vec<String>>)> {
        self.topics.iter().map(|(topic, labels)| (topic.as_str(), labels))
    }

    /// Phrases registered for one pair.
    pub fn phrases(&self, topic: &str, label: &str) -> Option<&[String]> {
        self.topics
            .get(topic)
            .and_then(|labels| labels.get(label))
            .map(Vec::as_slice)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Total number of phrases across every pair.
    pub fn phrase_count(&self) -> usize {
        self.topics
            .values()
            .flat_map(|labels| labels.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Where a bank's training data comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PhraseSource {
    /// A phrase directory or a single `.toml`/`.json` collection file.
    Path(PathBuf),
    /// An in-memory collection.
    Inline(TopicCollection),
}

impl From<PathBuf> for PhraseSource {
    fn from(path: PathBuf) -> Self {
        PhraseSource::Path(path)
    }
}

impl From<TopicCollection> for PhraseSource {
    fn from(collection: TopicCollection) -> Self {
        PhraseSource::Inline(collection)
    }
}
