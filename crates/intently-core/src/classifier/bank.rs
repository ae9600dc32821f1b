//! The classifier bank: one trained classifier per (topic, label) pair.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use intently_types::classification::{Classification, ClassifierFamily, NEGATIVE_LABEL};
use intently_types::error::ClassifierError;
use intently_types::phrases::TopicCollection;

use super::{Classifier, ClassifierTrainer};

/// Two-level mapping topic -> label -> classifier.
///
/// Built once, then only read while requests are processed. Topics and labels
/// iterate in sorted order, so classification output order is deterministic.
#[derive(Clone)]
pub struct ClassifierBank {
    family: ClassifierFamily,
    topics: BTreeMap<String, BTreeMap<String, Arc<dyn Classifier>>>,
}

impl ClassifierBank {
    /// Create an empty bank whose classifiers belong to `family`.
    pub fn new(family: ClassifierFamily) -> Self {
        Self {
            family,
            topics: BTreeMap::new(),
        }
    }

    /// Register (or replace) the classifier for one pair.
    pub fn insert(
        &mut self,
        topic: impl Into<String>,
        label: impl Into<String>,
        classifier: Arc<dyn Classifier>,
    ) {
        self.topics
            .entry(topic.into())
            .or_default()
            .insert(label.into(), classifier);
    }

    /// Builder-style variant of [`ClassifierBank::insert`].
    pub fn with_classifier(
        mut self,
        topic: impl Into<String>,
        label: impl Into<String>,
        classifier: impl Classifier + 'static,
    ) -> Self {
        self.insert(topic, label, Arc::new(classifier));
        self
    }

    pub fn family(&self) -> ClassifierFamily {
        self.family
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Number of (topic, label) pairs.
    pub fn len(&self) -> usize {
        self.topics.values().map(BTreeMap::len).sum()
    }

    /// Topic names in sorted order.
    pub fn topics(&self) -> Vec<&str> {
        self.topics.keys().map(String::as_str).collect()
    }

    /// Label names under a topic, in sorted order.
    pub fn labels(&self, topic: &str) -> Vec<&str> {
        self.topics
            .get(topic)
            .map(|labels| labels.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Run every classifier against `text` and keep the positive verdicts.
    ///
    /// Verdicts carrying the negative label are discarded. The first
    /// classifier error aborts the whole round.
    pub fn classify_all(&self, text: &str) -> Result<Vec<Classification>, ClassifierError> {
        let mut classifications = Vec::new();
        for (topic, labels) in &self.topics {
            for classifier in labels.values() {
                let verdict = classifier.classify(text)?;
                if verdict.is_negative() {
                    continue;
                }
                classifications.push(Classification {
                    label: verdict.label,
                    topic: topic.clone(),
                    value: verdict.score,
                });
            }
        }
        Ok(classifications)
    }
}

impl std::fmt::Debug for ClassifierBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierBank")
            .field("family", &self.family)
            .field("topics", &self.topics.len())
            .field("pairs", &self.len())
            .finish()
    }
}

/// Train a complete bank from a phrase collection.
///
/// Every (topic, label) pair gets its own classifier. Positives are the
/// pair's phrases; negatives are every other phrase in the collection that is
/// not also a positive. Labels named `false` are never trained themselves:
/// their phrases only serve as negatives. A pair without phrases is an error.
pub fn train_bank(
    trainer: &dyn ClassifierTrainer,
    collection: &TopicCollection,
) -> Result<ClassifierBank, ClassifierError> {
    let mut bank = ClassifierBank::new(trainer.family());

    for (topic, labels) in collection.topics() {
        for (label, positives) in labels {
            if label == NEGATIVE_LABEL {
                continue;
            }
            if positives.is_empty() {
                return Err(ClassifierError::Training {
                    topic: topic.to_string(),
                    label: label.clone(),
                    message: "no example phrases".to_string(),
                });
            }

            let negatives: Vec<String> = collection
                .topics()
                .flat_map(|(other_topic, other_labels)| {
                    other_labels
                        .iter()
                        .filter(move |(other_label, _)| {
                            other_topic != topic || *other_label != label
                        })
                        .flat_map(|(_, phrases)| phrases.iter())
                })
                .filter(|phrase| !positives.contains(phrase))
                .cloned()
                .collect();

            debug!(
                topic,
                label = label.as_str(),
                positives = positives.len(),
                negatives = negatives.len(),
                "training classifier"
            );

            let classifier = trainer.train(topic, label, positives, &negatives)?;
            bank.insert(topic, label.as_str(), classifier);
        }
    }

    Ok(bank)
}
