//! Multinomial naive Bayes baseline.
//!
//! Each (topic, label) pair becomes a two-class model: the label versus
//! everything else. Text is tokenized into lowercase alphanumeric words, and
//! both word likelihoods and class priors use additive (Laplace) smoothing.
//! The reported score is the posterior probability of the winning class.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use intently_core::classifier::{Classifier, ClassifierTrainer};
use intently_types::classification::{ClassifierFamily, ClassifierVerdict};
use intently_types::error::ClassifierError;

/// Default additive smoothing constant.
pub const DEFAULT_SMOOTHING: f64 = 1.0;

/// Trains [`NaiveBayesClassifier`]s. Family: [`ClassifierFamily::NaiveBayes`].
#[derive(Debug, Clone, Copy)]
pub struct NaiveBayesTrainer {
    smoothing: f64,
}

impl NaiveBayesTrainer {
    pub fn new() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
        }
    }

    /// Use a custom smoothing constant. Non-positive values fall back to the
    /// default.
    pub fn with_smoothing(smoothing: f64) -> Self {
        if smoothing > 0.0 {
            Self { smoothing }
        } else {
            Self::new()
        }
    }
}

impl Default for NaiveBayesTrainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierTrainer for NaiveBayesTrainer {
    fn family(&self) -> ClassifierFamily {
        ClassifierFamily::NaiveBayes
    }

    fn train(
        &self,
        topic: &str,
        label: &str,
        positives: &[String],
        negatives: &[String],
    ) -> Result<Arc<dyn Classifier>, ClassifierError> {
        if positives.is_empty() {
            return Err(ClassifierError::Training {
                topic: topic.to_string(),
                label: label.to_string(),
                message: "no positive examples".to_string(),
            });
        }

        let total_docs = (positives.len() + negatives.len()) as f64;
        let positive = ClassModel::fit(positives, total_docs, self.smoothing);
        let negative = ClassModel::fit(negatives, total_docs, self.smoothing);

        let vocabulary: HashSet<String> = positive
            .counts
            .keys()
            .chain(negative.counts.keys())
            .cloned()
            .collect();

        tracing::trace!(
            topic,
            label,
            vocabulary = vocabulary.len(),
            "naive bayes model fitted"
        );

        Ok(Arc::new(NaiveBayesClassifier {
            label: label.to_string(),
            positive,
            negative,
            vocabulary,
            smoothing: self.smoothing,
        }))
    }
}

/// Word counts and prior for one class.
#[derive(Debug, Clone)]
struct ClassModel {
    log_prior: f64,
    counts: HashMap<String, u32>,
    total: u64,
}

impl ClassModel {
    fn fit(docs: &[String], total_docs: f64, smoothing: f64) -> Self {
        let mut counts: HashMap<String, u32> = HashMap::new();
        let mut total = 0u64;
        for doc in docs {
            for token in tokenize(doc) {
                *counts.entry(token).or_default() += 1;
                total += 1;
            }
        }

        let prior = (docs.len() as f64 + smoothing) / (total_docs + 2.0 * smoothing);
        Self {
            log_prior: prior.ln(),
            counts,
            total,
        }
    }

    fn log_likelihood(&self, tokens: &[String], vocabulary_size: usize, smoothing: f64) -> f64 {
        let denominator = self.total as f64 + smoothing * vocabulary_size as f64;
        tokens.iter().fold(self.log_prior, |acc, token| {
            let count = self.counts.get(token).copied().unwrap_or(0) as f64;
            acc + ((count + smoothing) / denominator).ln()
        })
    }
}

/// A fitted two-class naive Bayes model for one label.
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    label: String,
    positive: ClassModel,
    negative: ClassModel,
    vocabulary: HashSet<String>,
    smoothing: f64,
}

impl NaiveBayesClassifier {
    /// Posterior probability that `text` belongs to the label.
    pub fn probability(&self, text: &str) -> f64 {
        // Words never seen in training carry no evidence either way.
        let tokens: Vec<String> = tokenize(text)
            .filter(|token| self.vocabulary.contains(token))
            .collect();

        let size = self.vocabulary.len();
        let positive = self.positive.log_likelihood(&tokens, size, self.smoothing);
        let negative = self.negative.log_likelihood(&tokens, size, self.smoothing);

        // Logistic of the log-odds.
        1.0 / (1.0 + (negative - positive).exp())
    }
}

impl Classifier for NaiveBayesClassifier {
    fn classify(&self, text: &str) -> Result<ClassifierVerdict, ClassifierError> {
        let probability = self.probability(text);
        if probability > 0.5 {
            Ok(ClassifierVerdict::new(self.label.as_str(), probability))
        } else {
            Ok(ClassifierVerdict::negative(1.0 - probability))
        }
    }
}

/// Lowercase alphanumeric words.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn greeting_classifier() -> Arc<dyn Classifier> {
        NaiveBayesTrainer::new()
            .train(
                "smalltalk",
                "hello",
                &phrases(&["hello", "hi there"]),
                &phrases(&["will it rain", "is it sunny"]),
            )
            .unwrap()
    }

    #[test]
    fn test_tokenize() {
        let tokens: Vec<_> = tokenize("Hi, there!  New-York 2day").collect();
        assert_eq!(tokens, vec!["hi", "there", "new", "york", "2day"]);
    }

    #[test]
    fn positive_text_gets_label_with_posterior_score() {
        let verdict = greeting_classifier().classify("Hello!").unwrap();
        assert_eq!(verdict.label, "hello");
        // P(hello|pos) = 2/11, P(hello|neg) = 1/14, equal priors.
        let expected = (2.0 / 11.0) / (2.0 / 11.0 + 1.0 / 14.0);
        assert!((verdict.score - expected).abs() < 1e-9);
    }

    #[test]
    fn negative_text_gets_false_label() {
        let verdict = greeting_classifier().classify("will it rain today").unwrap();
        assert!(verdict.is_negative());
        assert!(verdict.score > 0.5);
    }

    #[test]
    fn unseen_words_fall_back_to_priors() {
        let verdict = greeting_classifier().classify("quantum chromodynamics").unwrap();
        // Equal priors give exactly 0.5, which is not enough to claim the label.
        assert!(verdict.is_negative());
        assert!((verdict.score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn training_without_negatives_still_works() {
        let classifier = NaiveBayesTrainer::new()
            .train("smalltalk", "hello", &phrases(&["hello"]), &[])
            .unwrap();
        let verdict = classifier.classify("hello").unwrap();
        assert_eq!(verdict.label, "hello");
        assert!(verdict.score > 0.5 && verdict.score <= 1.0);
    }

    #[test]
    fn training_without_positives_is_an_error() {
        let err = NaiveBayesTrainer::new()
            .train("smalltalk", "hello", &[], &phrases(&["rain"]))
            .err()
            .unwrap();
        assert!(matches!(err, ClassifierError::Training { ref label, .. } if label == "hello"));
    }

    #[test]
    fn non_positive_smoothing_uses_default() {
        let trainer = NaiveBayesTrainer::with_smoothing(0.0);
        assert_eq!(trainer.smoothing, DEFAULT_SMOOTHING);
        assert_eq!(trainer.family(), ClassifierFamily::NaiveBayes);
    }
}
