//! Classifier verdicts and classifier family metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved label a classifier returns when its pair is not present.
pub const NEGATIVE_LABEL: &str = "false";

/// Topic whose labels are broadcast to every intent as place names.
pub const LOCATIONS_TOPIC: &str = "locations";

/// What a single classifier says about a text: its best label and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierVerdict {
    pub label: String,
    /// Confidence in `[0, 1]`.
    pub score: f64,
}

impl ClassifierVerdict {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Verdict meaning "this pair is not present in the text".
    pub fn negative(score: f64) -> Self {
        Self::new(NEGATIVE_LABEL, score)
    }

    pub fn is_negative(&self) -> bool {
        self.label == NEGATIVE_LABEL
    }
}

/// A positive verdict tied to the topic it was produced under.
///
/// Lives only for the duration of one extraction round.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub topic: String,
    pub value: f64,
}

/// Family of the trained classifiers in a bank.
///
/// Some families need a family-specific confidence correction before their
/// verdicts can be trusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierFamily {
    #[default]
    NaiveBayes,
    LogisticRegression,
}

impl fmt::Display for ClassifierFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierFamily::NaiveBayes => write!(f, "naive_bayes"),
            ClassifierFamily::LogisticRegression => write!(f, "logistic_regression"),
        }
    }
}
