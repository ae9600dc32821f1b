//! Classifier capability traits and the classifier bank.
//!
//! The statistical model itself is external: anything that maps text to a
//! best label and a confidence can implement [`Classifier`]. A
//! [`ClassifierTrainer`] turns labelled phrases into one classifier per
//! (topic, label) pair, and [`bank::train_bank`] assembles those into a
//! [`ClassifierBank`].

pub mod bank;
pub mod shared;

use std::sync::Arc;

use intently_types::classification::{ClassifierFamily, ClassifierVerdict};
use intently_types::error::ClassifierError;

pub use bank::{ClassifierBank, train_bank};
pub use shared::SharedBank;

/// A trained binary classifier for one (topic, label) pair.
///
/// `classify` returns either the pair's label or the negative label
/// ([`intently_types::classification::NEGATIVE_LABEL`]) with a confidence in
/// `[0, 1]`.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<ClassifierVerdict, ClassifierError>;
}

/// Trains one [`Classifier`] from positive and negative example phrases.
pub trait ClassifierTrainer: Send + Sync {
    /// The family of classifiers this trainer produces.
    fn family(&self) -> ClassifierFamily;

    /// Train a classifier that answers `label` for text resembling
    /// `positives` and the negative label for text resembling `negatives`.
    fn train(
        &self,
        topic: &str,
        label: &str,
        positives: &[String],
        negatives: &[String],
    ) -> Result<Arc<dyn Classifier>, ClassifierError>;
}

/// Any `Fn(&str) -> Result<ClassifierVerdict, _>` closure is a classifier.
impl<F> Classifier for F
where
    F: Fn(&str) -> Result<ClassifierVerdict, ClassifierError> + Send + Sync,
{
    fn classify(&self, text: &str) -> Result<ClassifierVerdict, ClassifierError> {
        self(text)
    }
}
