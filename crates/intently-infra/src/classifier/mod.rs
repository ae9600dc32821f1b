//! Classifier trainers shipped with Intently.
//!
//! Any [`intently_core::classifier::ClassifierTrainer`] can build a bank;
//! this module provides a small naive Bayes baseline so the pipeline works
//! out of the box.

pub mod naive_bayes;

pub use naive_bayes::{NaiveBayesClassifier, NaiveBayesTrainer};
