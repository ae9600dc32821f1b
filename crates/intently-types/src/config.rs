//! Pipeline configuration types.
//!
//! `PipelineConfig` represents the `intently.toml` file that controls
//! confidence filtering, extractor timeouts, reducer merge scope, and which
//! phrase sources train the classifier bank.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classification::ClassifierFamily;

/// Which lower-ranked candidates the default reducer absorbs details from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeScope {
    /// Every other candidate, whatever its topic.
    #[default]
    All,
    /// Only candidates sharing the winner's topic.
    SameTopic,
}

/// Top-level configuration for a pipeline instance.
///
/// All fields have defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Log candidates and decisions at info level.
    #[serde(default)]
    pub verbose: bool,

    /// Verdicts at or below this value are dropped when the bank was trained
    /// by a logistic-regression family classifier.
    #[serde(default = "default_logistic_regression_floor")]
    pub logistic_regression_floor: f64,

    /// Per-extractor timeout in milliseconds; `0` disables it.
    #[serde(default = "default_extractor_timeout_ms")]
    pub extractor_timeout_ms: u64,

    #[serde(default)]
    pub merge_scope: MergeScope,

    /// Merge the embedded default phrase collection into every bank.
    #[serde(default = "default_include_builtin_phrases")]
    pub include_builtin_phrases: bool,

    /// Extra phrase sources, loaded after the built-in collection.
    #[serde(default)]
    pub phrase_sources: Vec<PathBuf>,
}

fn default_logistic_regression_floor() -> f64 {
    0.6
}

fn default_extractor_timeout_ms() -> u64 {
    30_000
}

fn default_include_builtin_phrases() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            logistic_regression_floor: default_logistic_regression_floor(),
            extractor_timeout_ms: default_extractor_timeout_ms(),
            merge_scope: MergeScope::default(),
            include_builtin_phrases: default_include_builtin_phrases(),
            phrase_sources: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Confidence floor to apply for a classifier family, if any.
    pub fn confidence_floor(&self, family: ClassifierFamily) -> Option<f64> {
        match family {
            ClassifierFamily::LogisticRegression => Some(self.logistic_regression_floor),
            ClassifierFamily::NaiveBayes => None,
        }
    }

    /// Per-extractor timeout, or `None` when disabled.
    pub fn extractor_timeout(&self) -> Option<Duration> {
        (self.extractor_timeout_ms > 0).then(|| Duration::from_millis(self.extractor_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_default_values() {
        let config = PipelineConfig::default();
        assert!(!config.verbose);
        assert!((config.logistic_regression_floor - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.extractor_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.merge_scope, MergeScope::All);
        assert!(config.include_builtin_phrases);
        assert!(config.phrase_sources.is_empty());
    }

    #[test]
    fn test_pipeline_config_deserialize_with_defaults() {
        let config: PipelineConfig = toml::from_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_pipeline_config_deserialize_with_values() {
        let toml_str = r#"
verbose = true
logistic_regression_floor = 0.75
extractor_timeout_ms = 0
merge_scope = "same_topic"
include_builtin_phrases = false
phrase_sources = ["phrases/travel", "phrases/extra.toml"]
"#;
        let config: PipelineConfig = toml::from_str(toml_str).unwrap();
        assert!(config.verbose);
        assert!((config.logistic_regression_floor - 0.75).abs() < f64::EPSILON);
        assert_eq!(config.extractor_timeout(), None);
        assert_eq!(config.merge_scope, MergeScope::SameTopic);
        assert!(!config.include_builtin_phrases);
        assert_eq!(config.phrase_sources.len(), 2);
    }

    #[test]
    fn confidence_floor_applies_only_to_logistic_regression() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.confidence_floor(ClassifierFamily::LogisticRegression),
            Some(0.6)
        );
        assert_eq!(config.confidence_floor(ClassifierFamily::NaiveBayes), None);
    }
}
