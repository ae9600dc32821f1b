use thiserror::Error;

/// Errors raised by a classifier capability or its trainer.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier '{topic}/{label}' failed: {message}")]
    Classify {
        topic: String,
        label: String,
        message: String,
    },

    #[error("cannot train '{topic}/{label}': {message}")]
    Training {
        topic: String,
        label: String,
        message: String,
    },
}

/// Errors from a single intent extractor.
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("{0}")]
    Failed(String),
}

/// Errors from a reducer.
#[derive(Debug, Error)]
#[error("reduction failed: {0}")]
pub struct ReducerError(pub String);

/// Errors from a skill.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SkillError(pub String);

/// Errors while loading phrase sources or training a bank from them.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read phrase source '{path}': {message}")]
    Io { path: String, message: String },

    #[error("cannot parse phrase source '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("invalid phrase source: {0}")]
    Invalid(String),

    #[error(transparent)]
    Training(#[from] ClassifierError),
}

/// Errors surfaced by `Pipeline::process`.
///
/// Every failure aborts the request; nothing is retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("extractor '{extractor}' failed: {source}")]
    Extraction {
        extractor: String,
        #[source]
        source: ExtractorError,
    },

    #[error("extractor '{extractor}' timed out after {timeout_ms}ms")]
    ExtractorTimeout { extractor: String, timeout_ms: u64 },

    #[error(transparent)]
    Reduction(#[from] ReducerError),

    #[error("skill '{skill}' failed: {source}")]
    Skill {
        skill: String,
        #[source]
        source: SkillError,
    },
}
