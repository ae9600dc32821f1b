//! Pipeline construction and retraining from phrase sources.
//!
//! Both paths train a complete bank before anything is installed, so a failed
//! build never disturbs a pipeline that is already serving.

use std::sync::Arc;

use tracing::info;

use intently_core::Pipeline;
use intently_core::classifier::{ClassifierBank, ClassifierTrainer, train_bank};
use intently_types::config::PipelineConfig;
use intently_types::error::SourceError;
use intently_types::phrases::{PhraseSource, TopicCollection};

use crate::phrases;

/// Load and merge every phrase source a bank would be trained on.
///
/// Order: the built-in collection (when `include_builtin_phrases` is set),
/// then `config.phrase_sources`, then `sources`.
pub async fn load_collection(
    config: &PipelineConfig,
    sources: &[PhraseSource],
) -> Result<TopicCollection, SourceError> {
    let all_sources: Vec<PhraseSource> = config
        .phrase_sources
        .iter()
        .cloned()
        .map(PhraseSource::Path)
        .chain(sources.iter().cloned())
        .collect();

    phrases::load_sources(&all_sources, config.include_builtin_phrases).await
}

/// Train a bank from the configured sources followed by `sources`.
pub async fn build_bank(
    config: &PipelineConfig,
    sources: &[PhraseSource],
    trainer: &dyn ClassifierTrainer,
) -> Result<ClassifierBank, SourceError> {
    let collection = load_collection(config, sources).await?;
    let bank = train_bank(trainer, &collection)?;

    info!(
        family = %bank.family(),
        topics = bank.topics().len(),
        pairs = bank.len(),
        "classifier bank trained"
    );
    Ok(bank)
}

/// Build a ready-to-use pipeline with the built-in extractor and reducer.
pub async fn build_pipeline(
    config: PipelineConfig,
    sources: &[PhraseSource],
    trainer: &dyn ClassifierTrainer,
) -> Result<Pipeline, SourceError> {
    let bank = build_bank(&config, sources, trainer).await?;
    Ok(Pipeline::new(bank, config))
}

/// Retrain from scratch and swap the new bank in.
///
/// Returns the bank that was replaced. On error the pipeline keeps its
/// current bank.
pub async fn retrain(
    pipeline: &Pipeline,
    sources: &[PhraseSource],
    trainer: &dyn ClassifierTrainer,
) -> Result<Arc<ClassifierBank>, SourceError> {
    let bank = build_bank(pipeline.config(), sources, trainer).await?;
    Ok(pipeline.replace_bank(bank))
}
