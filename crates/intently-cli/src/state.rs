//! Application state: configuration, phrase sources, and the trained
//! pipeline shared by every command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use intently_core::Pipeline;
use intently_core::priority::DEFAULT_PRIORITY;
use intently_infra::bootstrap;
use intently_infra::classifier::NaiveBayesTrainer;
use intently_infra::config::load_pipeline_config;
use intently_infra::filesystem::{phrases_dir, resolve_data_dir};
use intently_types::config::PipelineConfig;
use intently_types::phrases::PhraseSource;

use crate::cli::Cli;
use crate::skills::{FALLBACK_SKILL, FallbackSkill, SMALLTALK_SKILL, SmalltalkSkill};

/// Priority of the fallback skill: after anything registered at the default.
const FALLBACK_PRIORITY: i32 = 100;

pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub config: PipelineConfig,
    pub sources: Vec<PhraseSource>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load configuration, gather phrase sources, and train the pipeline.
    ///
    /// Sources: `{data_dir}/phrases` when present, then every `--phrases`
    /// path in command-line order.
    pub async fn init(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = cli.config_dir.clone().unwrap_or_else(resolve_data_dir);

        let mut config = load_pipeline_config(&data_dir).await;
        if cli.no_builtin {
            config.include_builtin_phrases = false;
        }
        if cli.verbose > 0 {
            config.verbose = true;
        }

        let mut sources = Vec::new();
        let default_dir = phrases_dir(&data_dir);
        if tokio::fs::try_exists(&default_dir).await.unwrap_or(false) {
            sources.push(PhraseSource::Path(default_dir));
        }
        sources.extend(cli.phrases.iter().cloned().map(PhraseSource::Path));

        let trainer = NaiveBayesTrainer::new();
        let mut pipeline = bootstrap::build_pipeline(config.clone(), &sources, &trainer)
            .await
            .context("failed to train classifier bank")?;
        pipeline.insert_skill(SMALLTALK_SKILL, DEFAULT_PRIORITY, SmalltalkSkill);
        pipeline.insert_skill(FALLBACK_SKILL, FALLBACK_PRIORITY, FallbackSkill);

        tracing::debug!(
            data_dir = %data_dir.display(),
            sources = sources.len(),
            "application state ready"
        );

        Ok(Self {
            pipeline: Arc::new(pipeline),
            config,
            sources,
            data_dir,
        })
    }
}
