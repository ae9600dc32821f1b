//! Pipeline configuration loader for Intently.
//!
//! Reads `intently.toml` from the data directory (`~/.intently/` in
//! production) and deserializes it into [`PipelineConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::Path;

use intently_types::config::PipelineConfig;

use crate::filesystem::config_path;

/// Load pipeline configuration from `{data_dir}/intently.toml`.
///
/// - If the file does not exist, returns [`PipelineConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   returns the default.
/// - Relative `phrase_sources` entries are resolved against `data_dir`.
pub async fn load_pipeline_config(data_dir: &Path) -> PipelineConfig {
    let config_path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No intently.toml found at {}, using defaults", config_path.display());
            return PipelineConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return PipelineConfig::default();
        }
    };

    match toml::from_str::<PipelineConfig>(&content) {
        Ok(mut config) => {
            for source in &mut config.phrase_sources {
                if source.is_relative() {
                    *source = data_dir.join(&*source);
                }
            }
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            PipelineConfig::default()
        }
    }
}
