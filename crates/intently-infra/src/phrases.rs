//! Phrase source loading.
//!
//! A path source is either a directory laid out as `<dir>/<topic>/<label>.txt`
//! (one phrase per line, blank lines and `#` comments ignored) or a single
//! `.toml` / `.json` file holding a topic -> label -> phrases map. Loaded
//! sources are merged in order into one [`TopicCollection`].

use std::path::Path;

use tracing::{debug, info};

use intently_types::error::SourceError;
use intently_types::phrases::{PhraseSource, TopicCollection};

/// The embedded default phrase collection (TOML).
pub const BUILTIN_PHRASES: &str = include_str!("../data/default_phrases.toml");

/// Extension of label files inside a phrase directory.
const LABEL_EXTENSION: &str = "txt";

/// Parse the embedded default phrase collection.
pub fn builtin() -> Result<TopicCollection, SourceError> {
    parse_collection("<builtin>", BUILTIN_PHRASES, CollectionFormat::Toml)
}

/// Load every source in order and merge them into one collection.
///
/// With `include_builtin`, the embedded default collection comes first.
pub async fn load_sources(
    sources: &[PhraseSource],
    include_builtin: bool,
) -> Result<TopicCollection, SourceError> {
    let mut collection = if include_builtin {
        builtin()?
    } else {
        TopicCollection::new()
    };

    for source in sources {
        collection.merge(load_source(source).await?);
    }

    info!(
        topics = collection.topic_count(),
        phrases = collection.phrase_count(),
        sources = sources.len(),
        include_builtin,
        "phrase sources loaded"
    );
    Ok(collection)
}

/// Load a single source.
pub async fn load_source(source: &PhraseSource) -> Result<TopicCollection, SourceError> {
    match source {
        PhraseSource::Inline(collection) => Ok(collection.clone()),
        PhraseSource::Path(path) => load_path(path).await,
    }
}

/// Load a phrase directory or a collection file.
pub async fn load_path(path: &Path) -> Result<TopicCollection, SourceError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| io_error(path, e))?;

    if metadata.is_dir() {
        return load_dir(path).await;
    }

    let format = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => CollectionFormat::Toml,
        Some("json") => CollectionFormat::Json,
        _ => {
            return Err(SourceError::Invalid(format!(
                "'{}' is neither a directory nor a .toml/.json file",
                path.display()
            )));
        }
    };

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_error(path, e))?;
    debug!(path = %path.display(), "loading phrase file");
    parse_collection(&path.display().to_string(), &content, format)
}

/// Load a `<dir>/<topic>/<label>.txt` tree.
///
/// Hidden entries and files without a `.txt` extension are skipped; loose
/// files directly under `dir` are ignored.
async fn load_dir(dir: &Path) -> Result<TopicCollection, SourceError> {
    let mut collection = TopicCollection::new();

    let mut topics = tokio::fs::read_dir(dir).await.map_err(|e| io_error(dir, e))?;
    while let Some(topic_entry) = topics.next_entry().await.map_err(|e| io_error(dir, e))? {
        let topic_path = topic_entry.path();
        let Some(topic) = visible_name(&topic_path) else {
            continue;
        };
        let file_type = topic_entry
            .file_type()
            .await
            .map_err(|e| io_error(&topic_path, e))?;
        if !file_type.is_dir() {
            continue;
        }

        let mut labels = tokio::fs::read_dir(&topic_path)
            .await
            .map_err(|e| io_error(&topic_path, e))?;
        while let Some(label_entry) = labels
            .next_entry()
            .await
            .map_err(|e| io_error(&topic_path, e))?
        {
            let label_path = label_entry.path();
            if visible_name(&label_path).is_none()
                || label_path.extension().and_then(|ext| ext.to_str()) != Some(LABEL_EXTENSION)
            {
                continue;
            }
            let Some(label) = label_path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let content = tokio::fs::read_to_string(&label_path)
                .await
                .map_err(|e| io_error(&label_path, e))?;
            collection.add_phrases(&topic, label, parse_phrase_lines(&content));
        }
    }

    debug!(
        path = %dir.display(),
        topics = collection.topic_count(),
        "loaded phrase directory"
    );
    Ok(collection)
}

/// Phrases from a label file: one per line, `#` lines and blanks skipped.
pub fn parse_phrase_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

#[derive(Debug, Clone, Copy)]
enum CollectionFormat {
    Toml,
    Json,
}

fn parse_collection(
    origin: &str,
    content: &str,
    format: CollectionFormat,
) -> Result<TopicCollection, SourceError> {
    let parsed: TopicCollection = match format {
        CollectionFormat::Toml => toml::from_str(content).map_err(|e| parse_error(origin, e))?,
        CollectionFormat::Json => {
            serde_json::from_str(content).map_err(|e| parse_error(origin, e))?
        }
    };

    // Route through add_phrases so file sources get the same trimming and
    // de-duplication as directory sources.
    let mut collection = TopicCollection::new();
    collection.merge(parsed);
    Ok(collection)
}

fn visible_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    (!name.starts_with('.')).then(|| name.to_string())
}

fn io_error(path: &Path, err: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

fn parse_error(origin: &str, err: impl std::fmt::Display) -> SourceError {
    SourceError::Parse {
        path: origin.to_string(),
        message: err.to_string(),
    }
}
