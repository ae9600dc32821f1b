//! Data directory layout for Intently.
//!
//! ```text
//! {data_dir}/
//!   intently.toml       pipeline configuration
//!   phrases/            default phrase directory (<topic>/<label>.txt)
//! ```

use std::path::{Path, PathBuf};

/// Configuration file name inside the data directory.
pub const CONFIG_FILE: &str = "intently.toml";

/// Phrase directory name inside the data directory.
pub const PHRASES_DIR: &str = "phrases";

/// Path of `intently.toml` for a data directory.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Path of the default phrase directory for a data directory.
pub fn phrases_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(PHRASES_DIR)
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `INTENTLY_DATA_DIR` environment variable
/// 2. `~/.intently`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("INTENTLY_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".intently");
    }

    // Last resort: current directory
    PathBuf::from(".intently")
}
