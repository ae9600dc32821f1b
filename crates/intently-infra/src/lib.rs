//! Infrastructure layer for Intently.
//!
//! Everything that touches the filesystem lives here: phrase source loading,
//! the `intently.toml` loader, and data directory resolution. Also provides
//! the baseline naive Bayes trainer and the `bootstrap` helpers that turn
//! phrase sources into a ready-to-use `Pipeline`.

pub mod bootstrap;
pub mod classifier;
pub mod config;
pub mod filesystem;
pub mod phrases;
