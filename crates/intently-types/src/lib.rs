//! Shared domain types for Intently.
//!
//! This crate contains the value types that flow through the intent pipeline:
//! Intent, User, Classification, phrase collections, pipeline configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod classification;
pub mod config;
pub mod error;
pub mod intent;
pub mod phrases;
pub mod user;
