//! Intent-resolution pipeline for Intently.
//!
//! This crate defines the classifier capability traits, the built-in
//! classifier-backed extractor, the reducer, the skill chain, and the
//! `Pipeline` that drives one request through all of them. It depends only on
//! `intently-types` -- never on `intently-infra` or any filesystem code.

pub mod classifier;
pub mod extractor;
pub mod pipeline;
pub mod priority;
pub mod reducer;
pub mod skill;

pub use pipeline::Pipeline;
