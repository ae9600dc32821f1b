//! Intent extractors: turn `(text, user)` into candidate intents.
//!
//! Follows the same boxing pattern as the reducer and skill modules:
//! 1. `IntentExtractor` is the ergonomic trait (native async fn in traits)
//! 2. `IntentExtractorDyn` is its object-safe twin with boxed futures
//! 3. `BoxIntentExtractor` wraps `Box<dyn IntentExtractorDyn>` and delegates

pub mod classifier;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use intently_types::config::PipelineConfig;
use intently_types::error::ExtractorError;
use intently_types::intent::Intent;
use intently_types::user::User;

use crate::classifier::ClassifierBank;

pub use classifier::ClassifierExtractor;

/// Read-only pipeline state handed to extractors and reducers.
///
/// The bank is the snapshot taken at the start of the request, so every
/// extractor in one round sees the same bank even if a retrain lands midway.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    pub bank: Arc<ClassifierBank>,
    pub config: Arc<PipelineConfig>,
}

/// Produces zero or more candidate intents for an incoming text.
///
/// Candidates should be returned best first: the default reducer treats the
/// first candidate of the first non-empty extractor as the decision. An empty
/// vector means "nothing to contribute this round".
pub trait IntentExtractor: Send + Sync {
    fn extract(
        &self,
        text: &str,
        user: &User,
        ctx: &ExtractionContext,
    ) -> impl Future<Output = Result<Vec<Intent>, ExtractorError>> + Send;
}

/// Object-safe version of [`IntentExtractor`] with boxed futures.
pub trait IntentExtractorDyn: Send + Sync {
    fn extract_boxed<'a>(
        &'a self,
        text: &'a str,
        user: &'a User,
        ctx: &'a ExtractionContext,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Intent>, ExtractorError>> + Send + 'a>>;
}

impl<T: IntentExtractor> IntentExtractorDyn for T {
    fn extract_boxed<'a>(
        &'a self,
        text: &'a str,
        user: &'a User,
        ctx: &'a ExtractionContext,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Intent>, ExtractorError>> + Send + 'a>> {
        Box::pin(self.extract(text, user, ctx))
    }
}

/// Type-erased extractor, so differently typed extractors share one list.
pub struct BoxIntentExtractor {
    inner: Box<dyn IntentExtractorDyn>,
}

impl BoxIntentExtractor {
    pub fn new<T: IntentExtractor + 'static>(extractor: T) -> Self {
        Self {
            inner: Box::new(extractor),
        }
    }

    pub async fn extract(
        &self,
        text: &str,
        user: &User,
        ctx: &ExtractionContext,
    ) -> Result<Vec<Intent>, ExtractorError> {
        self.inner.extract_boxed(text, user, ctx).await
    }
}

impl std::fmt::Debug for BoxIntentExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BoxIntentExtractor")
    }
}

/// Adapter turning a synchronous closure into an extractor.
pub struct FnExtractor<F>(pub F);

impl<F> IntentExtractor for FnExtractor<F>
where
    F: Fn(&str, &User, &ExtractionContext) -> Result<Vec<Intent>, ExtractorError> + Send + Sync,
{
    async fn extract(
        &self,
        text: &str,
        user: &User,
        ctx: &ExtractionContext,
    ) -> Result<Vec<Intent>, ExtractorError> {
        (self.0)(text, user, ctx)
    }
}
