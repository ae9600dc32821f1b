//! Reducers collapse the flattened candidate list into one decided intent.
//!
//! The pipeline holds exactly one reducer. [`FirstWinsReducer`] is the
//! default; any [`Reducer`] implementation or plain closure can replace it.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use intently_types::config::MergeScope;
use intently_types::error::ReducerError;
use intently_types::intent::Intent;
use intently_types::user::User;

use crate::extractor::ExtractionContext;

/// Produces exactly one intent from the candidates of every extractor.
///
/// Candidates arrive in extractor order, each extractor's own candidates
/// already ranked best first.
pub trait Reducer: Send + Sync {
    fn reduce(
        &self,
        intents: Vec<Intent>,
        user: &User,
        ctx: &ExtractionContext,
    ) -> impl Future<Output = Result<Intent, ReducerError>> + Send;
}

/// Object-safe version of [`Reducer`] with boxed futures.
pub trait ReducerDyn: Send + Sync {
    fn reduce_boxed<'a>(
        &'a self,
        intents: Vec<Intent>,
        user: &'a User,
        ctx: &'a ExtractionContext,
    ) -> Pin<Box<dyn Future<Output = Result<Intent, ReducerError>> + Send + 'a>>;
}

impl<T: Reducer> ReducerDyn for T {
    fn reduce_boxed<'a>(
        &'a self,
        intents: Vec<Intent>,
        user: &'a User,
        ctx: &'a ExtractionContext,
    ) -> Pin<Box<dyn Future<Output = Result<Intent, ReducerError>> + Send + 'a>> {
        Box::pin(self.reduce(intents, user, ctx))
    }
}

/// Type-erased reducer occupying the pipeline's single reducer slot.
pub struct BoxReducer {
    inner: Box<dyn ReducerDyn>,
}

impl BoxReducer {
    pub fn new<T: Reducer + 'static>(reducer: T) -> Self {
        Self {
            inner: Box::new(reducer),
        }
    }

    pub async fn reduce(
        &self,
        intents: Vec<Intent>,
        user: &User,
        ctx: &ExtractionContext,
    ) -> Result<Intent, ReducerError> {
        self.inner.reduce_boxed(intents, user, ctx).await
    }
}

impl std::fmt::Debug for BoxReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BoxReducer")
    }
}

/// Adapter turning a synchronous closure into a reducer.
pub struct FnReducer<F>(pub F);

impl<F> Reducer for FnReducer<F>
where
    F: Fn(Vec<Intent>, &User) -> Result<Intent, ReducerError> + Send + Sync,
{
    async fn reduce(
        &self,
        intents: Vec<Intent>,
        user: &User,
        _ctx: &ExtractionContext,
    ) -> Result<Intent, ReducerError> {
        (self.0)(intents, user)
    }
}

/// Default reducer: the first candidate wins and absorbs missing detail keys
/// from the others.
///
/// The merge scope is read from the pipeline configuration at reduction
/// time, so toggling it does not require replacing the reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstWinsReducer;

impl Reducer for FirstWinsReducer {
    async fn reduce(
        &self,
        intents: Vec<Intent>,
        _user: &User,
        ctx: &ExtractionContext,
    ) -> Result<Intent, ReducerError> {
        Ok(first_wins(intents, ctx.config.merge_scope))
    }
}

/// Pick the first non-empty candidate and fill its details from the rest.
///
/// Returns [`Intent::unknown`] when no non-empty candidate exists. Keys the
/// winner already has are never overwritten; for keys it lacks, the first
/// candidate (in list order) that has them supplies the value.
pub fn first_wins(intents: Vec<Intent>, scope: MergeScope) -> Intent {
    let mut candidates = intents.into_iter().filter(|intent| !intent.is_empty());

    let Some(mut winner) = candidates.next() else {
        debug!("no candidates, falling back to unknown intent");
        return Intent::unknown();
    };

    for other in candidates {
        if scope == MergeScope::SameTopic && other.topic != winner.topic {
            continue;
        }
        winner.details.merge_missing(&other.details);
    }

    winner
}
