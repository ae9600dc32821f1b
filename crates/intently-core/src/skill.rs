//! Skills: post-decision handlers walked in order until one responds.
//!
//! A skill receives the user record (already carrying the decided intent),
//! may mutate it, and either returns a result -- which ends the walk -- or
//! declines with `None` so the next skill gets a turn.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tracing::debug;

use intently_types::error::{PipelineError, SkillError};
use intently_types::user::User;

use crate::priority::PriorityList;

/// Which skill handled a request, and what it returned.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillOutcome {
    pub skill: String,
    pub output: Value,
}

/// A handler reacting to the decided intent.
pub trait Skill: Send + Sync {
    /// Return `Some(result)` to stop the walk, `None` to decline.
    fn handle(
        &self,
        user: &mut User,
    ) -> impl Future<Output = Result<Option<Value>, SkillError>> + Send;
}

/// Object-safe version of [`Skill`] with boxed futures.
pub trait SkillDyn: Send + Sync {
    fn handle_boxed<'a>(
        &'a self,
        user: &'a mut User,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Value>, SkillError>> + Send + 'a>>;
}

impl<T: Skill> SkillDyn for T {
    fn handle_boxed<'a>(
        &'a self,
        user: &'a mut User,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Value>, SkillError>> + Send + 'a>> {
        Box::pin(self.handle(user))
    }
}

/// Type-erased skill, so differently typed skills share one chain.
pub struct BoxSkill {
    inner: Box<dyn SkillDyn>,
}

impl BoxSkill {
    pub fn new<T: Skill + 'static>(skill: T) -> Self {
        Self {
            inner: Box::new(skill),
        }
    }

    pub async fn handle(&self, user: &mut User) -> Result<Option<Value>, SkillError> {
        self.inner.handle_boxed(user).await
    }
}

impl std::fmt::Debug for BoxSkill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BoxSkill")
    }
}

/// Adapter turning a synchronous closure into a skill.
pub struct FnSkill<F>(pub F);

impl<F> Skill for FnSkill<F>
where
    F: Fn(&mut User) -> Result<Option<Value>, SkillError> + Send + Sync,
{
    async fn handle(&self, user: &mut User) -> Result<Option<Value>, SkillError> {
        (self.0)(user)
    }
}

/// Walk the chain in order; the first skill returning `Some` wins.
///
/// Later skills never run once one has responded. A failing skill aborts the
/// walk; mutations made by earlier skills stay on `user`.
pub async fn dispatch(
    skills: &PriorityList<BoxSkill>,
    user: &mut User,
) -> Result<Option<SkillOutcome>, PipelineError> {
    if skills.is_empty() {
        debug!("no skills registered");
        return Ok(None);
    }

    for entry in skills.iter() {
        let result = entry
            .item()
            .handle(user)
            .await
            .map_err(|source| PipelineError::Skill {
                skill: entry.name().to_string(),
                source,
            })?;

        if let Some(output) = result {
            debug!(skill = entry.name(), priority = entry.priority(), "skill handled request");
            return Ok(Some(SkillOutcome {
                skill: entry.name().to_string(),
                output,
            }));
        }
    }
    Ok(None)
}
