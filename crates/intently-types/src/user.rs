//! User/session record carried across a conversation.
//!
//! The caller owns a `User` for the whole chat session. Each request appends
//! the incoming text to `conversation` and overwrites `intent` with the
//! reduced decision; skills may mutate `state` freely.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::Intent;

/// State assigned to a fresh user.
pub const DEFAULT_STATE: &str = "none";

/// Conversation record threaded through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Every incoming text, in arrival order.
    #[serde(default)]
    pub conversation: Vec<String>,
    /// Free-form application state owned by skills.
    #[serde(default = "default_state")]
    pub state: Value,
    /// The most recently reduced intent.
    #[serde(default)]
    pub intent: Intent,
}

fn default_state() -> Value {
    Value::String(DEFAULT_STATE.to_string())
}

/// Caller-supplied overrides for [`User::with_defaults`].
///
/// Only the fields set here replace the stock defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDefaults {
    #[serde(default)]
    pub conversation: Option<Vec<String>>,
    #[serde(default)]
    pub state: Option<Value>,
    #[serde(default)]
    pub intent: Option<Intent>,
}

impl UserDefaults {
    /// Override only the state.
    pub fn state(state: impl Into<Value>) -> Self {
        Self {
            state: Some(state.into()),
            ..Self::default()
        }
    }
}

impl User {
    /// A fresh user: empty conversation, empty intent, state `"none"`.
    pub fn empty() -> Self {
        Self {
            conversation: Vec::new(),
            state: default_state(),
            intent: Intent::empty(),
        }
    }

    /// A fresh user with the caller's overrides layered on top.
    pub fn with_defaults(overrides: UserDefaults) -> Self {
        let base = Self::empty();
        Self {
            conversation: overrides.conversation.unwrap_or(base.conversation),
            state: overrides.state.unwrap_or(base.state),
            intent: overrides.intent.unwrap_or(base.intent),
        }
    }

    /// The last text received, if any.
    pub fn last_message(&self) -> Option<&str> {
        self.conversation.last().map(String::as_str)
    }
}

impl Default for User {
    fn default() -> Self {
        Self::empty()
    }
}
