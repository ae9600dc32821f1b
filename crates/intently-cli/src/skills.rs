//! Reply skills registered by the CLI.
//!
//! `smalltalk` answers greetings, farewells, and thanks, and tracks whether a
//! conversation is open in `user.state`. `fallback` runs last and always
//! answers, describing the decided intent.

use serde_json::{Value, json};

use intently_core::skill::Skill;
use intently_types::error::SkillError;
use intently_types::user::{DEFAULT_STATE, User};

pub const SMALLTALK_SKILL: &str = "smalltalk";
pub const FALLBACK_SKILL: &str = "fallback";

const SMALLTALK_TOPIC: &str = "smalltalk";

/// Conversation state while a greeting is still open.
pub const CHATTING_STATE: &str = "chatting";

#[derive(Debug, Clone, Copy, Default)]
pub struct SmalltalkSkill;

impl Skill for SmalltalkSkill {
    async fn handle(&self, user: &mut User) -> Result<Option<Value>, SkillError> {
        if user.intent.topic.as_deref() != Some(SMALLTALK_TOPIC) {
            return Ok(None);
        }

        let reply = match user.intent.action.as_deref() {
            Some("hello") => {
                let returning = user.state == json!(CHATTING_STATE);
                user.state = json!(CHATTING_STATE);
                if returning {
                    "Hello again!"
                } else {
                    "Hello! What can I do for you?"
                }
            }
            Some("goodbye") => {
                user.state = json!(DEFAULT_STATE);
                "Goodbye!"
            }
            Some("thanks") => "You're welcome.",
            _ => return Ok(None),
        };

        Ok(Some(Value::String(reply.to_string())))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSkill;

impl Skill for FallbackSkill {
    async fn handle(&self, user: &mut User) -> Result<Option<Value>, SkillError> {
        let intent = &user.intent;
        if intent.is_unknown() {
            let reply = match user.last_message() {
                Some(text) => format!("Sorry, I didn't catch \"{text}\"."),
                None => "Sorry, I didn't catch that.".to_string(),
            };
            return Ok(Some(Value::String(reply)));
        }

        let action = intent.action.as_deref().unwrap_or("something");
        let topic = intent.topic.as_deref().unwrap_or("no topic");
        let mut reply = format!("You want to {action} ({topic})");

        if let Some(locations) = intent.details.locations.as_ref().filter(|l| !l.is_empty()) {
            reply.push_str(&format!(" in {}", locations.join(", ")));
        }
        reply.push('.');

        Ok(Some(Value::String(reply)))
    }
}
