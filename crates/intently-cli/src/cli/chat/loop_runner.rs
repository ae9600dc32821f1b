//! The interactive chat loop.
//!
//! Handles slash commands locally and sends messages through
//! `Pipeline::process_in_place`. A pipeline error is reported and the
//! session continues with whatever the user record held at that point.

use anyhow::Result;
use console::style;

use intently_types::user::User;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use crate::cli::classify::format_confidence;
use crate::state::AppState;

/// Run the chat loop until EOF or `/exit`.
pub async fn run_chat_loop(state: &AppState) -> Result<()> {
    let bank = state.pipeline.bank();
    print_welcome_banner(
        &bank.family().to_string(),
        &bank.topics(),
        bank.len(),
        &state.pipeline.skill_names(),
    );

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let mut user = User::empty();

    loop {
        match chat_input.next_event().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
            }
            InputEvent::Command(cmd) => match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::Reset => {
                    user = User::empty();
                    println!("\n  {} Conversation reset.\n", style("*").cyan().bold());
                }
                ChatCommand::Intent => print_intent(&user),
                ChatCommand::User => {
                    println!("\n{}\n", serde_json::to_string_pretty(&user)?);
                }
                ChatCommand::State(raw) => {
                    user.state = commands::parse_state_value(&raw);
                    println!("\n  {} State set to {}\n", style("*").cyan().bold(), user.state);
                }
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            },
            InputEvent::Message(text) => {
                match state.pipeline.process_in_place(&mut user, &text).await {
                    Ok(Some(outcome)) => {
                        let reply = match outcome.output {
                            serde_json::Value::String(s) => s,
                            other => other.to_string(),
                        };
                        println!("\n  {} {}\n", style("Bot >").cyan().bold(), reply);
                        tracing::debug!(skill = %outcome.skill, "reply sent");
                    }
                    Ok(None) => {
                        println!("\n  {}\n", style("(no skill answered)").dim());
                    }
                    Err(e) => {
                        eprintln!("\n  {} Pipeline error: {e}", style("!").red().bold());
                        eprintln!("  {}", style("Type a message to retry, /exit to quit.").dim());
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_intent(user: &User) {
    let intent = &user.intent;
    if intent.is_empty() {
        println!("\n  {}\n", style("No message classified yet.").dim());
        return;
    }

    println!();
    println!(
        "  {} {} / {}",
        style("Intent:").bold(),
        style(intent.topic.as_deref().unwrap_or("-")).cyan(),
        intent.action.as_deref().unwrap_or("-")
    );
    if let Some(confidence) = intent.confidence() {
        println!("  {} {}", style("Confidence:").bold(), format_confidence(confidence));
    }
    if let Some(locations) = intent.details.locations.as_ref().filter(|l| !l.is_empty()) {
        println!("  {} {}", style("Locations:").bold(), locations.join(", "));
    }
    println!();
}
