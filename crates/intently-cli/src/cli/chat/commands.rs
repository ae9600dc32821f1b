//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and let the user inspect or reset the session's
//! `User` record.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Start over with a fresh user record.
    Reset,
    /// Show the last decided intent.
    Intent,
    /// Show the whole user record as JSON.
    User,
    /// Set `user.state` to a JSON value (bare words become strings).
    State(String),
    /// Unknown or malformed command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((cmd, arg)) => (cmd.to_lowercase(), Some(arg.trim())),
        None => (trimmed.to_lowercase(), None),
    };

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/reset" | "/new" => Some(ChatCommand::Reset),
        "/intent" => Some(ChatCommand::Intent),
        "/user" => Some(ChatCommand::User),
        "/state" => match arg {
            Some(value) if !value.is_empty() => Some(ChatCommand::State(value.to_string())),
            _ => Some(ChatCommand::Unknown("/state requires a value".to_string())),
        },
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Interpret a `/state` argument: valid JSON as-is, anything else as a string.
pub fn parse_state_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}     {}", style("/help").cyan(), "Show this help message");
    println!("  {}    {}", style("/clear").cyan(), "Clear the screen");
    println!("  {}     {}", style("/exit").cyan(), "End the chat session");
    println!("  {}    {}", style("/reset").cyan(), "Forget the conversation and state");
    println!("  {}   {}", style("/intent").cyan(), "Show the last decided intent");
    println!("  {}     {}", style("/user").cyan(), "Show the full user record");
    println!("  {}    {}", style("/state").cyan(), "Set the user state (JSON or text)");
    println!();
    println!("  {}", style("Ctrl+D to exit, Ctrl+C is ignored").dim());
    println!();
}
