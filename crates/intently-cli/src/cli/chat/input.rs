//! Line input for the chat loop.
//!
//! Reads from `rustyline_async` and sorts each submitted line into a slash
//! command or a message for the pipeline. Blank lines never leave this
//! module, and only messages go into history so arrow-up recalls what was
//! said to the bot.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

use super::commands::{self, ChatCommand};

/// What the user did at the prompt.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// Text to send through the pipeline (trimmed, never empty).
    Message(String),
    /// A slash command handled by the loop itself.
    Command(ChatCommand),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// Sort one raw line. Returns `None` for blank input.
pub fn interpret_line(line: &str) -> Option<InputEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(match commands::parse(trimmed) {
        Some(cmd) => InputEvent::Command(cmd),
        None => InputEvent::Message(trimmed.to_string()),
    })
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Returns the input handler and a `SharedWriter` for printing without
    /// clobbering the prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    /// Wait for the next non-blank line or terminal signal.
    pub async fn next_event(&mut self) -> InputEvent {
        loop {
            let line = match self.rl.readline().await {
                Ok(ReadlineEvent::Line(line)) => line,
                Ok(ReadlineEvent::Eof) => return InputEvent::Eof,
                Ok(ReadlineEvent::Interrupted) => return InputEvent::Interrupted,
                Err(err) => {
                    tracing::debug!("readline error, ending session: {err}");
                    return InputEvent::Eof;
                }
            };

            match interpret_line(&line) {
                Some(InputEvent::Message(text)) => {
                    self.rl.add_history_entry(text.clone());
                    return InputEvent::Message(text);
                }
                Some(event) => return event,
                None => continue,
            }
        }
    }

    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }
}
