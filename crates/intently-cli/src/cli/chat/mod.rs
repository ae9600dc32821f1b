//! Interactive chat session.
//!
//! Every submitted line runs through the full pipeline against one `User`
//! that lives for the whole session, so skills can keep state between turns.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
