//! Chat with the analysis assistant
//!
//! [`ChatSession`] keeps the conversation and reacts to stocks the backend
//! detects by selecting them in the [`AppStore`](crate::store::AppStore).
//! [`Command`] parses REPL input.

pub mod commands;
pub mod conversation;

pub use commands::Command;
pub use conversation::{
    ChatEntry, ChatSession, ERROR_REPLY, MessageKind, MessageStatus, SendOutcome,
};
