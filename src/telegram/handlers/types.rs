//! Handler types and dependencies

use teloxide::types::{CallbackQuery, Message};

use crate::commands::CommandHandler;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub commands: CommandHandler,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(commands: CommandHandler) -> Self {
        Self { commands }
    }
}

/// Ledger owner for a message: the sender, or the chat for anonymous posts
pub fn message_user_id(msg: &Message) -> String {
    msg.from
        .as_ref()
        .map(|user| user.id.0.to_string())
        .unwrap_or_else(|| msg.chat.id.0.to_string())
}

pub fn callback_user_id(q: &CallbackQuery) -> String {
    q.from.id.0.to_string()
}
