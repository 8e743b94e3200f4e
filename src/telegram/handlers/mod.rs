//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the Telegram bot.
//! All ledger logic lives in [`crate::commands`]; handlers only translate
//! updates into calls and replies into requests.

mod commands;
mod schema;
mod types;

pub use schema::schema;
pub use types::{callback_user_id, message_user_id, HandlerDeps, HandlerError};
