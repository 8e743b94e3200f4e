//! Operator notifications

use teloxide::prelude::*;

use crate::core::config;
use crate::core::error::AppError;

/// Sends a plain text message to `ADMIN_ID`, if configured.
///
/// Failures are logged and swallowed.
pub async fn notify_admin_text(bot: &Bot, text: &str) {
    let Some(admin_id) = *config::ADMIN_ID else {
        return;
    };

    if let Err(e) = bot.send_message(ChatId(admin_id), text).await {
        log::error!("Failed to notify admin {}: {}", admin_id, e);
    }
}

pub fn storage_failure_text(user_id: &str, action: &str, err: &AppError) -> String {
    format!("⚠️ STORAGE ERROR\nuser: {}\naction: {}\nerror: {}", user_id, action, err)
}

/// Fire-and-forget alert about a failed ledger operation
pub fn notify_storage_failure(bot: &Bot, user_id: &str, action: &str, err: &AppError) {
    if config::ADMIN_ID.is_none() {
        return;
    }
    let bot = bot.clone();
    let text = storage_failure_text(user_id, action, err);
    tokio::spawn(async move {
        notify_admin_text(&bot, &text).await;
    });
}
