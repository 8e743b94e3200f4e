//! Command, text and button handlers

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message, ParseMode};

use super::types::{callback_user_id, message_user_id, HandlerDeps, HandlerError};
use crate::commands::Reply;
use crate::core::error::AppResult;
use crate::ledger::Window;
use crate::telegram::bot::Command;
use crate::telegram::keyboards::keyboard_markup;
use crate::telegram::notifications::notify_storage_failure;

/// Sends a reply as a new HTML message
pub(super) async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> Result<(), teloxide::RequestError> {
    let mut request = bot.send_message(chat_id, reply.text).parse_mode(ParseMode::Html);
    if let Some(keyboard) = reply.keyboard {
        request = request.reply_markup(keyboard_markup(keyboard));
    }
    request.await?;
    Ok(())
}

/// Turns a handler result into a reply, alerting the operator on storage failures
fn resolve(bot: &Bot, deps: &HandlerDeps, user_id: &str, action: &str, result: AppResult<Reply>) -> Reply {
    match result {
        Ok(reply) => reply,
        Err(e) => {
            if e.is_storage() {
                notify_storage_failure(bot, user_id, action, &e);
            }
            deps.commands.error_reply(&e)
        }
    }
}

pub(super) async fn handle_command(bot: &Bot, msg: &Message, cmd: Command, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let user_id = message_user_id(msg);
    let now = Utc::now();
    let commands = &deps.commands;
    log::info!("Received command {:?} from user {}", cmd, user_id);

    let (action, result) = match cmd {
        Command::Start => {
            let first_name = msg.from.as_ref().map(|u| u.first_name.as_str());
            ("/start", Ok(commands.start(first_name)))
        }
        Command::Help => ("/help", Ok(commands.help())),
        Command::Add(args) => ("/add", commands.add(&user_id, &args, now).await),
        Command::Today => ("/today", commands.summary(&user_id, Window::Today, now)),
        Command::Week => ("/week", commands.summary(&user_id, Window::Week, now)),
        Command::Month => ("/month", commands.summary(&user_id, Window::Month, now)),
        Command::Year => ("/year", commands.summary(&user_id, Window::Year, now)),
        Command::Recent => ("/recent", commands.recent(&user_id)),
        Command::Delete(args) => ("/delete", commands.delete(&user_id, &args)),
        Command::Status => ("/status", commands.status(&user_id, now).await),
        Command::Cancel => ("/cancel", Ok(commands.cancel(&user_id).await)),
        Command::Skip => ("/skip", Ok(commands.skip(&user_id).await)),
    };

    let reply = resolve(bot, deps, &user_id, action, result);
    send_reply(bot, msg.chat.id, reply).await?;
    Ok(())
}

const UNKNOWN_COMMAND: &str = "Unknown command. Send /help for the list.";

#[derive(Debug, PartialEq, Eq)]
enum TextRoute {
    Ignore,
    UnknownCommand,
    Prompt,
}

/// Outside private chats only react while the sender has a prompt open
fn route_text(is_private: bool, has_prompt: bool, text: &str) -> TextRoute {
    if !is_private && !has_prompt {
        TextRoute::Ignore
    } else if text.starts_with('/') {
        TextRoute::UnknownCommand
    } else {
        TextRoute::Prompt
    }
}

pub(super) async fn handle_text(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let user_id = message_user_id(msg);

    let has_prompt = deps.commands.pending().get(&user_id).await.is_some();
    match route_text(msg.chat.is_private(), has_prompt, text) {
        TextRoute::Ignore => return Ok(()),
        TextRoute::UnknownCommand => {
            send_reply(bot, msg.chat.id, Reply::text(UNKNOWN_COMMAND)).await?;
            return Ok(());
        }
        TextRoute::Prompt => {}
    }

    let result = deps.commands.text(&user_id, text, Utc::now()).await;
    let reply = resolve(bot, deps, &user_id, "/add", result);
    send_reply(bot, msg.chat.id, reply).await?;
    Ok(())
}

pub(super) async fn handle_callback(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let user_id = callback_user_id(q);
    let data = q.data.as_deref().unwrap_or_default();
    log::info!("Received callback '{}' from user {}", data, user_id);

    let outcome = match deps.commands.callback(&user_id, data, Utc::now()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.is_storage() {
                notify_storage_failure(bot, &user_id, "/add", &e);
            }
            bot.answer_callback_query(q.id.clone()).await?;
            if let Some(message) = &q.message {
                send_reply(bot, message.chat().id, deps.commands.error_reply(&e)).await?;
            }
            return Ok(());
        }
    };

    let mut answer = bot.answer_callback_query(q.id.clone());
    if let Some(text) = outcome.answer {
        answer = answer.text(text);
    }
    answer.await?;

    if let (Some(reply), Some(message)) = (outcome.edit, &q.message) {
        let mut request = bot
            .edit_message_text(message.chat().id, message.id(), reply.text)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = reply.keyboard {
            request = request.reply_markup(keyboard_markup(keyboard));
        }
        request.await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_chatter_is_ignored_without_prompt() {
        assert_eq!(route_text(false, false, "/foo@other_bot"), TextRoute::Ignore);
        assert_eq!(route_text(false, false, "hello"), TextRoute::Ignore);
        assert_eq!(route_text(false, true, "/foo"), TextRoute::UnknownCommand);
        assert_eq!(route_text(false, true, "12.50"), TextRoute::Prompt);
    }

    #[test]
    fn test_private_chat_always_answers() {
        assert_eq!(route_text(true, false, "/foo"), TextRoute::UnknownCommand);
        assert_eq!(route_text(true, false, "hello"), TextRoute::Prompt);
    }
}
