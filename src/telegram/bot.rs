//! Bot initialization and command menu
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command menu registration

use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "welcome message")]
    Start,
    #[command(description = "show help")]
    Help,
    #[command(description = "add a transaction (/add 12.50 food lunch)")]
    Add(String),
    #[command(description = "today's summary")]
    Today,
    #[command(description = "this week's summary")]
    Week,
    #[command(description = "this month's summary")]
    Month,
    #[command(description = "this year's summary")]
    Year,
    #[command(description = "latest transactions")]
    Recent,
    #[command(description = "delete a transaction by id")]
    Delete(String),
    #[command(description = "bot status")]
    Status,
    #[command(description = "abort the current /add")]
    Cancel,
    #[command(description = "skip the note while adding")]
    Skip,
}

/// Creates a Bot instance from the configured token
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Token missing or the HTTP client could not be built
pub fn create_bot() -> anyhow::Result<Bot> {
    if config::BOT_TOKEN.is_empty() {
        anyhow::bail!("BOT_TOKEN is not set");
    }

    let client = teloxide::net::default_reqwest_settings()
        .timeout(config::network::timeout())
        .build()?;
    Ok(Bot::with_client(config::BOT_TOKEN.as_str(), client))
}

/// Entries shown in the Telegram command menu
pub fn menu_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "welcome message"),
        BotCommand::new("add", "add a transaction"),
        BotCommand::new("today", "today's summary"),
        BotCommand::new("week", "this week's summary"),
        BotCommand::new("month", "this month's summary"),
        BotCommand::new("recent", "latest transactions"),
        BotCommand::new("delete", "delete a transaction by id"),
        BotCommand::new("help", "show help"),
        BotCommand::new("status", "bot status"),
    ]
}

/// Sets up bot commands in Telegram UI
///
/// # Arguments
/// * `bot` - Bot instance to configure
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(menu_commands()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_with_arguments() {
        assert_eq!(
            Command::parse("/add 12.50 food lunch", "expensebot").unwrap(),
            Command::Add("12.50 food lunch".to_string())
        );
        assert_eq!(Command::parse("/add", "expensebot").unwrap(), Command::Add(String::new()));
        assert_eq!(
            Command::parse("/delete 42", "expensebot").unwrap(),
            Command::Delete("42".to_string())
        );
        assert_eq!(Command::parse("/today@expensebot", "expensebot").unwrap(), Command::Today);
        assert!(Command::parse("/unknown", "expensebot").is_err());
    }

    #[test]
    fn test_menu_lists_core_commands() {
        let names: Vec<String> = menu_commands().into_iter().map(|c| c.command).collect();
        for name in ["start", "add", "today", "week", "month", "recent", "delete", "help", "status"] {
            assert!(names.iter().any(|n| n == name), "{name} missing from menu");
        }
    }
}
