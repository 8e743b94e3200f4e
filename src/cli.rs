use clap::{Parser, Subcommand};

use crate::ledger::Window;

#[derive(Parser)]
#[command(name = "expensebot")]
#[command(author, version, about = "Personal expense tracking Telegram bot", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,

    /// Create or update the database schema and exit
    Migrate,

    /// Print a summary for one user without starting the bot
    Summary {
        /// Telegram user id
        #[arg(short, long)]
        user: String,

        /// today, week, month or year
        #[arg(short, long, default_value = "month")]
        window: Window,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["expensebot"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_summary_arguments() {
        let cli = Cli::try_parse_from(["expensebot", "summary", "--user", "42", "--window", "week", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Summary { user, window, json }) => {
                assert_eq!(user, "42");
                assert_eq!(window, Window::Week);
                assert!(json);
            }
            _ => panic!("expected summary"),
        }

        let cli = Cli::try_parse_from(["expensebot", "summary", "-u", "7"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Summary {
                window: Window::Month,
                json: false,
                ..
            })
        ));
        assert!(Cli::try_parse_from(["expensebot", "summary", "-u", "7", "-w", "decade"]).is_err());
    }
}
