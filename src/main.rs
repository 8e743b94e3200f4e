use anyhow::Result;
use chrono::Utc;
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use expensebot::cli::{Cli, Commands};
use expensebot::commands::{spawn_cleanup_task, CommandHandler, HandlerSettings};
use expensebot::core::{config, health_server, init_logger, log_startup_configuration};
use expensebot::ledger::Window;
use expensebot::storage::LedgerStore;
use expensebot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (missing token, logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Log panics instead of losing them on stderr
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // .env must be loaded before any config static is touched
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) => run_bot().await,
        Some(Commands::Migrate) => run_migrate(),
        Some(Commands::Summary { user, window, json }) => run_summary(&user, window, json),
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot().await
        }
    }
}

/// Create the schema and exit
fn run_migrate() -> Result<()> {
    let store = LedgerStore::open(&config::DATABASE_PATH)?;
    log::info!("Schema is up to date in {}", store.path());
    Ok(())
}

/// Print one user's summary to stdout
fn run_summary(user: &str, window: Window, json: bool) -> Result<()> {
    let store = LedgerStore::open(&config::DATABASE_PATH)?;
    let handler = CommandHandler::new(store, HandlerSettings::from_config());
    let summary = handler.summarize(user, window, Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary);
    }
    Ok(())
}

/// Run the Telegram bot until Ctrl-C
async fn run_bot() -> Result<()> {
    if config::BOT_TOKEN.is_empty() {
        log::error!("BOT_TOKEN is not set, refusing to start");
        anyhow::bail!("BOT_TOKEN environment variable is required");
    }

    log_startup_configuration();

    let store = LedgerStore::open(&config::DATABASE_PATH)?;
    let handler = CommandHandler::new(store, HandlerSettings::from_config());

    let _cleanup = spawn_cleanup_task(handler.pending().clone(), config::add_prompt::cleanup_interval());

    let port = *config::health::PORT;
    if port != 0 {
        tokio::spawn(async move {
            if let Err(e) = health_server::start_health_server(port).await {
                log::error!("Health server error: {}", e);
            }
        });
    }

    let bot = create_bot()?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let deps = HandlerDeps::new(handler);
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    log::info!("📡 Starting bot in long polling mode");
    Dispatcher::builder(bot, schema(deps))
        .dependencies(DependencyMap::new())
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
