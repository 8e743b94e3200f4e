//! Command handler: maps bot commands to ledger operations and renders replies
//!
//! Nothing in here talks to Telegram. The transport layer extracts the user
//! id and the command arguments, calls into [`CommandHandler`] and sends
//! whatever [`Reply`] comes back.

pub mod callbacks;
pub mod pending;
pub mod render;

use chrono::{DateTime, FixedOffset, Utc};
use tokio::time::{Duration, Instant};

use crate::core::config;
use crate::core::config::add_prompt::MAX_NOTE_CHARS;
use crate::core::error::{AppError, AppResult, ErrorKind};
use crate::ledger::{parse_amount, Category, EnteredAmount, NewTransaction, Summary, Transaction, Window};
use crate::storage::LedgerStore;

pub use callbacks::CallbackData;
pub use pending::{spawn_cleanup_task, AddStep, PendingInputs};

/// Inline keyboard attached to a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// One button per category plus a cancel row
    Categories,
    /// Save / discard
    Confirm,
}

/// Text (Telegram HTML) plus an optional keyboard
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Outcome of a button press
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackReply {
    /// Short toast shown by the client, if any
    pub answer: Option<String>,
    /// New content for the message carrying the buttons
    pub edit: Option<Reply>,
}

impl CallbackReply {
    fn expired() -> Self {
        Self {
            answer: Some(render::PROMPT_EXPIRED.to_string()),
            edit: None,
        }
    }

    fn edit(reply: Reply) -> Self {
        Self {
            answer: None,
            edit: Some(reply),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HandlerSettings {
    /// Offset used for window boundaries and displayed dates
    pub offset: FixedOffset,
    pub recent_limit: usize,
    pub currency: String,
    pub add_timeout: Duration,
}

impl HandlerSettings {
    pub fn from_config() -> Self {
        Self {
            offset: *config::UTC_OFFSET,
            recent_limit: *config::recent::LIMIT,
            currency: config::CURRENCY_SYMBOL.clone(),
            add_timeout: config::add_prompt::timeout(),
        }
    }
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            offset: config::utc(),
            recent_limit: config::recent::DEFAULT_LIMIT,
            currency: "$".to_string(),
            add_timeout: Duration::from_secs(config::add_prompt::DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Owns the ledger store and the per-user pending `/add` prompts.
#[derive(Clone)]
pub struct CommandHandler {
    store: LedgerStore,
    pending: PendingInputs,
    settings: HandlerSettings,
    started_at: Instant,
}

impl CommandHandler {
    pub fn new(store: LedgerStore, settings: HandlerSettings) -> Self {
        let pending = PendingInputs::new(settings.add_timeout);
        Self {
            store,
            pending,
            settings,
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn pending(&self) -> &PendingInputs {
        &self.pending
    }

    pub fn start(&self, first_name: Option<&str>) -> Reply {
        Reply::text(render::welcome(first_name))
    }

    pub fn help(&self) -> Reply {
        Reply::text(render::HELP)
    }

    /// `/add` without arguments opens a prompt; with arguments it records
    /// the transaction immediately (`/add 12.50 food lunch`).
    pub async fn add(&self, user_id: &str, args: &str, now: DateTime<Utc>) -> AppResult<Reply> {
        let args = args.trim();
        if args.is_empty() {
            self.pending.set(user_id, AddStep::AwaitingAmount).await;
            log::info!("User {} started /add", user_id);
            return Ok(Reply::text(render::ask_amount()));
        }

        let mut parts = args.split_whitespace();
        let amount_raw = parts.next().unwrap_or_default();
        let amount = parse_amount(amount_raw).map_err(|e| match e {
            AppError::Validation(reason) => AppError::Validation(format!(
                "{}\n{}",
                teloxide::utils::html::escape(&reason),
                render::ADD_USAGE
            )),
            other => other,
        })?;

        let category = match parts.next() {
            Some(raw) => Some(Category::from_input(raw).ok_or_else(|| {
                AppError::Validation(format!(
                    "Unknown category <i>{}</i>.\n{}",
                    teloxide::utils::html::escape(raw),
                    render::ADD_USAGE
                ))
            })?),
            None => None,
        };
        let note = Some(parts.collect::<Vec<_>>().join(" ")).filter(|n| !n.is_empty());
        if let Some(chars) = note.as_deref().map(|n| n.chars().count()).filter(|c| *c > MAX_NOTE_CHARS) {
            return Err(AppError::Validation(format!(
                "Note is too long ({} characters, the limit is {}).\n{}",
                chars,
                MAX_NOTE_CHARS,
                render::ADD_USAGE
            )));
        }

        let tx = self.commit(user_id, amount, category, note, now)?;
        Ok(Reply::text(render::saved(&tx, self.settings.offset, &self.settings.currency)))
    }

    /// Free text: advances the pending `/add`, if any.
    pub async fn text(&self, user_id: &str, text: &str, now: DateTime<Utc>) -> AppResult<Reply> {
        let Some(step) = self.pending.get(user_id).await else {
            return Ok(Reply::text(render::NO_ADD_IN_PROGRESS));
        };
        let text = text.trim();

        match step {
            AddStep::AwaitingAmount => match parse_amount(text) {
                Ok(amount) => {
                    self.pending.set(user_id, AddStep::AwaitingCategory { amount }).await;
                    Ok(Reply::with_keyboard(render::ask_category(&amount), Keyboard::Categories))
                }
                Err(AppError::Validation(reason)) => {
                    self.pending.set(user_id, AddStep::AwaitingAmount).await;
                    Ok(Reply::text(render::invalid_amount(&reason)))
                }
                Err(e) => Err(e),
            },
            AddStep::AwaitingCategory { amount } => match Category::from_input(text) {
                Some(category) => self.choose_category(user_id, amount, category).await,
                None => {
                    self.pending.set(user_id, AddStep::AwaitingCategory { amount }).await;
                    Ok(Reply::with_keyboard(render::unknown_category(text), Keyboard::Categories))
                }
            },
            AddStep::AwaitingNote { amount, category } => {
                let chars = text.chars().count();
                if chars > MAX_NOTE_CHARS {
                    self.pending.set(user_id, AddStep::AwaitingNote { amount, category }).await;
                    return Ok(Reply::text(render::note_too_long(chars)));
                }
                let note = Some(text.to_string()).filter(|n| !n.is_empty());
                Ok(self.ask_confirmation(user_id, amount, category, note).await)
            }
            AddStep::AwaitingConfirmation { amount, category, note } => {
                match text.to_ascii_lowercase().as_str() {
                    "yes" | "y" => self.confirm(user_id, amount, category, note, now).await,
                    "no" | "n" => Ok(self.discard(user_id).await),
                    _ => Ok(self.ask_confirmation(user_id, amount, category, note).await),
                }
            }
        }
    }

    /// `/skip`: leave the note empty
    pub async fn skip(&self, user_id: &str) -> Reply {
        match self.pending.get(user_id).await {
            Some(AddStep::AwaitingNote { amount, category }) => {
                self.ask_confirmation(user_id, amount, category, None).await
            }
            Some(_) => Reply::text("Nothing to skip right now."),
            None => Reply::text(render::NO_ADD_IN_PROGRESS),
        }
    }

    /// `/cancel`
    pub async fn cancel(&self, user_id: &str) -> Reply {
        if self.pending.clear(user_id).await {
            log::info!("User {} cancelled /add", user_id);
            Reply::text(render::cancelled())
        } else {
            Reply::text("Nothing to cancel.")
        }
    }

    /// Inline button press. Buttons that do not match the current step are
    /// answered as expired and change nothing.
    pub async fn callback(&self, user_id: &str, data: &str, now: DateTime<Utc>) -> AppResult<CallbackReply> {
        let Some(data) = CallbackData::parse(data) else {
            log::warn!("User {} sent unknown callback data '{}'", user_id, data);
            return Ok(CallbackReply::expired());
        };
        let step = self.pending.get(user_id).await;

        match (data, step) {
            (CallbackData::Cancel, Some(_)) => Ok(CallbackReply::edit(self.cancel(user_id).await)),
            (CallbackData::Category(category), Some(AddStep::AwaitingCategory { amount })) => {
                Ok(CallbackReply::edit(self.choose_category(user_id, amount, category).await?))
            }
            (CallbackData::Confirm(true), Some(AddStep::AwaitingConfirmation { amount, category, note })) => {
                Ok(CallbackReply::edit(self.confirm(user_id, amount, category, note, now).await?))
            }
            (CallbackData::Confirm(false), Some(AddStep::AwaitingConfirmation { .. })) => {
                Ok(CallbackReply::edit(self.discard(user_id).await))
            }
            _ => Ok(CallbackReply::expired()),
        }
    }

    /// Aggregates one window for `user_id`
    pub fn summarize(&self, user_id: &str, window: Window, now: DateTime<Utc>) -> AppResult<Summary> {
        let (start, end) = window.bounds(now, self.settings.offset);
        let transactions = self.store.query_range(user_id, start, end)?;
        Ok(Summary::from_transactions(window, start, end, &transactions))
    }

    /// `/today`, `/week`, `/month`, `/year`
    pub fn summary(&self, user_id: &str, window: Window, now: DateTime<Utc>) -> AppResult<Reply> {
        let summary = self.summarize(user_id, window, now)?;
        Ok(Reply::text(render::summary(&summary)))
    }

    /// `/recent`
    pub fn recent(&self, user_id: &str) -> AppResult<Reply> {
        let transactions = self.store.query_recent(user_id, self.settings.recent_limit)?;
        Ok(Reply::text(render::recent(
            &transactions,
            self.settings.offset,
            &self.settings.currency,
        )))
    }

    /// `/delete <id>`
    pub fn delete(&self, user_id: &str, args: &str) -> AppResult<Reply> {
        let args = args.trim().trim_start_matches('#');
        if args.is_empty() {
            return Ok(Reply::text(render::DELETE_USAGE));
        }
        let id: i64 = args.parse().map_err(|_| {
            AppError::Validation(format!(
                "<i>{}</i> is not a transaction id.\n{}",
                teloxide::utils::html::escape(args),
                render::DELETE_USAGE
            ))
        })?;

        if self.store.delete(user_id, id)? {
            Ok(Reply::text(render::deleted(id)))
        } else {
            Err(AppError::NotFound(render::not_found(id)))
        }
    }

    /// `/status`
    pub async fn status(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<Reply> {
        let transactions = self.store.count_for_user(user_id)?;
        let pending = self.pending.len().await;
        Ok(Reply::text(render::status(&render::StatusInfo {
            transactions,
            database: self.store.path(),
            now,
            offset: self.settings.offset,
            uptime: self.started_at.elapsed(),
            pending,
        })))
    }

    /// Converts a failure into what the user sees.
    ///
    /// Validation and not-found messages are shown as is; anything else is
    /// logged and replaced by a generic "try again".
    pub fn error_reply(&self, err: &AppError) -> Reply {
        match (err.kind(), err) {
            (_, AppError::Validation(message)) | (_, AppError::NotFound(message)) => {
                Reply::text(format!("❌ {}", message))
            }
            (ErrorKind::Storage, _) => {
                log::error!("Storage failure: {}", err);
                Reply::text(render::GENERIC_FAILURE)
            }
            _ => {
                log::error!("Command failed: {}", err);
                Reply::text(render::GENERIC_FAILURE)
            }
        }
    }

    async fn choose_category(&self, user_id: &str, amount: EnteredAmount, category: Category) -> AppResult<Reply> {
        self.pending.set(user_id, AddStep::AwaitingNote { amount, category }).await;
        Ok(Reply::text(render::ask_note(category)))
    }

    async fn ask_confirmation(
        &self,
        user_id: &str,
        amount: EnteredAmount,
        category: Category,
        note: Option<String>,
    ) -> Reply {
        let text = render::confirm(
            amount.resolve(Some(category)),
            category,
            note.as_deref(),
            &self.settings.currency,
        );
        self.pending
            .set(user_id, AddStep::AwaitingConfirmation { amount, category, note })
            .await;
        Reply::with_keyboard(text, Keyboard::Confirm)
    }

    async fn confirm(
        &self,
        user_id: &str,
        amount: EnteredAmount,
        category: Category,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<Reply> {
        // Keep the slot on failure so the user can press save again.
        let tx = self.commit(user_id, amount, Some(category), note, now)?;
        self.pending.clear(user_id).await;
        Ok(Reply::text(render::saved(&tx, self.settings.offset, &self.settings.currency)))
    }

    async fn discard(&self, user_id: &str) -> Reply {
        self.pending.clear(user_id).await;
        log::info!("User {} discarded /add", user_id);
        Reply::text(render::discarded())
    }

    fn commit(
        &self,
        user_id: &str,
        amount: EnteredAmount,
        category: Option<Category>,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<Transaction> {
        let mut new_tx = NewTransaction::new(user_id, amount.resolve(category)).at(now);
        if let Some(category) = category {
            new_tx = new_tx.category(category);
        }
        if let Some(note) = note {
            new_tx = new_tx.note(note);
        }

        let id = self.store.insert(&new_tx)?;
        Ok(Transaction {
            id,
            user_id: new_tx.user_id,
            amount: crate::ledger::amount::round_to_cents(new_tx.amount),
            category: new_tx.category,
            note: new_tx.note,
            created_at: now,
        })
    }
}
