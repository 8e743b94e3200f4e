//! HTML reply text
//!
//! Everything here produces Telegram HTML. User-provided text goes through
//! [`escape`] before it is embedded.

use chrono::{DateTime, FixedOffset, Utc};
use indoc::indoc;
use std::time::Duration;
use teloxide::utils::html::escape;

use crate::core::config::add_prompt::MAX_NOTE_CHARS;
use crate::ledger::amount::{format_cents, format_signed, to_cents};
use crate::ledger::{Category, EnteredAmount, Summary, Transaction};

pub const HELP: &str = indoc! {"
    📖 <b>Expense Tracker Help</b>

    <b>Recording</b>
    /add - add a transaction step by step
    /add 12.50 food lunch - add in one go
    /skip - skip the note while adding
    /cancel - abort the current /add

    <b>Reports</b>
    /today - today's summary
    /week - this week (from Monday)
    /month - this month
    /year - this year
    /recent - latest transactions

    <b>Managing</b>
    /delete &lt;id&gt; - delete a transaction
    /status - bot status

    Amounts are expenses unless the category is income or salary.
    Prefix with + or - to force the sign.
"};

pub const ADD_USAGE: &str = "Usage: <code>/add 12.50 food lunch</code> or just /add";
pub const DELETE_USAGE: &str = "Usage: <code>/delete &lt;id&gt;</code>\nFind ids with /recent.";
pub const NO_ADD_IN_PROGRESS: &str = "No /add in progress. Use /add to record a transaction.";
pub const PROMPT_EXPIRED: &str = "This prompt has expired";
pub const GENERIC_FAILURE: &str = "⚠️ Something went wrong while saving your data. Please try again.";

/// Telegram rejects messages longer than this, counted in UTF-16 units
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Notes longer than this are cut in the `/recent` listing
const NOTE_PREVIEW_CHARS: usize = 80;

/// Length of `text` as Telegram counts it
pub fn message_len(text: &str) -> usize {
    text.encode_utf16().count()
}

pub fn welcome(first_name: Option<&str>) -> String {
    let name = first_name.map(escape).unwrap_or_else(|| "there".to_string());
    format!(
        "👋 Hi {}!\n\nI keep track of your income and expenses.\n\n\
         Use /add to record a transaction and /today, /week, /month or /year for summaries.\n\
         Send /help for the full list of commands.",
        name
    )
}

pub fn ask_amount() -> String {
    "💵 <b>Enter the amount</b>\n\nFor example <code>15.50</code>. Prefix with + for income.\n/cancel to abort.".to_string()
}

pub fn invalid_amount(reason: &str) -> String {
    format!("❌ {}\n\n💵 Enter the amount again, or /cancel.", escape(reason))
}

pub fn ask_category(amount: &EnteredAmount) -> String {
    format!(
        "💵 Amount: <b>{}</b>\n\n📁 <b>Select a category:</b>",
        format_cents(to_cents(amount.magnitude))
    )
}

pub fn unknown_category(input: &str) -> String {
    format!(
        "❓ Unknown category <i>{}</i>.\n\n📁 Pick one of the buttons below.",
        escape(input)
    )
}

pub fn ask_note(category: Category) -> String {
    format!(
        "📁 Category: {}\n\n📝 <b>Add a note</b> (or /skip):",
        category.label()
    )
}

pub fn note_too_long(chars: usize) -> String {
    format!(
        "❌ That note has {} characters, the limit is {}.\n\n📝 Send a shorter note, /skip or /cancel.",
        chars, MAX_NOTE_CHARS
    )
}

pub fn confirm(amount: f64, category: Category, note: Option<&str>, currency: &str) -> String {
    format!(
        "✅ <b>Confirm transaction</b>\n\n\
         • 💵 Amount: <b>{}</b>\n\
         • 🏷️ Category: {}\n\
         • 📝 Note: {}\n\n\
         Save it?",
        escape(&format_signed(to_cents(amount), currency)),
        category.label(),
        note.map(escape).unwrap_or_else(|| "-".to_string()),
    )
}

pub fn saved(tx: &Transaction, offset: FixedOffset, currency: &str) -> String {
    let mut text = format!(
        "✅ <b>Saved #{}</b>\n\n\
         • 💵 Amount: <b>{}</b>\n\
         • 🏷️ Category: {} {}\n\
         • 📅 Date: {}",
        tx.id,
        escape(&format_signed(tx.cents(), currency)),
        glyph(tx.category),
        slug(tx.category),
        local_time(tx.created_at, offset),
    );
    if let Some(note) = &tx.note {
        text.push_str(&format!("\n• 📝 Note: {}", escape(note)));
    }
    text
}

pub fn discarded() -> String {
    "🗑️ Transaction discarded.".to_string()
}

pub fn cancelled() -> String {
    "❌ Cancelled.".to_string()
}

pub fn summary(summary: &Summary) -> String {
    if summary.is_empty() {
        return format!(
            "📊 <b>{}</b>\n\nNo transactions yet. Use /add to record one.",
            summary.window.title()
        );
    }

    let mut text = format!(
        "📊 <b>{}</b>\n\n\
         💰 Income: <b>{}</b>\n\
         💸 Expense: <b>{}</b>\n\
         📈 Net: <b>{}</b>\n\
         🧾 Transactions: {}\n",
        summary.window.title(),
        format_cents(summary.income),
        format_cents(summary.expense),
        format_cents(summary.net()),
        summary.count,
    );

    if !summary.by_category.is_empty() {
        text.push_str("\n<b>By category:</b>\n");
        for item in &summary.by_category {
            let value = if item.total > 0 {
                format!("+{}", format_cents(item.total))
            } else {
                format_cents(item.total.abs())
            };
            text.push_str(&format!(
                "{} {}: {} ({:.1}%)\n",
                item.glyph(),
                item.slug(),
                value,
                summary.share(item)
            ));
        }
    }
    text
}

pub fn recent(transactions: &[Transaction], offset: FixedOffset, currency: &str) -> String {
    if transactions.is_empty() {
        return "📋 No transactions yet. Use /add to record one.".to_string();
    }

    const FOOTER: &str = "\nDelete with /delete &lt;id&gt;";
    // Room for the header, the "older" line and the footer
    let budget = MAX_MESSAGE_LEN - 160;

    let mut rows = String::new();
    let mut shown = 0;
    for tx in transactions {
        let mut row = format!(
            "<code>#{}</code> {} {} {} <b>{}</b>",
            tx.id,
            local_time(tx.created_at, offset),
            glyph(tx.category),
            slug(tx.category),
            escape(&format_signed(tx.cents(), currency)),
        );
        if let Some(note) = &tx.note {
            row.push_str(&format!(" - {}", escape(&preview(note))));
        }
        row.push('\n');

        if message_len(&rows) + message_len(&row) > budget {
            break;
        }
        rows.push_str(&row);
        shown += 1;
    }

    let mut text = format!("📋 <b>Last {} transactions</b>\n\n{}", shown, rows);
    let hidden = transactions.len() - shown;
    if hidden > 0 {
        text.push_str(&format!("… {} older not shown\n", hidden));
    }
    text.push_str(FOOTER);
    text
}

pub fn deleted(id: i64) -> String {
    format!("🗑️ Transaction #{} deleted.", id)
}

pub fn not_found(id: i64) -> String {
    format!("Transaction #{} not found", id)
}

pub struct StatusInfo<'a> {
    pub transactions: i64,
    pub database: &'a str,
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
    pub uptime: Duration,
    pub pending: usize,
}

pub fn status(info: &StatusInfo<'_>) -> String {
    format!(
        "🤖 <b>Bot status</b>\n\n\
         ✅ Running\n\
         🧾 Your transactions: {}\n\
         💾 Database: <code>{}</code>\n\
         🕐 Server time: {} (UTC{})\n\
         ⏱️ Uptime: {}\n\
         ✏️ Prompts in progress: {}",
        info.transactions,
        escape(info.database),
        info.now.with_timezone(&info.offset).format("%Y-%m-%d %H:%M:%S"),
        info.offset,
        uptime(info.uptime),
        info.pending,
    )
}

/// `3725s` renders as `1h 2m 5s`; leading zero units are dropped.
pub fn uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let units = [(secs / 86_400, 'd'), (secs / 3_600 % 24, 'h'), (secs / 60 % 60, 'm')];

    let mut text: String = units
        .iter()
        .skip_while(|(value, _)| *value == 0)
        .map(|(value, unit)| format!("{}{} ", value, unit))
        .collect();
    text.push_str(&format!("{}s", secs % 60));
    text
}

fn preview(note: &str) -> String {
    if note.chars().count() <= NOTE_PREVIEW_CHARS {
        return note.to_string();
    }
    let mut cut: String = note.chars().take(NOTE_PREVIEW_CHARS - 1).collect();
    cut.push('…');
    cut
}

fn local_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string()
}

fn glyph(category: Option<Category>) -> &'static str {
    crate::ledger::category::glyph_or_uncategorized(category)
}

fn slug(category: Option<Category>) -> &'static str {
    crate::ledger::category::slug_or_uncategorized(category)
}
