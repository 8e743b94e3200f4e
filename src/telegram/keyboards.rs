//! Inline keyboards for the `/add` prompt

use strum::IntoEnumIterator;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::commands::{CallbackData, Keyboard};
use crate::ledger::Category;

const CATEGORIES_PER_ROW: usize = 2;

pub fn keyboard_markup(keyboard: Keyboard) -> InlineKeyboardMarkup {
    match keyboard {
        Keyboard::Categories => category_keyboard(),
        Keyboard::Confirm => confirm_keyboard(),
    }
}

/// Two categories per row, cancel at the bottom
pub fn category_keyboard() -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = Category::iter()
        .map(|category| {
            InlineKeyboardButton::callback(category.label(), CallbackData::Category(category).encode())
        })
        .collect();

    let mut rows: Vec<Vec<InlineKeyboardButton>> = buttons
        .chunks(CATEGORIES_PER_ROW)
        .map(|chunk| chunk.to_vec())
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        "❌ Cancel",
        CallbackData::Cancel.encode(),
    )]);

    InlineKeyboardMarkup::new(rows)
}

pub fn confirm_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Save", CallbackData::Confirm(true).encode()),
        InlineKeyboardButton::callback("❌ Discard", CallbackData::Confirm(false).encode()),
    ]])
}
