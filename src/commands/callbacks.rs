//! Inline keyboard callback payloads

use std::str::FromStr;

use crate::ledger::Category;

/// Decoded `callback_data` of the bot's inline buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackData {
    /// `cat:<slug>`
    Category(Category),
    /// `confirm:yes` / `confirm:no`
    Confirm(bool),
    /// `add:cancel`
    Cancel,
}

impl CallbackData {
    pub fn encode(&self) -> String {
        match self {
            CallbackData::Category(category) => format!("cat:{}", category.slug()),
            CallbackData::Confirm(true) => "confirm:yes".to_string(),
            CallbackData::Confirm(false) => "confirm:no".to_string(),
            CallbackData::Cancel => "add:cancel".to_string(),
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        let (prefix, value) = data.split_once(':')?;
        match (prefix, value) {
            ("cat", slug) => Category::from_str(slug).ok().map(CallbackData::Category),
            ("confirm", "yes") => Some(CallbackData::Confirm(true)),
            ("confirm", "no") => Some(CallbackData::Confirm(false)),
            ("add", "cancel") => Some(CallbackData::Cancel),
            _ => None,
        }
    }
}
