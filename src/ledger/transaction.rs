use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ledger::amount::{to_cents, Cents};
use crate::ledger::Category;

/// A recorded income (positive amount) or expense (negative amount).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// Store-assigned id, never reused
    pub id: i64,
    /// Owner; the Telegram user id rendered as a string
    pub user_id: String,
    pub amount: f64,
    pub category: Option<Category>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn cents(&self) -> Cents {
        to_cents(self.amount)
    }
}

/// Insert payload for the ledger store.
///
/// `created_at` defaults to the insertion time when `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub user_id: String,
    pub amount: f64,
    pub category: Option<Category>,
    pub note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewTransaction {
    pub fn new(user_id: impl Into<String>, amount: f64) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            category: None,
            note: None,
            created_at: None,
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Blank notes are dropped
    pub fn note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        let trimmed = note.trim();
        self.note = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_drops_blank_notes() {
        let tx = NewTransaction::new("42", -3.0).category(Category::Food).note("   ");
        assert_eq!(tx.note, None);
        assert_eq!(tx.category, Some(Category::Food));

        let tx = NewTransaction::new("42", -3.0).note("  coffee ");
        assert_eq!(tx.note.as_deref(), Some("coffee"));
    }
}
