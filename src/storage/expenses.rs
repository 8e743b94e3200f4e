//! Ledger store: the `expenses` table

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;

use crate::core::error::{AppError, AppResult};
use crate::ledger::amount::round_to_cents;
use crate::ledger::{Category, NewTransaction, Transaction};
use crate::storage::db::{create_pool, get_connection, DbPool};

const SELECT_COLUMNS: &str = "SELECT id, user_id, amount, category, note, created_at FROM expenses";

/// Formats a timestamp the way `created_at` is stored: UTC, millisecond
/// precision, fixed width (`2026-03-18T12:34:56.789Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Persistent transaction ledger.
///
/// Cheap to clone; every clone shares the same connection pool. All
/// operations are scoped to a `user_id`.
#[derive(Clone)]
pub struct LedgerStore {
    pool: Arc<DbPool>,
    path: String,
}

impl LedgerStore {
    /// Opens the database at `path`, creating the schema if needed.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = create_pool(path)?;
        Ok(Self::from_pool(Arc::new(pool), path))
    }

    pub fn from_pool(pool: Arc<DbPool>, path: impl Into<String>) -> Self {
        Self {
            pool,
            path: path.into(),
        }
    }

    /// Database file location, shown by `/status`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Records a transaction and returns its new id.
    ///
    /// The amount is rounded to cents. `created_at` defaults to the
    /// insertion time.
    pub fn insert(&self, tx: &NewTransaction) -> AppResult<i64> {
        if !tx.amount.is_finite() {
            return Err(AppError::Validation("Amount must be a finite number.".to_string()));
        }
        if tx.user_id.is_empty() {
            return Err(AppError::Validation("Missing user id.".to_string()));
        }

        let conn = get_connection(&self.pool)?;
        let amount = round_to_cents(tx.amount);
        let created_at = tx.created_at.map(format_timestamp);
        conn.execute(
            "INSERT INTO expenses (user_id, amount, category, note, created_at)
             VALUES (?1, ?2, ?3, ?4, COALESCE(?5, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')))",
            params![
                tx.user_id,
                amount,
                tx.category.map(|c| c.slug()),
                tx.note,
                created_at,
            ],
        )?;
        let id = conn.last_insert_rowid();

        log::info!(
            "User {} added transaction #{}: {} ({})",
            tx.user_id,
            id,
            amount,
            tx.category.map(|c| c.slug()).unwrap_or("-")
        );
        Ok(id)
    }

    /// Removes a transaction owned by `user_id`.
    ///
    /// Returns `false` when the id does not exist or belongs to someone else.
    pub fn delete(&self, user_id: &str, id: i64) -> AppResult<bool> {
        let conn = get_connection(&self.pool)?;
        let rows_affected = conn.execute(
            "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;

        if rows_affected > 0 {
            log::info!("User {} deleted transaction #{}", user_id, id);
        } else {
            log::info!("User {} tried to delete missing transaction #{}", user_id, id);
        }
        Ok(rows_affected > 0)
    }

    /// Transactions with `start <= created_at <= end`, oldest first.
    pub fn query_range(&self, user_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Vec<Transaction>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ?1 AND created_at >= ?2 AND created_at <= ?3
             ORDER BY created_at ASC, id ASC"
        ))?;
        let rows = stmt.query_map(
            params![user_id, format_timestamp(start), format_timestamp(end)],
            transaction_from_row,
        )?;

        let mut transactions = Vec::new();
        for row in rows {
            transactions.push(row?);
        }
        Ok(transactions)
    }

    /// The newest `limit` transactions, newest first.
    pub fn query_recent(&self, user_id: &str, limit: usize) -> AppResult<Vec<Transaction>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2"
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![user_id, limit], transaction_from_row)?;

        let mut transactions = Vec::new();
        for row in rows {
            transactions.push(row?);
        }
        Ok(transactions)
    }

    pub fn count_for_user(&self, user_id: &str) -> AppResult<i64> {
        let conn = get_connection(&self.pool)?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let category: Option<String> = row.get(3)?;
    let created_at: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        category: category.as_deref().and_then(parse_stored_category),
        note: row.get(4)?,
        created_at,
    })
}

/// Older rows may carry a button label instead of a slug.
fn parse_stored_category(raw: &str) -> Option<Category> {
    let category = Category::from_input(raw);
    if category.is_none() && !raw.trim().is_empty() {
        log::warn!("Unknown stored category '{}', reporting as uncategorized", raw);
    }
    category
}
