//! Database pool, schema migrations and the ledger store

pub mod db;
pub mod expenses;
pub mod migrations;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbPool};
pub use expenses::{format_timestamp, LedgerStore};
