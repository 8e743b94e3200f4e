//! Test fixtures
//!
//! Provides a TestEnvironment backed by a throwaway SQLite file.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use expensebot::commands::{CommandHandler, HandlerSettings};
use expensebot::storage::LedgerStore;
use tempfile::TempDir;
use tokio::time::Duration;

/// Complete test environment
///
/// # Example
/// ```ignore
/// let env = TestEnvironment::new();
/// let reply = env.handler.add("1", "12.50 food", at(2026, 3, 18, 12, 0)).await?;
/// ```
pub struct TestEnvironment {
    /// Keeps the database directory alive
    pub dir: TempDir,
    pub store: LedgerStore,
    pub handler: CommandHandler,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self::with_settings(HandlerSettings::default())
    }

    /// Environment whose `/add` prompts expire after `ttl`
    pub fn with_add_timeout(ttl: Duration) -> Self {
        Self::with_settings(HandlerSettings {
            add_timeout: ttl,
            ..HandlerSettings::default()
        })
    }

    pub fn with_settings(settings: HandlerSettings) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("expenses.sqlite");
        let store = LedgerStore::open(path.to_str().expect("utf-8 path")).expect("open store");
        let handler = CommandHandler::new(store.clone(), settings);
        Self { dir, store, handler }
    }
}

/// UTC timestamp shorthand
pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}
