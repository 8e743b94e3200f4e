//! Personal expense tracking Telegram bot
//!
//! Users record income and expenses with `/add`, and get summaries per
//! day, week, month or year. Everything is stored in one SQLite table.
//!
//! - [`ledger`] holds the domain types and aggregation
//! - [`storage`] persists transactions
//! - [`commands`] maps bot commands to ledger operations
//! - [`telegram`] wires the command handler into teloxide

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cli;
pub mod commands;
pub mod core;
pub mod ledger;
pub mod storage;
pub mod telegram;
