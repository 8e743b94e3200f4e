//! Expense ledger domain: categories, amounts, transactions and summaries

pub mod amount;
pub mod category;
pub mod summary;
pub mod transaction;
pub mod window;

pub use amount::{format_cents, format_signed, parse_amount, Cents, EnteredAmount, Sign};
pub use category::Category;
pub use summary::{CategoryTotal, Summary};
pub use transaction::{NewTransaction, Transaction};
pub use window::Window;
