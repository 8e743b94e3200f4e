//! Window aggregation: income, expense, net and per-category subtotals

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::ledger::amount::{format_cents, Cents};
use crate::ledger::category::{glyph_or_uncategorized, slug_or_uncategorized};
use crate::ledger::{Category, Transaction, Window};

/// Net subtotal of one category inside a window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Option<Category>,
    /// Signed: positive for net income, negative for net spending
    pub total: Cents,
    pub count: usize,
}

impl CategoryTotal {
    pub fn slug(&self) -> &'static str {
        slug_or_uncategorized(self.category)
    }

    pub fn glyph(&self) -> &'static str {
        glyph_or_uncategorized(self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub window: Window,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Sum of positive amounts
    pub income: Cents,
    /// Sum of negative amounts, as a magnitude
    pub expense: Cents,
    pub count: usize,
    /// Sorted by magnitude, largest first
    pub by_category: Vec<CategoryTotal>,
}

impl Summary {
    pub fn from_transactions(
        window: Window,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        transactions: &[Transaction],
    ) -> Self {
        let mut income: Cents = 0;
        let mut expense: Cents = 0;
        let mut groups: BTreeMap<Option<Category>, (Cents, usize)> = BTreeMap::new();

        for tx in transactions {
            let cents = tx.cents();
            if cents >= 0 {
                income += cents;
            } else {
                expense += -cents;
            }
            let entry = groups.entry(tx.category).or_insert((0, 0));
            entry.0 += cents;
            entry.1 += 1;
        }

        let mut by_category: Vec<CategoryTotal> = groups
            .into_iter()
            .map(|(category, (total, count))| CategoryTotal { category, total, count })
            .collect();
        by_category.sort_by(|a, b| b.total.abs().cmp(&a.total.abs()).then_with(|| a.slug().cmp(b.slug())));

        Self {
            window,
            start,
            end,
            income,
            expense,
            count: transactions.len(),
            by_category,
        }
    }

    /// Income minus expense
    pub fn net(&self) -> Cents {
        self.income - self.expense
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Share of a category within its side (income or expense), in percent
    pub fn share(&self, item: &CategoryTotal) -> f64 {
        let side = if item.total >= 0 { self.income } else { self.expense };
        if side == 0 {
            0.0
        } else {
            item.total.abs() as f64 * 100.0 / side as f64
        }
    }
}

/// Plain-text report used by the command line
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} .. {})", self.window.title(), self.start.to_rfc3339(), self.end.to_rfc3339())?;
        writeln!(f, "Income:       {}", format_cents(self.income))?;
        writeln!(f, "Expense:      {}", format_cents(self.expense))?;
        writeln!(f, "Net:          {}", format_cents(self.net()))?;
        writeln!(f, "Transactions: {}", self.count)?;
        for item in &self.by_category {
            writeln!(f, "  {}: {} ({:.1}%)", item.slug(), format_cents(item.total), self.share(item))?;
        }
        Ok(())
    }
}
