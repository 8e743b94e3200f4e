//! Amount parsing and cent arithmetic
//!
//! Amounts are persisted as signed reals (positive = income, negative =
//! expense) rounded to two decimals. All aggregation happens in integer
//! cents so category subtotals add up exactly to the net total.

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::ledger::Category;

/// Money expressed as integer cents. `1250` is `12.50`.
pub type Cents = i64;

/// Explicit sign typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Income,
    Expense,
}

/// An amount as typed: a positive magnitude plus an optional explicit sign.
///
/// The final signed value is only known once the category is chosen, see
/// [`EnteredAmount::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnteredAmount {
    pub magnitude: f64,
    pub sign: Option<Sign>,
}

impl EnteredAmount {
    /// Applies the sign convention: an explicit sign wins, otherwise income
    /// categories are positive and everything else is negative.
    pub fn resolve(&self, category: Option<Category>) -> f64 {
        let sign = self.sign.unwrap_or(match category {
            Some(c) if c.is_income() => Sign::Income,
            _ => Sign::Expense,
        });
        match sign {
            Sign::Income => self.magnitude,
            Sign::Expense => -self.magnitude,
        }
    }
}

/// Parses user input such as `15.50`, `15,5`, `$100`, `-12.5` or `+2000`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] with a user-facing reason when the input
/// is not a number, is zero, or exceeds [`config::amount::MAX_ABS`].
pub fn parse_amount(input: &str) -> AppResult<EnteredAmount> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Please enter a valid number.".to_string()));
    }

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (Some(Sign::Income), &trimmed[1..]),
        Some('-') => (Some(Sign::Expense), &trimmed[1..]),
        _ => (None, trimmed),
    };

    let digits: String = rest
        .trim()
        .trim_start_matches(|c: char| matches!(c, '$' | '€' | '£' | '¥' | '₽' | '₴' | '₹'))
        .trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '_')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(AppError::Validation("Please enter a valid number.".to_string()));
    }

    let value: f64 = digits
        .parse()
        .map_err(|_| AppError::Validation("Please enter a valid number.".to_string()))?;

    let magnitude = round_to_cents(value);
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return Err(AppError::Validation("Amount must be greater than zero.".to_string()));
    }
    if magnitude > config::amount::MAX_ABS {
        return Err(AppError::Validation(format!(
            "Amount is too large (maximum {}).",
            format_cents(to_cents(config::amount::MAX_ABS))
        )));
    }

    Ok(EnteredAmount { magnitude, sign })
}

/// Rounds to two decimals, half away from zero
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts a stored amount into cents
pub fn to_cents(value: f64) -> Cents {
    (value * 100.0).round() as Cents
}

/// Format cents as a plain decimal string.
/// Example: 1250 -> "12.50", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Like [`format_cents`] but always carries a sign and a currency symbol.
/// Example: (1250, "$") -> "+$12.50", (-1250, "$") -> "-$12.50"
pub fn format_signed(cents: Cents, currency: &str) -> String {
    let sign = if cents < 0 { "-" } else { "+" };
    format!("{}{}{}", sign, currency, format_cents(cents.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_plain_and_decimal_amounts() {
        assert_eq!(parse_amount("15.50").unwrap().magnitude, 15.5);
        assert_eq!(parse_amount("100").unwrap().magnitude, 100.0);
        assert_eq!(parse_amount("12,5").unwrap().magnitude, 12.5);
        assert_eq!(parse_amount("$ 7.25").unwrap().magnitude, 7.25);
        assert_eq!(parse_amount("1 200").unwrap().magnitude, 1200.0);
        assert_eq!(parse_amount(".5").unwrap().magnitude, 0.5);
    }

    #[test]
    fn test_parse_explicit_sign() {
        let expense = parse_amount("-12.50").unwrap();
        assert_eq!(expense.sign, Some(Sign::Expense));
        assert_eq!(expense.magnitude, 12.5);

        let income = parse_amount("+2000").unwrap();
        assert_eq!(income.sign, Some(Sign::Income));
        assert_eq!(parse_amount("3").unwrap().sign, None);
    }

    #[test]
    fn test_parse_rejects_non_numeric_zero_and_huge() {
        for bad in ["", "abc", "12abc", "1.2.3", "--5", "NaN", "inf", "1e5"] {
            assert!(
                matches!(parse_amount(bad), Err(AppError::Validation(_))),
                "expected validation error for {:?}",
                bad
            );
        }
        assert!(matches!(parse_amount("0"), Err(AppError::Validation(_))));
        assert!(matches!(parse_amount("0.001"), Err(AppError::Validation(_))));
        assert!(matches!(parse_amount("2000000000"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_resolve_sign_convention() {
        let plain = parse_amount("10").unwrap();
        assert_eq!(plain.resolve(Some(Category::Food)), -10.0);
        assert_eq!(plain.resolve(Some(Category::Salary)), 10.0);
        assert_eq!(plain.resolve(None), -10.0);

        let forced_income = parse_amount("+10").unwrap();
        assert_eq!(forced_income.resolve(Some(Category::Gifts)), 10.0);

        let forced_expense = parse_amount("-10").unwrap();
        assert_eq!(forced_expense.resolve(Some(Category::Income)), -10.0);
    }

    #[test]
    fn test_cents_formatting() {
        assert_eq!(to_cents(-12.5), -1250);
        assert_eq!(to_cents(0.1 + 0.2), 30);
        assert_eq!(format_cents(1250), "12.50");
        assert_eq!(format_cents(-5), "-0.05");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_signed(-1250, "$"), "-$12.50");
        assert_eq!(format_signed(200000, "€"), "+€2000.00");
    }
}
