//! Numeric value parser
//!
//! Extracts a numeric magnitude from display-formatted monetary text. The
//! result is only ever used to decide numeric equality or closeness during
//! matching; display always uses the source text.

use crate::types::CellValue;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a monetary display string into a magnitude
///
/// Every character other than an ASCII digit, `.` or `-` is removed first,
/// which also drops thousands separators and currency symbols. The longest
/// leading `-?digits[.digits]` prefix of what remains is then parsed.
/// Anything without a usable prefix is zero.
///
/// # Examples
///
/// ```
/// use ledger_reconciler::core::amount::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("RD$ 1,250.50"), Decimal::new(125050, 2));
/// assert_eq!(parse_amount(""), Decimal::ZERO);
/// ```
pub fn parse_amount(text: &str) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    numeric_prefix(&cleaned)
        .and_then(|prefix| Decimal::from_str(&prefix).ok())
        .unwrap_or(Decimal::ZERO)
}

/// Magnitude of a raw cell
///
/// Numeric cells pass through unchanged; text goes through [`parse_amount`].
pub fn amount_of(cell: &CellValue) -> Decimal {
    match cell {
        CellValue::Number(number) => *number,
        CellValue::Text(text) => parse_amount(text),
        CellValue::Empty => Decimal::ZERO,
    }
}

/// Longest leading number in a string of digits, dots and minus signs
///
/// Returns the prefix rewritten into a form `Decimal::from_str` accepts
/// (`".5"` becomes `"0.5"`, `"12."` becomes `"12"`), or `None` when there is
/// no digit before the first unexpected character.
fn numeric_prefix(cleaned: &str) -> Option<String> {
    let mut chars = cleaned.chars().peekable();
    let mut sign = "";
    if chars.peek() == Some(&'-') {
        sign = "-";
        chars.next();
    }

    let mut integer = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        integer.push(c);
        chars.next();
    }

    let mut fraction = String::new();
    if chars.peek() == Some(&'.') {
        chars.next();
        while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
            fraction.push(c);
            chars.next();
        }
    }

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }
    if integer.is_empty() {
        integer.push('0');
    }

    if fraction.is_empty() {
        Some(format!("{}{}", sign, integer))
    } else {
        Some(format!("{}{}.{}", sign, integer, fraction))
    }
}
