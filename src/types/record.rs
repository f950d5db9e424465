//! Record types for the Ledger Reconciler
//!
//! This module defines the raw, source-shaped rows handed over by ingestion and
//! the canonical record every ledger is normalized into before matching.

use crate::core::amount::parse_amount;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Sentinel used for text fields with no source value
pub const MISSING_TEXT: &str = "N/A";

/// Sentinel used for monetary fields with no source value
pub const MISSING_AMOUNT: &str = "0";

/// A single cell as produced by the ingestion layer
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Display text, kept exactly as it appeared in the source
    Text(String),

    /// Numeric cell (spreadsheet sources hand these over already typed)
    Number(Decimal),

    /// No value
    Empty,
}

impl CellValue {
    /// Build a cell from a delimited-text field
    ///
    /// Empty fields become `Empty`; anything else is kept verbatim as `Text`.
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(field.to_string())
        }
    }

    /// Whether the cell carries no usable value
    ///
    /// Whitespace-only text counts as empty, so such a cell is replaced by the
    /// missing-value sentinel rather than kept as source text. Any other text,
    /// padding included, is kept verbatim.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Number(_) => false,
            CellValue::Empty => true,
        }
    }

    /// Display text of the cell, `None` when empty
    pub fn display_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self {
            CellValue::Text(text) => Some(text.clone()),
            CellValue::Number(number) => Some(number.to_string()),
            CellValue::Empty => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(number) => write!(f, "{}", number),
            CellValue::Empty => Ok(()),
        }
    }
}

/// One source row: column names mapped to cells, in source column order
///
/// Column order matters: the schema detector's tie-break picks the first
/// matching column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell, keeping insertion order
    pub fn push(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.push((column.into(), value));
    }

    /// Builder-style variant of [`RawRow::push`]
    pub fn with(mut self, column: impl Into<String>, value: CellValue) -> Self {
        self.push(column, value);
        self
    }

    /// Look up a cell by exact column name
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in source order
    pub fn column_names(&self) -> Vec<String> {
        self.cells.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        RawRow {
            cells: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// Which side of a ledger entry carries the amount used for matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    /// The side a counterpart must carry the amount on
    ///
    /// A system debit is paired against a bank credit and vice versa.
    pub fn opposite(self) -> Self {
        match self {
            Side::Debit => Side::Credit,
            Side::Credit => Side::Debit,
        }
    }
}

/// Normalized transaction record
///
/// All sources are converted into this shape before matching. Every field is
/// display text preserved from the source file; amounts used for matching are
/// derived on demand and never shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRecord {
    /// Display-formatted date (opaque, never parsed as a calendar date)
    #[serde(rename = "fecha")]
    pub date: String,

    /// Identifier or document reference
    #[serde(rename = "referencia")]
    pub reference: String,

    /// Free-text description
    #[serde(rename = "descripcion")]
    pub description: String,

    /// Debit amount exactly as displayed in the source
    #[serde(rename = "debito")]
    pub debit: String,

    /// Credit amount exactly as displayed in the source
    #[serde(rename = "credito")]
    pub credit: String,
}

impl CanonicalRecord {
    /// Build a record with the given amounts and sentinel text fields
    pub fn with_amounts(debit: impl Into<String>, credit: impl Into<String>) -> Self {
        CanonicalRecord {
            date: MISSING_TEXT.to_string(),
            reference: MISSING_TEXT.to_string(),
            description: MISSING_TEXT.to_string(),
            debit: debit.into(),
            credit: credit.into(),
        }
    }

    /// Numeric magnitude of the debit column
    pub fn debit_amount(&self) -> Decimal {
        parse_amount(&self.debit)
    }

    /// Numeric magnitude of the credit column
    pub fn credit_amount(&self) -> Decimal {
        parse_amount(&self.credit)
    }

    /// Amount on the given side
    pub fn amount_on(&self, side: Side) -> Decimal {
        match side {
            Side::Debit => self.debit_amount(),
            Side::Credit => self.credit_amount(),
        }
    }

    /// The side and amount this record is matched on
    ///
    /// Debit wins whenever it is positive, even if credit is also populated.
    pub fn matching_side(&self) -> (Side, Decimal) {
        let debit = self.debit_amount();
        if debit > Decimal::ZERO {
            (Side::Debit, debit)
        } else {
            (Side::Credit, self.credit_amount())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty_field("", CellValue::Empty)]
    #[case::text_field("100.00", CellValue::Text("100.00".to_string()))]
    #[case::padded_field(" 1,000.00 ", CellValue::Text(" 1,000.00 ".to_string()))]
    fn test_cell_from_field(#[case] field: &str, #[case] expected: CellValue) {
        assert_eq!(CellValue::from_field(field), expected);
    }

    #[test]
    fn test_cell_display_text() {
        assert_eq!(CellValue::Empty.display_text(), None);
        assert_eq!(CellValue::Text("   ".to_string()).display_text(), None);
        assert_eq!(
            CellValue::Number(Decimal::new(12550, 2)).display_text(),
            Some("125.50".to_string())
        );
    }

    #[test]
    fn test_raw_row_preserves_column_order() {
        let row = RawRow::new()
            .with("Fecha", CellValue::from_field("01/02/2024"))
            .with("Débito", CellValue::from_field("10.00"))
            .with("Crédito", CellValue::Empty);

        assert_eq!(row.column_names(), vec!["Fecha", "Débito", "Crédito"]);
        assert_eq!(row.get("Débito"), Some(&CellValue::Text("10.00".to_string())));
        assert_eq!(row.get("Missing"), None);
        assert_eq!(row.len(), 3);
    }

    #[rstest]
    #[case::debit_only("100.00", "0", Side::Debit, Decimal::new(10000, 2))]
    #[case::credit_only("0", "75.25", Side::Credit, Decimal::new(7525, 2))]
    #[case::both_populated_prefers_debit("20.00", "30.00", Side::Debit, Decimal::new(2000, 2))]
    #[case::negative_debit_uses_credit("-5.00", "5.00", Side::Credit, Decimal::new(500, 2))]
    #[case::both_zero("0", "0", Side::Credit, Decimal::ZERO)]
    fn test_matching_side(
        #[case] debit: &str,
        #[case] credit: &str,
        #[case] side: Side,
        #[case] amount: Decimal,
    ) {
        let record = CanonicalRecord::with_amounts(debit, credit);
        assert_eq!(record.matching_side(), (side, amount));
    }

    #[test]
    fn test_opposite_side() {
        assert_eq!(Side::Debit.opposite(), Side::Credit);
        assert_eq!(Side::Credit.opposite(), Side::Debit);
    }

    #[test]
    fn test_canonical_record_serializes_with_report_names() {
        let record = CanonicalRecord {
            date: "01/01/2024".to_string(),
            reference: "F-1".to_string(),
            description: "Cobro".to_string(),
            debit: "1,500.00".to_string(),
            credit: "0".to_string(),
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        assert_eq!(
            output,
            "fecha,referencia,descripcion,debito,credito\n01/01/2024,F-1,Cobro,\"1,500.00\",0\n"
        );
    }
}
