//! Record normalization
//!
//! Converts source rows into canonical records using the mapping chosen by
//! the [`SchemaDetector`]. Cell text is carried over verbatim; only missing
//! values are replaced, by [`MISSING_TEXT`] or [`MISSING_AMOUNT`].
//!
//! Row order is preserved exactly. The matching engine's greedy passes are
//! order-sensitive, so the n-th canonical record must come from the n-th row.

use crate::core::schema::{ColumnMapping, DetectedSchema, SchemaDetector, Validation};
use crate::types::{CanonicalRecord, RawRow, ReconcileError, MISSING_AMOUNT, MISSING_TEXT};

/// Turns raw ledger rows into canonical records
#[derive(Default)]
pub struct Normalizer {
    detector: SchemaDetector,
}

impl Normalizer {
    /// Normalizer using the built-in layouts
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer using a custom detector
    pub fn with_detector(detector: SchemaDetector) -> Self {
        Normalizer { detector }
    }

    /// Check a dataset's layout without normalizing it
    pub fn validate(&self, rows: &[RawRow]) -> Validation {
        self.detector.detect_rows(rows)
    }

    /// Normalize every row of a ledger
    ///
    /// An empty ledger normalizes to an empty sequence. A ledger whose columns
    /// cannot be mapped fails with [`ReconcileError::SchemaValidation`], tagged
    /// with `source_name` so the caller can tell the two ledgers apart.
    pub fn normalize(
        &self,
        source_name: &str,
        rows: Vec<RawRow>,
    ) -> Result<Vec<CanonicalRecord>, ReconcileError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        match self.detector.detect_rows(&rows) {
            Validation::Valid(schema) => Ok(normalize_with(&schema, &rows)),
            Validation::Invalid { reason } => {
                Err(ReconcileError::schema_validation(source_name, &reason))
            }
        }
    }
}

/// Normalize rows with an already detected schema
pub fn normalize_with(schema: &DetectedSchema, rows: &[RawRow]) -> Vec<CanonicalRecord> {
    rows.iter()
        .map(|row| normalize_row(&schema.mapping, row))
        .collect()
}

fn normalize_row(mapping: &ColumnMapping, row: &RawRow) -> CanonicalRecord {
    CanonicalRecord {
        date: text_field(row, mapping.date.as_deref()),
        reference: text_field(row, mapping.reference.as_deref()),
        description: description_field(row, mapping),
        debit: amount_field(row, mapping.debit.as_deref()),
        credit: amount_field(row, mapping.credit.as_deref()),
    }
}

fn cell_text(row: &RawRow, column: Option<&str>) -> Option<String> {
    column
        .and_then(|name| row.get(name))
        .and_then(|cell| cell.display_text())
}

fn text_field(row: &RawRow, column: Option<&str>) -> String {
    cell_text(row, column).unwrap_or_else(|| MISSING_TEXT.to_string())
}

fn amount_field(row: &RawRow, column: Option<&str>) -> String {
    cell_text(row, column).unwrap_or_else(|| MISSING_AMOUNT.to_string())
}

/// Description, optionally prefixed with the movement code
///
/// Falls back to the code alone when the description cell is empty.
fn description_field(row: &RawRow, mapping: &ColumnMapping) -> String {
    let description = cell_text(row, mapping.description.as_deref());
    let code = cell_text(row, mapping.movement_code.as_deref());

    match (code, description) {
        (Some(code), Some(description)) if !description.contains(&code) => {
            format!("{} - {}", code, description)
        }
        (_, Some(description)) => description,
        (Some(code), None) => code,
        (None, None) => MISSING_TEXT.to_string(),
    }
}
