//! Schema detection
//!
//! Decides how the columns of an incoming ledger map onto the canonical
//! record. Named vendor layouts are tried first, in priority order, and
//! generic keyword inference is the final fallback.
//!
//! # Layouts
//!
//! - **Navision / Dynamics**: `Posting Date`, `Document No.`, `Debit`, ...
//! - **BHD bank statement**: `Fecha`, `Débito` (sometimes padded as `" Débito "`), ...
//! - **Generic**: any layout whose lowercased column names contain a date
//!   keyword and at least one debit or credit keyword

use crate::core::traits::SchemaStrategy;
use crate::types::RawRow;

const DATE_PATTERNS: &[&str] = &["fecha", "date", "posting date", "posting"];
const DEBIT_PATTERNS: &[&str] = &["déb", "deb", "cargo", "debe", "debit"];
const CREDIT_PATTERNS: &[&str] = &["créd", "cred", "abono", "haber", "credit"];
const REFERENCE_PATTERNS: &[&str] = &["ref", "no.", "num", "document", "ncf"];
const DESCRIPTION_PATTERNS: &[&str] = &["desc", "concept", "detalle", "mov"];

/// Which source column feeds each canonical field
///
/// `None` means the field has no source column and falls back to its sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMapping {
    pub date: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub debit: Option<String>,
    pub credit: Option<String>,

    /// Movement code column, prefixed to the description when both exist
    pub movement_code: Option<String>,
}

impl ColumnMapping {
    /// A mapping is usable when it has a date and at least one amount column
    pub fn is_complete(&self) -> bool {
        self.date.is_some() && (self.debit.is_some() || self.credit.is_some())
    }
}

/// How a ledger's layout was recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// A known vendor layout with a fixed mapping
    Named(&'static str),

    /// Keyword-based inference
    Generic,
}

/// A recognized layout and the mapping it yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedSchema {
    pub layout: Layout,
    pub mapping: ColumnMapping,
}

/// Outcome of validating a ledger's columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(DetectedSchema),
    Invalid { reason: String },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// Human-readable reason for an invalid result
    pub fn reason(&self) -> Option<&str> {
        match self {
            Validation::Valid(_) => None,
            Validation::Invalid { reason } => Some(reason),
        }
    }

    pub fn schema(&self) -> Option<&DetectedSchema> {
        match self {
            Validation::Valid(schema) => Some(schema),
            Validation::Invalid { .. } => None,
        }
    }
}

/// Navision / Dynamics general ledger export
#[derive(Debug, Default, Clone, Copy)]
pub struct NavisionLayout;

impl SchemaStrategy for NavisionLayout {
    fn name(&self) -> &'static str {
        "navision"
    }

    fn detect(&self, columns: &[String]) -> Option<ColumnMapping> {
        let recognized = ["Posting Date", "Document No.", "Debit"]
            .iter()
            .all(|required| has_column(columns, required));
        if !recognized {
            return None;
        }

        Some(ColumnMapping {
            date: Some("Posting Date".to_string()),
            reference: Some("Document No.".to_string()),
            description: Some("Description".to_string()),
            debit: Some("Debit".to_string()),
            credit: Some("Credit".to_string()),
            movement_code: None,
        })
    }
}

/// BHD bank statement export
#[derive(Debug, Default, Clone, Copy)]
pub struct BhdLayout;

impl SchemaStrategy for BhdLayout {
    fn name(&self) -> &'static str {
        "bhd"
    }

    fn detect(&self, columns: &[String]) -> Option<ColumnMapping> {
        let recognized = has_column(columns, "Fecha")
            && (has_column(columns, "Débito") || has_column(columns, " Débito "));
        if !recognized {
            return None;
        }

        let containing = |needles: &[&str]| {
            columns
                .iter()
                .find(|col| needles.iter().any(|needle| col.contains(needle)))
                .cloned()
        };

        Some(ColumnMapping {
            date: Some("Fecha".to_string()),
            reference: columns
                .iter()
                .find(|col| *col == "Referencia" || *col == "NCF")
                .cloned(),
            description: containing(&["Desc", "Movimiento"]),
            debit: containing(&["Débito", "Debito"]),
            credit: containing(&["Crédito", "Credito"]),
            movement_code: containing(&["Cód", "Cod", "Código"]),
        })
    }
}

/// Keyword-based inference over arbitrary column names
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericLayout;

impl GenericLayout {
    /// Best-effort mapping, possibly incomplete
    ///
    /// For each field the first column (in source order) whose lowercased,
    /// trimmed name contains any of the field's keywords is selected.
    pub fn infer(&self, columns: &[String]) -> ColumnMapping {
        ColumnMapping {
            date: first_matching(columns, DATE_PATTERNS),
            reference: first_matching(columns, REFERENCE_PATTERNS),
            description: first_matching(columns, DESCRIPTION_PATTERNS),
            debit: first_matching(columns, DEBIT_PATTERNS),
            credit: first_matching(columns, CREDIT_PATTERNS),
            movement_code: None,
        }
    }
}

impl SchemaStrategy for GenericLayout {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn detect(&self, columns: &[String]) -> Option<ColumnMapping> {
        Some(self.infer(columns)).filter(ColumnMapping::is_complete)
    }
}

/// Ordered list of layout strategies
///
/// The generic strategy is always consulted last, after every named layout.
pub struct SchemaDetector {
    named: Vec<Box<dyn SchemaStrategy>>,
    generic: GenericLayout,
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaDetector {
    /// Detector with the built-in named layouts
    pub fn new() -> Self {
        SchemaDetector {
            named: vec![Box::new(NavisionLayout), Box::new(BhdLayout)],
            generic: GenericLayout,
        }
    }

    /// Detector with no named layouts, generic inference only
    pub fn generic_only() -> Self {
        SchemaDetector {
            named: Vec::new(),
            generic: GenericLayout,
        }
    }

    /// Append a named layout; it is tried after the ones already registered
    pub fn with_layout(mut self, strategy: Box<dyn SchemaStrategy>) -> Self {
        self.named.push(strategy);
        self
    }

    /// Classify a set of column names
    pub fn detect(&self, columns: &[String]) -> Validation {
        for strategy in &self.named {
            if let Some(mapping) = strategy.detect(columns) {
                return Validation::Valid(DetectedSchema {
                    layout: Layout::Named(strategy.name()),
                    mapping,
                });
            }
        }

        let mapping = self.generic.infer(columns);
        if mapping.is_complete() {
            return Validation::Valid(DetectedSchema {
                layout: Layout::Generic,
                mapping,
            });
        }

        Validation::Invalid {
            reason: missing_columns_reason(&mapping),
        }
    }

    /// Classify a dataset using the column names of its first row
    pub fn detect_rows(&self, rows: &[RawRow]) -> Validation {
        match rows.first() {
            Some(first) => self.detect(&first.column_names()),
            None => Validation::Invalid {
                reason: "the file contains no data rows".to_string(),
            },
        }
    }
}

fn has_column(columns: &[String], name: &str) -> bool {
    columns.iter().any(|col| col == name)
}

fn first_matching(columns: &[String], patterns: &[&str]) -> Option<String> {
    columns
        .iter()
        .find(|col| {
            let normalized = col.trim().to_lowercase();
            patterns.iter().any(|pattern| normalized.contains(pattern))
        })
        .cloned()
}

fn missing_columns_reason(mapping: &ColumnMapping) -> String {
    let mut missing = Vec::new();
    if mapping.date.is_none() {
        missing.push("a date column");
    }
    if mapping.debit.is_none() && mapping.credit.is_none() {
        missing.push("a debit or credit column");
    }
    format!(
        "could not identify the columns required for reconciliation (missing {})",
        missing.join(" and ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_navision_layout_is_recognized() {
        let cols = columns(&[
            "Posting Date",
            "Document Type",
            "Document No.",
            "Description",
            "Debit",
            "Credit",
        ]);

        let validation = SchemaDetector::new().detect(&cols);
        let schema = validation.schema().unwrap();

        assert_eq!(schema.layout, Layout::Named("navision"));
        assert_eq!(schema.mapping.date.as_deref(), Some("Posting Date"));
        assert_eq!(schema.mapping.reference.as_deref(), Some("Document No."));
        assert_eq!(schema.mapping.debit.as_deref(), Some("Debit"));
        assert_eq!(schema.mapping.credit.as_deref(), Some("Credit"));
    }

    #[test]
    fn test_named_layout_takes_priority_over_generic() {
        // Also a complete generic mapping, but the generic detector would pick
        // "Document Type" as the reference column
        let cols = columns(&["Posting Date", "Document Type", "Document No.", "Debit"]);

        let generic = SchemaDetector::generic_only().detect(&cols);
        assert_eq!(generic.schema().unwrap().layout, Layout::Generic);
        assert_eq!(
            generic.schema().unwrap().mapping.reference.as_deref(),
            Some("Document Type")
        );

        let named = SchemaDetector::new().detect(&cols);
        assert_eq!(named.schema().unwrap().layout, Layout::Named("navision"));
        assert_eq!(
            named.schema().unwrap().mapping.reference.as_deref(),
            Some("Document No.")
        );
    }

    #[rstest]
    #[case::plain_debit(&["Fecha", "Referencia", "Descripción", "Débito", "Crédito"])]
    #[case::padded_debit(&["Fecha", "NCF", "Descripción", " Débito ", " Crédito "])]
    fn test_bhd_layout_is_recognized(#[case] names: &[&str]) {
        let validation = SchemaDetector::new().detect(&columns(names));
        let schema = validation.schema().unwrap();

        assert_eq!(schema.layout, Layout::Named("bhd"));
        assert_eq!(schema.mapping.date.as_deref(), Some("Fecha"));
        assert_eq!(schema.mapping.reference.as_deref(), Some(names[1]));
        assert_eq!(schema.mapping.debit.as_deref(), Some(names[3]));
        assert_eq!(schema.mapping.credit.as_deref(), Some(names[4]));
    }

    #[test]
    fn test_bhd_layout_finds_movement_code() {
        let cols = columns(&[
            "Fecha",
            "Código",
            "Movimiento",
            "Débito",
            "Crédito",
        ]);

        let mapping = BhdLayout.detect(&cols).unwrap();
        assert_eq!(mapping.movement_code.as_deref(), Some("Código"));
        assert_eq!(mapping.description.as_deref(), Some("Movimiento"));
        assert_eq!(mapping.reference, None);
    }

    #[test]
    fn test_generic_layout_spanish_headers() {
        let cols = columns(&["FECHA ", "No. Documento", "Concepto", "Cargo", "Abono"]);

        let validation = SchemaDetector::new().detect(&cols);
        let schema = validation.schema().unwrap();

        assert_eq!(schema.layout, Layout::Generic);
        assert_eq!(
            schema.mapping,
            ColumnMapping {
                date: Some("FECHA ".to_string()),
                reference: Some("No. Documento".to_string()),
                description: Some("Concepto".to_string()),
                debit: Some("Cargo".to_string()),
                credit: Some("Abono".to_string()),
                movement_code: None,
            }
        );
    }

    #[test]
    fn test_generic_layout_first_column_wins() {
        let cols = columns(&["Fecha Valor", "Fecha Operacion", "Monto Debe", "Monto Haber"]);

        let mapping = GenericLayout.infer(&cols);
        assert_eq!(mapping.date.as_deref(), Some("Fecha Valor"));
        assert_eq!(mapping.debit.as_deref(), Some("Monto Debe"));
        assert_eq!(mapping.credit.as_deref(), Some("Monto Haber"));
    }

    #[test]
    fn test_generic_layout_credit_only_is_valid() {
        let cols = columns(&["Date", "Credit Amount"]);
        let validation = SchemaDetector::new().detect(&cols);

        assert!(validation.is_valid());
        let mapping = &validation.schema().unwrap().mapping;
        assert_eq!(mapping.debit, None);
        assert_eq!(mapping.credit.as_deref(), Some("Credit Amount"));
    }

    #[rstest]
    #[case::no_date(&["Debit", "Credit"], "missing a date column)")]
    #[case::no_amounts(&["Date", "Memo"], "missing a debit or credit column)")]
    #[case::nothing(&["Foo", "Bar"], "missing a date column and a debit or credit column)")]
    fn test_invalid_columns(#[case] names: &[&str], #[case] expected_suffix: &str) {
        let validation = SchemaDetector::new().detect(&columns(names));

        assert!(!validation.is_valid());
        let reason = validation.reason().unwrap();
        assert!(
            reason.ends_with(expected_suffix),
            "unexpected reason: {}",
            reason
        );
    }

    #[test]
    fn test_empty_dataset_is_invalid() {
        let validation = SchemaDetector::new().detect_rows(&[]);
        assert_eq!(validation.reason(), Some("the file contains no data rows"));
    }

    #[test]
    fn test_custom_layout_is_tried_after_builtins() {
        struct Acme;

        impl SchemaStrategy for Acme {
            fn name(&self) -> &'static str {
                "acme"
            }

            fn detect(&self, columns: &[String]) -> Option<ColumnMapping> {
                has_column(columns, "TxnDay").then(|| ColumnMapping {
                    date: Some("TxnDay".to_string()),
                    debit: Some("Out".to_string()),
                    credit: Some("In".to_string()),
                    ..ColumnMapping::default()
                })
            }
        }

        let detector = SchemaDetector::new().with_layout(Box::new(Acme));
        let validation = detector.detect(&columns(&["TxnDay", "Out", "In"]));

        assert_eq!(validation.schema().unwrap().layout, Layout::Named("acme"));
    }
}
