//! Match outcome types
//!
//! Outcomes are built fresh for every reconciliation run and handed to the
//! caller inside a [`ReconciliationResult`]. Indices always refer to the
//! position of the record in the sequence given to the engine.

use super::record::CanonicalRecord;
use rust_decimal::Decimal;

/// A system record paired with a bank record of the same magnitude
#[derive(Debug, Clone, PartialEq)]
pub struct ExactMatch {
    pub system_index: usize,
    pub bank_index: usize,
    pub system: CanonicalRecord,
    pub bank: CanonicalRecord,
}

/// A system record paired with a bank record within the tolerance margin
#[derive(Debug, Clone, PartialEq)]
pub struct ApproximateMatch {
    pub system_index: usize,
    pub bank_index: usize,
    pub system: CanonicalRecord,
    pub bank: CanonicalRecord,

    /// Absolute difference between the two matched amounts
    pub difference: Decimal,
}

/// A system record with no eligible bank counterpart
#[derive(Debug, Clone, PartialEq)]
pub struct UnmatchedRecord {
    pub index: usize,
    pub record: CanonicalRecord,
}

/// A bank record never consumed by any match
#[derive(Debug, Clone, PartialEq)]
pub struct UnusedBankRecord {
    pub index: usize,
    pub record: CanonicalRecord,
}

/// Final result of one reconciliation run
///
/// This is the only structure downstream presentation and export code reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationResult {
    pub exact_matches: Vec<ExactMatch>,
    pub approximate_matches: Vec<ApproximateMatch>,
    pub unmatched: Vec<UnmatchedRecord>,
    pub unused_bank_records: Vec<UnusedBankRecord>,

    /// Tolerance margin actually applied during the run
    pub tolerance: Decimal,
}

/// Presentation counts derived from a [`ReconciliationResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub exact: usize,
    pub approximate: usize,
    pub unmatched: usize,
    pub unused_bank: usize,
    pub total_system: usize,
    pub total_bank: usize,
    pub total_matches: usize,

    /// Percentage of system records matched, rounded to a whole number
    pub match_rate: Decimal,

    pub tolerance: Decimal,
}
