//! Result assembly
//!
//! Wraps the four outcome collections and the applied tolerance into a
//! [`ReconciliationResult`] and derives presentation counts from it. No
//! business logic lives here.

use crate::types::{
    ApproximateMatch, ExactMatch, ReconciliationResult, Summary, UnmatchedRecord,
    UnusedBankRecord,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// Build the final result of a run
pub fn assemble(
    exact_matches: Vec<ExactMatch>,
    approximate_matches: Vec<ApproximateMatch>,
    unmatched: Vec<UnmatchedRecord>,
    unused_bank_records: Vec<UnusedBankRecord>,
    tolerance: Decimal,
) -> ReconciliationResult {
    ReconciliationResult {
        exact_matches,
        approximate_matches,
        unmatched,
        unused_bank_records,
        tolerance,
    }
}

/// Percentage of `total` represented by `matched`, rounded half away from zero
///
/// Zero when `total` is zero.
pub fn match_rate(matched: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(matched) * Decimal::ONE_HUNDRED / Decimal::from(total))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

impl ReconciliationResult {
    /// Number of system records paired in either pass
    pub fn total_matches(&self) -> usize {
        self.exact_matches.len() + self.approximate_matches.len()
    }

    /// Derive presentation counts
    ///
    /// Every system record lands in exactly one of exact, approximate or
    /// unmatched, and every bank record in exactly one of exact, approximate
    /// or unused, so the totals are recovered from the partitions.
    pub fn summary(&self) -> Summary {
        let total_matches = self.total_matches();
        let total_system = total_matches + self.unmatched.len();
        let total_bank = total_matches + self.unused_bank_records.len();

        Summary {
            exact: self.exact_matches.len(),
            approximate: self.approximate_matches.len(),
            unmatched: self.unmatched.len(),
            unused_bank: self.unused_bank_records.len(),
            total_system,
            total_bank,
            total_matches,
            match_rate: match_rate(total_matches, total_system),
            tolerance: self.tolerance,
        }
    }
}
