//! Matching engine
//!
//! Pairs system records with bank records in two greedy passes:
//!
//! 1. **Exact pass**: for each system record, in order, the *first* unused
//!    bank record whose opposite-side amount is within [`EXACT_EPSILON`] is
//!    consumed. The closest candidate is not searched for.
//! 2. **Approximate pass**: for each system record left over, in order, the
//!    unused bank record with the smallest difference not above the tolerance
//!    is consumed. On equal differences the earliest bank record wins.
//!
//! Bank records never consumed are reported as unused. The algorithm is
//! order-dependent and not a globally optimal assignment; both tie-breaks
//! are part of its observable behaviour.
//!
//! The engine holds no state between runs. Consumption is tracked in a
//! vector local to each call, so identical inputs always give identical
//! results.

use crate::core::aggregator;
use crate::core::traits::{MatchObserver, NoopObserver};
use crate::types::{
    ApproximateMatch, CanonicalRecord, ExactMatch, ReconcileError, ReconciliationResult, Side,
    UnmatchedRecord, UnusedBankRecord,
};
use rust_decimal::Decimal;

/// Largest difference still treated as an exact match (exclusive)
pub const EXACT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Tolerance margin used when none is configured (0.01)
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Amounts derived once per record for the duration of a run
struct Prepared {
    debit: Decimal,
    credit: Decimal,
    side: Side,
    target: Decimal,
}

impl Prepared {
    fn from_record(record: &CanonicalRecord) -> Self {
        let (side, target) = record.matching_side();
        Prepared {
            debit: record.debit_amount(),
            credit: record.credit_amount(),
            side,
            target,
        }
    }

    fn amount_on(&self, side: Side) -> Decimal {
        match side {
            Side::Debit => self.debit,
            Side::Credit => self.credit,
        }
    }
}

/// Two-phase exact/approximate matching engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingEngine {
    tolerance: Decimal,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        MatchingEngine {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl MatchingEngine {
    /// Create an engine with the given tolerance margin
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidTolerance`] if `tolerance` is negative.
    pub fn new(tolerance: Decimal) -> Result<Self, ReconcileError> {
        if tolerance < Decimal::ZERO {
            return Err(ReconcileError::invalid_tolerance(tolerance));
        }
        Ok(MatchingEngine { tolerance })
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Reconcile two ledgers
    pub fn reconcile(
        &self,
        system: Vec<CanonicalRecord>,
        bank: Vec<CanonicalRecord>,
    ) -> ReconciliationResult {
        self.reconcile_with(system, bank, &mut NoopObserver)
    }

    /// Reconcile two ledgers, reporting each decision to `observer`
    pub fn reconcile_with(
        &self,
        system: Vec<CanonicalRecord>,
        bank: Vec<CanonicalRecord>,
        observer: &mut dyn MatchObserver,
    ) -> ReconciliationResult {
        if system.is_empty() || bank.is_empty() {
            let unmatched: Vec<UnmatchedRecord> = system
                .into_iter()
                .enumerate()
                .map(|(index, record)| UnmatchedRecord { index, record })
                .collect();
            for entry in &unmatched {
                observer.on_unmatched(entry.index);
            }
            let unused = bank
                .into_iter()
                .enumerate()
                .map(|(index, record)| UnusedBankRecord { index, record })
                .collect();
            return finish(
                Vec::new(),
                Vec::new(),
                unmatched,
                unused,
                self.tolerance,
                observer,
            );
        }

        let system_amounts: Vec<Prepared> = system.iter().map(Prepared::from_record).collect();
        let bank_amounts: Vec<Prepared> = bank.iter().map(Prepared::from_record).collect();
        let mut consumed = vec![false; bank.len()];

        // Phase 1: first exact candidate wins
        let mut exact = Vec::new();
        let mut pending = Vec::new();
        for (system_index, prepared) in system_amounts.iter().enumerate() {
            let found = if prepared.target.is_zero() {
                None
            } else {
                find_exact(
                    &bank_amounts,
                    &consumed,
                    prepared.side.opposite(),
                    prepared.target,
                )
            };

            match found {
                Some(bank_index) => {
                    consumed[bank_index] = true;
                    observer.on_exact_match(system_index, bank_index);
                    exact.push(ExactMatch {
                        system_index,
                        bank_index,
                        system: system[system_index].clone(),
                        bank: bank[bank_index].clone(),
                    });
                }
                None => pending.push(system_index),
            }
        }

        // Phase 2: closest candidate within tolerance wins
        let mut approximate = Vec::new();
        let mut unmatched = Vec::new();
        for system_index in pending {
            let prepared = &system_amounts[system_index];
            let best = if prepared.target.is_zero() {
                None
            } else {
                find_closest(
                    &bank_amounts,
                    &consumed,
                    prepared.side.opposite(),
                    prepared.target,
                    self.tolerance,
                )
            };

            match best {
                Some((bank_index, difference)) => {
                    consumed[bank_index] = true;
                    observer.on_approximate_match(system_index, bank_index, difference);
                    approximate.push(ApproximateMatch {
                        system_index,
                        bank_index,
                        system: system[system_index].clone(),
                        bank: bank[bank_index].clone(),
                        difference,
                    });
                }
                None => {
                    observer.on_unmatched(system_index);
                    unmatched.push(UnmatchedRecord {
                        index: system_index,
                        record: system[system_index].clone(),
                    });
                }
            }
        }

        // Phase 3: whatever is left on the bank side
        let unused = bank
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !consumed[*index])
            .map(|(index, record)| UnusedBankRecord { index, record })
            .collect();

        finish(
            exact,
            approximate,
            unmatched,
            unused,
            self.tolerance,
            observer,
        )
    }
}

/// Reconcile with a one-off engine
///
/// # Errors
///
/// Returns [`ReconcileError::InvalidTolerance`] if `tolerance` is negative.
pub fn reconcile(
    system: Vec<CanonicalRecord>,
    bank: Vec<CanonicalRecord>,
    tolerance: Decimal,
) -> Result<ReconciliationResult, ReconcileError> {
    Ok(MatchingEngine::new(tolerance)?.reconcile(system, bank))
}

fn find_exact(
    bank: &[Prepared],
    consumed: &[bool],
    side: Side,
    target: Decimal,
) -> Option<usize> {
    bank.iter()
        .enumerate()
        .filter(|(index, _)| !consumed[*index])
        .find(|(_, candidate)| {
            abs_difference(candidate.amount_on(side), target).is_some_and(|d| d < EXACT_EPSILON)
        })
        .map(|(index, _)| index)
}

fn find_closest(
    bank: &[Prepared],
    consumed: &[bool],
    side: Side,
    target: Decimal,
    tolerance: Decimal,
) -> Option<(usize, Decimal)> {
    let mut best: Option<(usize, Decimal)> = None;
    for (index, candidate) in bank.iter().enumerate() {
        if consumed[index] {
            continue;
        }
        let Some(difference) = abs_difference(candidate.amount_on(side), target) else {
            continue;
        };
        if difference > tolerance {
            continue;
        }
        // Strictly smaller only: the earliest candidate keeps a tie
        if best.map_or(true, |(_, current)| difference < current) {
            best = Some((index, difference));
        }
    }
    best
}

/// Absolute difference, or `None` when the subtraction overflows
///
/// An overflowing pair is never a candidate.
fn abs_difference(amount: Decimal, target: Decimal) -> Option<Decimal> {
    amount.checked_sub(target).map(|d| d.abs())
}

fn finish(
    exact: Vec<ExactMatch>,
    approximate: Vec<ApproximateMatch>,
    unmatched: Vec<UnmatchedRecord>,
    unused: Vec<UnusedBankRecord>,
    tolerance: Decimal,
    observer: &mut dyn MatchObserver,
) -> ReconciliationResult {
    let result = aggregator::assemble(exact, approximate, unmatched, unused, tolerance);
    observer.on_complete(&result.summary());
    result
}
