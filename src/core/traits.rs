//! Core traits for schema detection and match diagnostics
//!
//! These are the two seams where behaviour is pluggable: new vendor layouts
//! are added as [`SchemaStrategy`] implementations, and callers observe a run
//! through a [`MatchObserver`] instead of side-channel logging.

use crate::core::schema::ColumnMapping;
use crate::types::Summary;
use rust_decimal::Decimal;

/// A way of recognizing a ledger layout from its column names
///
/// Strategies are tried in priority order; the first one that returns a
/// mapping wins.
pub trait SchemaStrategy: Send + Sync {
    /// Short name used in logs and in [`crate::core::schema::Layout::Named`]
    fn name(&self) -> &'static str;

    /// Return a column mapping if these columns belong to this layout
    fn detect(&self, columns: &[String]) -> Option<ColumnMapping>;
}

/// Receives per-record events from the matching engine
///
/// Every method has an empty default so observers only implement what they
/// care about.
pub trait MatchObserver {
    /// A system record was paired in the exact pass
    fn on_exact_match(&mut self, _system_index: usize, _bank_index: usize) {}

    /// A system record was paired in the approximate pass
    fn on_approximate_match(
        &mut self,
        _system_index: usize,
        _bank_index: usize,
        _difference: Decimal,
    ) {
    }

    /// A system record found no counterpart in either pass
    fn on_unmatched(&mut self, _system_index: usize) {}

    /// The run finished
    fn on_complete(&mut self, _summary: &Summary) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}
