//! Tracing-backed match observer

use crate::core::traits::MatchObserver;
use crate::types::Summary;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Forwards matching events to `tracing`
///
/// Per-record events are emitted at `debug`, the final summary at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn on_exact_match(&mut self, system_index: usize, bank_index: usize) {
        debug!(system_index, bank_index, "exact match");
    }

    fn on_approximate_match(&mut self, system_index: usize, bank_index: usize, difference: Decimal) {
        debug!(system_index, bank_index, %difference, "approximate match");
    }

    fn on_unmatched(&mut self, system_index: usize) {
        debug!(system_index, "no counterpart found");
    }

    fn on_complete(&mut self, summary: &Summary) {
        info!(
            exact = summary.exact,
            approximate = summary.approximate,
            unmatched = summary.unmatched,
            unused_bank = summary.unused_bank,
            tolerance = %summary.tolerance,
            "Reconciliation finished: {}/{} system records matched ({}%)",
            summary.total_matches,
            summary.total_system,
            summary.match_rate
        );
    }
}
