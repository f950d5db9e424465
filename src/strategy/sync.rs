//! Synchronous processing strategy
//!
//! Loads both ledgers one after the other with [`SyncReader`], then
//! normalizes, matches and writes the report on the calling thread.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Normalization and matching to the `core` module
//! - CSV output to `csv_format` (format handling)

use crate::io::sync_reader::SyncReader;
use crate::strategy::{reconcile_rows, write_report, ProcessingStrategy, ReconcileConfig};
use crate::types::{RawRow, ReconcileError, Summary};
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use ledger_reconciler::strategy::{ProcessingStrategy, ReconcileConfig, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(ReconcileConfig::default());
/// let mut output = io::stdout();
///
/// strategy
///     .process(Path::new("sistema.csv"), Path::new("banco.csv"), &mut output)
///     .expect("Reconciliation failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy {
    config: ReconcileConfig,
}

impl SyncProcessingStrategy {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        system_path: &Path,
        bank_path: &Path,
        output: &mut dyn Write,
    ) -> Result<Summary, ReconcileError> {
        let system_rows = read_ledger(system_path)?;
        let bank_rows = read_ledger(bank_path)?;

        let result = reconcile_rows(system_rows, bank_rows, self.config.tolerance)?;

        write_report(&result, self.config.report, output)?;

        Ok(result.summary())
    }
}

/// Read every row of a ledger file, skipping malformed records
fn read_ledger(path: &Path) -> Result<Vec<RawRow>, ReconcileError> {
    let reader = SyncReader::new(path)?;

    let mut rows = Vec::new();
    for result in reader {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!(file = %path.display(), "Skipping malformed record: {}", e),
        }
    }
    Ok(rows)
}
