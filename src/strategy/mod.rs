//! Processing strategy module
//!
//! This module defines the Strategy pattern for complete reconciliation
//! pipelines: loading both ledgers, normalizing, matching and writing the
//! report. Different loading implementations (synchronous, asynchronous) can
//! be selected at runtime; the matching itself is the same pure engine in
//! both.

use crate::cli::{ReportKind, StrategyType};
use crate::core::normalizer::normalize_with;
use crate::core::{MatchingEngine, Normalizer, TracingObserver, Validation};
use crate::io::{write_report_csv, write_summary_csv};
use crate::types::{CanonicalRecord, RawRow, ReconcileError, ReconciliationResult, Summary};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, ReadConfig};
pub use sync::SyncProcessingStrategy;

/// Settings shared by every strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileConfig {
    /// Tolerance margin for approximate matches
    pub tolerance: Decimal,

    /// Which report to write
    pub report: ReportKind,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            tolerance: crate::core::DEFAULT_TOLERANCE,
            report: ReportKind::Detail,
        }
    }
}

impl ReconcileConfig {
    /// Create a config, rejecting negative tolerances
    pub fn new(tolerance: Decimal, report: ReportKind) -> Result<Self, ReconcileError> {
        if tolerance < Decimal::ZERO {
            return Err(ReconcileError::invalid_tolerance(tolerance));
        }
        Ok(Self { tolerance, report })
    }
}

/// Processing strategy trait for complete reconciliation pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Reconcile two ledger files and write the report to `output`
    ///
    /// # Arguments
    ///
    /// * `system_path` - CSV export of the internal system ledger
    /// * `bank_path` - CSV export of the bank statement
    /// * `output` - Writer receiving the report
    ///
    /// # Returns
    ///
    /// The summary of the run.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either file cannot be opened or its header read
    /// - Either ledger's columns cannot be mapped
    /// - The report cannot be written
    ///
    /// Malformed individual rows are logged and skipped; they do not fail the run.
    fn process(
        &self,
        system_path: &Path,
        bank_path: &Path,
        output: &mut dyn Write,
    ) -> Result<Summary, ReconcileError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `read_config` is only used by the async strategy.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: ReconcileConfig,
    read_config: Option<ReadConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(config)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            config,
            read_config.unwrap_or_default(),
        )),
    }
}

/// Normalize both ledgers and run the matching engine
///
/// Shared by both strategies once the raw rows are loaded.
pub(crate) fn reconcile_rows(
    system_rows: Vec<RawRow>,
    bank_rows: Vec<RawRow>,
    tolerance: Decimal,
) -> Result<ReconciliationResult, ReconcileError> {
    let normalizer = Normalizer::new();
    let system = normalize_ledger(&normalizer, "system", &system_rows)?;
    let bank = normalize_ledger(&normalizer, "bank", &bank_rows)?;

    info!(%tolerance, "Reconciling {} system records against {} bank records", system.len(), bank.len());

    let engine = MatchingEngine::new(tolerance)?;
    Ok(engine.reconcile_with(system, bank, &mut TracingObserver))
}

/// Detect a ledger's layout once, log it and normalize the rows with it
fn normalize_ledger(
    normalizer: &Normalizer,
    name: &str,
    rows: &[RawRow],
) -> Result<Vec<CanonicalRecord>, ReconcileError> {
    if rows.is_empty() {
        warn!("The {} ledger has no data rows", name);
        return Ok(Vec::new());
    }

    match normalizer.validate(rows) {
        Validation::Valid(schema) => {
            info!(ledger = name, rows = rows.len(), layout = ?schema.layout, "Ledger loaded");
            Ok(normalize_with(&schema, rows))
        }
        Validation::Invalid { reason } => Err(ReconcileError::schema_validation(name, &reason)),
    }
}

/// Write the configured report for a finished run
pub(crate) fn write_report(
    result: &ReconciliationResult,
    report: ReportKind,
    output: &mut dyn Write,
) -> Result<(), ReconcileError> {
    let written = match report {
        ReportKind::Detail => write_report_csv(result, output),
        ReportKind::Summary => write_summary_csv(result, output),
    };
    written.map_err(|message| ReconcileError::IoError { message })
}
