use crate::strategy::{ReadConfig, ReconcileConfig};
use crate::types::ReconcileError;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Reconcile an internal ledger against a bank statement
#[derive(Parser, Debug)]
#[command(name = "ledger-reconciler")]
#[command(about = "Reconcile an internal ledger against a bank statement", long_about = None)]
pub struct CliArgs {
    /// CSV export of the internal system ledger
    #[arg(value_name = "SYSTEM", help = "Path to the system ledger CSV file")]
    pub system_file: PathBuf,

    /// CSV export of the bank statement
    #[arg(value_name = "BANK", help = "Path to the bank statement CSV file")]
    pub bank_file: PathBuf,

    /// Largest absolute difference accepted for an approximate match
    #[arg(
        long = "tolerance",
        value_name = "MARGIN",
        default_value = "0.01",
        allow_negative_numbers = true,
        help = "Tolerance margin for approximate matches (must be zero or positive)"
    )]
    pub tolerance: Decimal,

    /// Loading strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Loading strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Report written to stdout
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "detail",
        help = "Report kind: 'detail' for one line per record or 'summary' for counts"
    )]
    pub report: ReportKind,

    /// Runtime worker threads (async mode only)
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: tokio's default)"
    )]
    pub worker_threads: Option<usize>,

    /// Rows per read batch (async mode only)
    #[arg(
        long = "read-batch-size",
        value_name = "SIZE",
        help = "Number of rows per read batch (default: 1000)"
    )]
    pub read_batch_size: Option<usize>,

    /// Log per-match debug events
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Available loading strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available report formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Detail,
    Summary,
}

impl CliArgs {
    /// Build the reconciliation settings from CLI arguments
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidTolerance`] for a negative tolerance.
    pub fn to_reconcile_config(&self) -> Result<ReconcileConfig, ReconcileError> {
        ReconcileConfig::new(self.tolerance, self.report)
    }

    /// Create a ReadConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced
    /// with a warning.
    pub fn to_read_config(&self) -> ReadConfig {
        if self.read_batch_size.is_none() && self.worker_threads.is_none() {
            return ReadConfig::default();
        }
        let default = ReadConfig::default();
        ReadConfig::new(
            self.read_batch_size.unwrap_or(default.read_batch_size),
            self.worker_threads,
        )
    }
}
