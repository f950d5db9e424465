//! Asynchronous processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. Both ledgers are read concurrently in batches on
//! a tokio runtime; matching then runs on a blocking worker because the
//! greedy passes are inherently sequential.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── ReadConfig (read_batch_size, worker_threads)
//!     ├── AsyncReader × 2 (system and bank, joined concurrently)
//!     └── spawn_blocking
//!         ├── Normalizer (schema detection + canonical records)
//!         └── MatchingEngine (exact pass, approximate pass, leftovers)
//! ```

use crate::io::async_reader::AsyncReader;
use crate::strategy::{reconcile_rows, write_report, ProcessingStrategy, ReconcileConfig};
use crate::types::{RawRow, ReconcileError, Summary};
use std::io::Write;
use std::path::Path;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, warn};

/// Configuration for ledger loading
///
/// Controls how many rows are read per batch and the size of the runtime's
/// worker pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadConfig {
    /// Number of rows per read batch
    pub read_batch_size: usize,
    /// Worker threads for the runtime; `None` uses tokio's default
    pub worker_threads: Option<usize>,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            read_batch_size: 1000,
            worker_threads: None,
        }
    }
}

impl ReadConfig {
    /// Create a new ReadConfig, replacing zero values with the defaults
    pub fn new(read_batch_size: usize, worker_threads: Option<usize>) -> Self {
        let default = Self::default();

        let read_batch_size = if read_batch_size == 0 {
            warn!(
                "Invalid read_batch_size ({}), using default ({})",
                read_batch_size, default.read_batch_size
            );
            default.read_batch_size
        } else {
            read_batch_size
        };

        let worker_threads = match worker_threads {
            Some(0) => {
                warn!("Invalid worker_threads (0), using the runtime default");
                None
            }
            other => other,
        };

        Self {
            read_batch_size,
            worker_threads,
        }
    }
}

/// Asynchronous processing strategy
///
/// Produces exactly the same result as the synchronous strategy for the same
/// inputs; only the loading differs.
#[derive(Debug, Clone, Copy)]
pub struct AsyncProcessingStrategy {
    config: ReconcileConfig,
    read_config: ReadConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: ReconcileConfig, read_config: ReadConfig) -> Self {
        Self {
            config,
            read_config,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Reconcile two ledger files on a tokio runtime
    ///
    /// 1. Builds a multi-threaded runtime
    /// 2. Reads both ledgers concurrently in batches
    /// 3. Normalizes and matches on a blocking worker
    /// 4. Writes the report on the calling thread
    fn process(
        &self,
        system_path: &Path,
        bank_path: &Path,
        output: &mut dyn Write,
    ) -> Result<Summary, ReconcileError> {
        let mut builder = tokio::runtime::Builder::new_multi_thread();
        if let Some(threads) = self.read_config.worker_threads {
            builder.worker_threads(threads);
        }
        let runtime = builder
            .build()
            .map_err(|e| ReconcileError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        let batch_size = self.read_config.read_batch_size;
        let tolerance = self.config.tolerance;

        let result = runtime.block_on(async {
            let (system_rows, bank_rows) = tokio::try_join!(
                load_ledger(system_path, batch_size),
                load_ledger(bank_path, batch_size),
            )?;

            tokio::task::spawn_blocking(move || reconcile_rows(system_rows, bank_rows, tolerance))
                .await
                .map_err(|e| ReconcileError::runtime(format!("Matching task failed: {}", e)))?
        })?;

        write_report(&result, self.config.report, output)?;

        Ok(result.summary())
    }
}

/// Open a ledger file and read all of its rows in batches
async fn load_ledger(path: &Path, batch_size: usize) -> Result<Vec<RawRow>, ReconcileError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReconcileError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ReconcileError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), e),
            },
        })?;

    let mut reader = AsyncReader::new(file.compat());
    let rows = reader.read_all(batch_size).await?;

    debug!(file = %path.display(), rows = rows.len(), "Ledger read");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ReportKind;
    use crate::strategy::SyncProcessingStrategy;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    const SYSTEM: &str = "Fecha,Referencia,Concepto,Debe,Haber\n\
        01/03,F-1,Cobro cliente,500.00,\n\
        02/03,F-2,Pago proveedor,,1200.00\n\
        03/03,F-3,Cobro parcial,99.99,\n\
        04/03,F-4,Cobro sin banco,42.00,\n";

    const BANK: &str = "Fecha,Referencia,Detalle,Debe,Haber\n\
        01/03,B-1,Deposito,,500.00\n\
        02/03,B-2,Cheque,1200.00,\n\
        03/03,B-3,Deposito,,100.00\n\
        05/03,B-4,Comision,3.50,\n";

    #[test]
    fn test_async_strategy_reconciles_ledgers() {
        let system = create_temp_csv(SYSTEM);
        let bank = create_temp_csv(BANK);

        let config = ReconcileConfig::new(Decimal::new(1, 2), ReportKind::Detail).unwrap();
        let strategy = AsyncProcessingStrategy::new(config, ReadConfig::new(2, Some(2)));
        let mut output = Vec::new();

        let summary = strategy
            .process(system.path(), bank.path(), &mut output)
            .unwrap();

        assert_eq!(summary.exact, 2);
        assert_eq!(summary.approximate, 1);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.unused_bank, 1);
        assert_eq!(summary.match_rate, Decimal::from(75));

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("aproximada,3,03/03,F-3,Cobro parcial,99.99,0,3,03/03,B-3,Deposito,0,100.00,0.01"));
    }

    #[rstest]
    #[case(ReportKind::Detail)]
    #[case(ReportKind::Summary)]
    fn test_async_strategy_matches_sync_output(#[case] report: ReportKind) {
        let system = create_temp_csv(SYSTEM);
        let bank = create_temp_csv(BANK);
        let config = ReconcileConfig::new(Decimal::new(5, 2), report).unwrap();

        let mut sync_output = Vec::new();
        let sync_summary = SyncProcessingStrategy::new(config)
            .process(system.path(), bank.path(), &mut sync_output)
            .unwrap();

        let mut async_output = Vec::new();
        let async_summary = AsyncProcessingStrategy::new(config, ReadConfig::new(1, None))
            .process(system.path(), bank.path(), &mut async_output)
            .unwrap();

        assert_eq!(sync_summary, async_summary);
        assert_eq!(sync_output, async_output);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let system = create_temp_csv(SYSTEM);
        let strategy = AsyncProcessingStrategy::new(ReconcileConfig::default(), ReadConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(system.path(), Path::new("nonexistent.csv"), &mut output);

        assert!(matches!(
            result,
            Err(ReconcileError::FileNotFound { ref path }) if path == "nonexistent.csv"
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn test_async_strategy_rejects_unrecognized_layout() {
        let system = create_temp_csv("Importe,Nota\n10,x\n");
        let bank = create_temp_csv(BANK);
        let strategy = AsyncProcessingStrategy::new(ReconcileConfig::default(), ReadConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(system.path(), bank.path(), &mut output);

        assert!(matches!(
            result,
            Err(ReconcileError::SchemaValidation { ref source_name, .. }) if source_name == "system"
        ));
    }

    #[rstest]
    #[case(0, None, 1000, None)]
    #[case(250, Some(0), 250, None)]
    #[case(10, Some(4), 10, Some(4))]
    fn test_read_config_new(
        #[case] batch_size: usize,
        #[case] threads: Option<usize>,
        #[case] expected_batch_size: usize,
        #[case] expected_threads: Option<usize>,
    ) {
        let config = ReadConfig::new(batch_size, threads);
        assert_eq!(config.read_batch_size, expected_batch_size);
        assert_eq!(config.worker_threads, expected_threads);
    }

    #[test]
    fn test_async_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AsyncProcessingStrategy>();
    }
}
