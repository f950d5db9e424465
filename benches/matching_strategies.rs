//! Benchmark suite for the matching engine and the processing strategies
//!
//! Uses the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```
//!
//! # Generated Ledgers
//!
//! Ledgers are generated rather than read from fixtures. Every system record
//! has a bank counterpart; one in three differs by a cent so the approximate
//! pass does real work, and a tenth of the bank records are never used.

use divan::Bencher;
use ledger_reconciler::cli::{ReportKind, StrategyType};
use ledger_reconciler::strategy::{create_strategy, ReadConfig, ReconcileConfig};
use ledger_reconciler::{CanonicalRecord, MatchingEngine};
use std::io::Write;
use tempfile::NamedTempFile;

fn main() {
    divan::main();
}

const SIZES: &[usize] = &[100, 1_000, 5_000];

fn amount(i: usize) -> String {
    format!("{}.{:02}", 10 + i % 997, i % 100)
}

fn bank_amount(i: usize) -> String {
    let cents = (10 + i % 997) * 100 + i % 100 + usize::from(i % 3 == 0);
    format!("{}.{:02}", cents / 100, cents % 100)
}

fn generate_records(size: usize) -> (Vec<CanonicalRecord>, Vec<CanonicalRecord>) {
    let system = (0..size)
        .map(|i| CanonicalRecord::with_amounts(amount(i), "0"))
        .collect();
    let bank = (0..size + size / 10)
        .rev()
        .map(|i| CanonicalRecord::with_amounts("0", bank_amount(i)))
        .collect();
    (system, bank)
}

fn generate_files(size: usize) -> (NamedTempFile, NamedTempFile) {
    let mut system = NamedTempFile::new().expect("Failed to create temp file");
    let mut bank = NamedTempFile::new().expect("Failed to create temp file");

    writeln!(system, "Fecha,Referencia,Concepto,Debe,Haber").expect("write failed");
    writeln!(bank, "Fecha,Referencia,Detalle,Debe,Haber").expect("write failed");
    for i in 0..size {
        writeln!(system, "01/01/2024,S-{},Cobro,{},", i, amount(i)).expect("write failed");
    }
    for i in (0..size + size / 10).rev() {
        writeln!(bank, "01/01/2024,B-{},Deposito,,{}", i, bank_amount(i)).expect("write failed");
    }
    system.flush().expect("flush failed");
    bank.flush().expect("flush failed");

    (system, bank)
}

/// Matching engine alone, on canonical records
#[divan::bench(args = SIZES)]
fn matching_engine(bencher: Bencher, size: usize) {
    let engine = MatchingEngine::default();
    bencher
        .with_inputs(|| generate_records(size))
        .bench_values(|(system, bank)| engine.reconcile(system, bank));
}

fn run_pipeline(bencher: Bencher, size: usize, strategy_type: StrategyType) {
    let (system, bank) = generate_files(size);
    let config = ReconcileConfig {
        report: ReportKind::Summary,
        ..ReconcileConfig::default()
    };
    let strategy = create_strategy(strategy_type, config, Some(ReadConfig::default()));

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(system.path(), bank.path(), &mut output)
            .expect("Processing failed")
    });
}

/// Complete synchronous pipeline on generated CSV files
#[divan::bench(args = SIZES)]
fn sync_strategy(bencher: Bencher, size: usize) {
    run_pipeline(bencher, size, StrategyType::Sync);
}

/// Complete asynchronous pipeline on generated CSV files
#[divan::bench(args = SIZES)]
fn async_strategy(bencher: Bencher, size: usize) {
    run_pipeline(bencher, size, StrategyType::Async);
}
