//! Ledger Reconciler CLI
//!
//! Command-line interface for reconciling a system ledger against a bank
//! statement, both given as CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- sistema.csv banco.csv > conciliacion.csv
//! cargo run -- --tolerance 0.05 sistema.csv banco.csv > conciliacion.csv
//! cargo run -- --report summary sistema.csv banco.csv
//! cargo run -- --strategy async --read-batch-size 2000 sistema.csv banco.csv
//! ```
//!
//! The report goes to stdout; logs go to stderr. `RUST_LOG` overrides the
//! level chosen by `--verbose`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, unrecognized layout, invalid tolerance, etc.)

use ledger_reconciler::cli;
use ledger_reconciler::strategy;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = cli::parse_args();
    init_tracing(args.verbose);

    let config = match args.to_reconcile_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let read_config = matches!(args.strategy, cli::StrategyType::Async).then(|| args.to_read_config());
    let strategy = strategy::create_strategy(args.strategy, config, read_config);

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.system_file, &args.bank_file, &mut output) {
        error!("{}", e);
        process::exit(1);
    }
}
