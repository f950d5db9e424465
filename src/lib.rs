//! Ledger Reconciler Library
//! # Overview
//!
//! This library reconciles an internal accounting ledger against a bank
//! statement, pairing entries whose amounts agree exactly or within a
//! tolerance margin. Loading is available as a sync and an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (RawRow, CanonicalRecord, outcomes, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::schema`] - Column layout detection (named vendor layouts, keyword inference)
//!   - [`core::normalizer`] - Raw rows to canonical records
//!   - [`core::amount`] - Lenient amount parsing
//!   - [`core::matcher`] - Two-pass greedy matching
//!   - [`core::aggregator`] - Result assembly and summary counts
//! - [`io`] - CSV ledger readers and report writers
//! - [`strategy`] - Complete pipelines selectable at runtime
//!
//! # Matching
//!
//! Each system record is matched on its debit when positive, otherwise on
//! its credit, against the opposite column of the bank records:
//!
//! - **Exact pass**: the first unused bank record whose amount differs by
//!   less than 0.001
//! - **Approximate pass**: the closest unused bank record whose amount
//!   differs by at most the tolerance
//!
//! A bank record is consumed by at most one match. Whatever is left becomes
//! unmatched system records and unused bank records.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{reconcile, MatchingEngine, Normalizer, SchemaDetector};
pub use io::{write_report_csv, write_summary_csv};
pub use types::{
    CanonicalRecord, CellValue, RawRow, ReconcileError, ReconciliationResult, Summary,
};
