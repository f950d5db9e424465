//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `record`: raw rows, cells and the canonical record
//! - `outcome`: match outcomes and the reconciliation result
//! - `error`: Error types for the reconciler

pub mod error;
pub mod outcome;
pub mod record;

pub use error::ReconcileError;
pub use outcome::{
    ApproximateMatch, ExactMatch, ReconciliationResult, Summary, UnmatchedRecord,
    UnusedBankRecord,
};
pub use record::{CanonicalRecord, CellValue, RawRow, Side, MISSING_AMOUNT, MISSING_TEXT};
