//! Error types for the Ledger Reconciler
//!
//! This module defines all error types that can occur while loading and
//! reconciling two ledgers. Errors are designed to be descriptive and
//! user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV structure
//! - **Schema Errors**: No date or debit/credit column could be identified
//! - **Configuration Errors**: Invalid tolerance margin
//!
//! Malformed numeric cells and empty ledgers are deliberately *not* errors:
//! the former parse as zero, the latter reconcile to "everything unmatched".

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the reconciler
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Row-level parse errors are recoverable: the row is skipped and
    /// reading continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// The columns of a ledger could not be mapped to the canonical record
    #[error("Invalid {source_name} ledger: {reason}")]
    SchemaValidation {
        /// Which ledger failed ("system" or "bank")
        source_name: String,
        /// Human-readable reason
        reason: String,
    },

    /// Tolerance margin is negative
    #[error("Invalid tolerance {value}: the margin must be zero or positive")]
    InvalidTolerance {
        /// The rejected value
        value: Decimal,
    },

    /// Async runtime could not be built or a blocking task failed
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the failure
        message: String,
    },
}

// Conversion from io::Error to ReconcileError
impl From<std::io::Error> for ReconcileError {
    fn from(error: std::io::Error) -> Self {
        ReconcileError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to ReconcileError
impl From<csv::Error> for ReconcileError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReconcileError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Conversion from csv_async::Error to ReconcileError
impl From<csv_async::Error> for ReconcileError {
    fn from(error: csv_async::Error) -> Self {
        ReconcileError::ParseError {
            line: None,
            message: error.to_string(),
        }
    }
}

impl ReconcileError {
    /// Create a SchemaValidation error
    pub fn schema_validation(source_name: &str, reason: &str) -> Self {
        ReconcileError::SchemaValidation {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an InvalidTolerance error
    pub fn invalid_tolerance(value: Decimal) -> Self {
        ReconcileError::InvalidTolerance { value }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl std::fmt::Display) -> Self {
        ReconcileError::Runtime {
            message: message.to_string(),
        }
    }
}
