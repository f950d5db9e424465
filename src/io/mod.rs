//! I/O module
//!
//! Handles CSV ledger ingestion and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, report serialization)
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{raw_row_from_fields, write_report_csv, write_summary_csv};
pub use sync_reader::SyncReader;
