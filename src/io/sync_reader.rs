//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over the raw rows of a ledger CSV file.
//! Delegates row construction to the csv_format module.
//!
//! # Design
//!
//! The first record of the file is read as the header and becomes the column
//! names of every row. Headers and fields are never trimmed: the cell text is
//! handed to the normalizer exactly as it appears in the file.
//!
//! ```no_run
//! use ledger_reconciler::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("banco.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(row) => println!("Row with {} columns", row.len()),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, unreadable header) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the iterator

use crate::io::csv_format::raw_row_from_fields;
use crate::types::{RawRow, ReconcileError};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Yields one [`RawRow`] per data record, in file order.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: Vec<String>,
    record: StringRecord,
}

impl SyncReader {
    /// Open a ledger CSV file and read its header
    ///
    /// The reader is flexible about field counts so short rows still load.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::FileNotFound`] if the path does not exist, or
    /// an I/O or parse error if the file cannot be opened or its header read.
    pub fn new(path: &Path) -> Result<Self, ReconcileError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReconcileError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ReconcileError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), e),
            },
        })?;

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        let headers = reader
            .headers()?
            .iter()
            .map(|header| header.to_string())
            .collect();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
        })
    }

    /// Column names from the header record
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for SyncReader {
    type Item = Result<RawRow, ReconcileError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Some(Ok(raw_row_from_fields(&self.headers, self.record.iter()))),
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}
