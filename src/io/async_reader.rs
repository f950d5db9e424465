//! Asynchronous CSV reader with batch interface
//!
//! Reads the raw rows of a ledger CSV file in batches, so both ledgers can be
//! loaded concurrently by the async strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of RawRows
//!                  ↓
//!           csv_format module
//!           (raw_row_from_fields)
//! ```

use crate::io::csv_format::raw_row_from_fields;
use crate::types::{RawRow, ReconcileError};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// The header is read lazily on the first batch.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
    headers: Option<Vec<String>>,
    rows_read: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .create_reader(reader);

        Self {
            csv_reader,
            headers: None,
            rows_read: 0,
        }
    }

    /// Column names from the header record
    ///
    /// # Errors
    ///
    /// Returns a parse error if the header cannot be read.
    pub async fn headers(&mut self) -> Result<&[String], ReconcileError> {
        if self.headers.is_none() {
            let headers = self
                .csv_reader
                .headers()
                .await?
                .iter()
                .map(|header| header.to_string())
                .collect();
            self.headers = Some(headers);
        }
        Ok(self.headers.as_deref().unwrap_or_default())
    }

    /// Read a batch of raw rows
    ///
    /// Reads up to `batch_size` records. Malformed records are logged and
    /// skipped. Returns an empty vector at end of file.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the header cannot be read.
    pub async fn read_batch(&mut self, batch_size: usize) -> Result<Vec<RawRow>, ReconcileError> {
        self.headers().await?;
        let headers = self.headers.as_deref().unwrap_or_default();

        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.records();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(record)) => {
                    self.rows_read += 1;
                    batch.push(raw_row_from_fields(headers, record.iter()));
                }
                Some(Err(e)) => {
                    self.rows_read += 1;
                    // +1 for the header line
                    warn!(line = self.rows_read + 1, "Skipping malformed record: {}", e);
                }
                None => break,
            }
        }

        Ok(batch)
    }

    /// Read every remaining row
    pub async fn read_all(&mut self, batch_size: usize) -> Result<Vec<RawRow>, ReconcileError> {
        let mut rows = Vec::new();
        loop {
            let batch = self.read_batch(batch_size.max(1)).await?;
            if batch.is_empty() {
                break;
            }
            rows.extend(batch);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use futures::io::Cursor;

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let csv_content = "Fecha,Debe,Haber\n01/01,10.00,\n02/01,,20.00\n03/01,30.00,\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch = async_reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].get("Fecha"), Some(&CellValue::Text("01/01".to_string())));
        assert_eq!(batch[1].get("Haber"), Some(&CellValue::Text("20.00".to_string())));

        let batch = async_reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].get("Debe"), Some(&CellValue::Text("30.00".to_string())));

        let batch = async_reader.read_batch(2).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_headers_untrimmed() {
        let csv_content = "Fecha, Débito \n01/01,5\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let headers = async_reader.headers().await.unwrap().to_vec();
        assert_eq!(headers, vec!["Fecha", " Débito "]);
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let csv_content = "Fecha,Debe,Haber\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let rows = async_reader.read_all(10).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_read_all_across_batches() {
        let csv_content = "Fecha,Debe\n\
            01/01,1\n\
            02/01,2\n\
            03/01,3\n\
            04/01,4\n\
            05/01,5\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let rows = async_reader.read_all(2).await.unwrap();
        let debits: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get("Debe").and_then(|cell| cell.display_text()))
            .collect();

        assert_eq!(debits, vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_async_reader_short_rows() {
        let csv_content = "Fecha,Debe,Haber\n01/01\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let rows = async_reader.read_all(10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Haber"), Some(&CellValue::Empty));
    }
}
