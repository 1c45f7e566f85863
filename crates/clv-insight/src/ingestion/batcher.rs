//! Splits a CSV document into self-contained row batches
//!
//! The header is not interpreted; every batch simply repeats it so the model
//! can map columns on its own.

use std::ops::Range;

use crate::error::{Error, Result};

/// Rows per batch when nothing else is configured
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Header line plus a contiguous slice of data rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Dispatch position, 0-based
    pub index: usize,
    /// Data rows covered, 0-based and header excluded
    pub rows: Range<usize>,
    /// Header followed by the rows, newline-joined
    pub csv: String,
}

impl Batch {
    /// Number of data rows in this batch
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Data rows without the header
    pub fn data_lines(&self) -> impl Iterator<Item = &str> {
        self.csv.lines().skip(1)
    }
}

/// Split `content` into batches of at most `batch_size` data rows
///
/// A document with only a header (or nothing at all) yields no batches.
pub fn split_batches(content: &str, batch_size: usize) -> Result<Vec<Batch>> {
    if batch_size == 0 {
        return Err(Error::Config("batch size must be at least 1".to_string()));
    }

    let mut lines = content.trim().lines();
    let header = match lines.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };
    let rows: Vec<&str> = lines.collect();

    let batches = rows
        .chunks(batch_size)
        .enumerate()
        .map(|(index, chunk)| {
            let start = index * batch_size;
            let mut csv = String::with_capacity(
                header.len() + chunk.iter().map(|row| row.len() + 1).sum::<usize>(),
            );
            csv.push_str(header);
            for row in chunk {
                csv.push('\n');
                csv.push_str(row);
            }

            Batch {
                index,
                rows: start..start + chunk.len(),
                csv,
            }
        })
        .collect();

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(rows: usize) -> String {
        let mut doc = String::from("Customer,State,Income");
        for i in 1..=rows {
            doc.push_str(&format!("\nC{:04},Oregon,{}", i, i * 1000));
        }
        doc
    }

    #[test]
    fn test_header_only_and_empty() {
        assert!(split_batches("", 100).unwrap().is_empty());
        assert!(split_batches("   \n\n", 100).unwrap().is_empty());
        assert!(split_batches("Customer,State\n", 100).unwrap().is_empty());
    }

    #[test]
    fn test_250_rows_make_three_batches() {
        let batches = split_batches(&document(250), 100).unwrap();

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].rows, 0..100);
        assert_eq!(batches[1].rows, 100..200);
        assert_eq!(batches[2].rows, 200..250);
        assert_eq!(batches[2].row_count(), 50);

        for batch in &batches {
            assert!(batch.csv.starts_with("Customer,State,Income\n"));
        }
        assert_eq!(batches[1].data_lines().next(), Some("C0101,Oregon,101000"));
    }

    #[test]
    fn test_rows_partitioned_without_loss_or_duplication() {
        for (rows, size) in [(1, 1), (7, 3), (99, 100), (100, 100), (101, 100), (10, 1)] {
            let doc = document(rows);
            let batches = split_batches(&doc, size).unwrap();

            assert_eq!(batches.len(), rows.div_ceil(size));
            assert!(batches.iter().all(|b| b.row_count() <= size));

            let rejoined: Vec<&str> = batches.iter().flat_map(|b| b.data_lines()).collect();
            let input_rows: Vec<&str> = doc.lines().skip(1).collect();
            assert_eq!(rejoined, input_rows);
        }
    }

    #[test]
    fn test_crlf_and_surrounding_whitespace() {
        let batches = split_batches("\n\nCustomer,State\r\nA1,Ohio\r\nA2,Iowa\r\n\n", 1).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].csv, "Customer,State\nA1,Ohio");
        assert_eq!(batches[1].csv, "Customer,State\nA2,Iowa");
    }

    #[test]
    fn test_zero_batch_size() {
        assert!(matches!(split_batches("a\nb", 0), Err(Error::Config(_))));
    }
}
