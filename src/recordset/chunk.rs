//! Splitting large recordsets into several messages.
//!
//! Every chunk is a complete recordset message carrying the same headers;
//! rows are never split across chunks.

use bytes::Bytes;
use tracing::debug;

use super::codec::RecordsetCodec;
use super::table::Table;
use crate::error::{Error, Result};

/// Approximate payload size at which a chunk is closed (1 MiB).
pub const DEFAULT_CHUNK_LIMIT: usize = 1024 * 1024;

impl RecordsetCodec<'_> {
    /// Encode a table as one or more messages, closing a chunk once its
    /// approximate payload reaches `limit` bytes.
    ///
    /// The estimate counts one null flag byte per cell plus the payload of
    /// each cell. At least one message is always produced.
    pub fn encode_chunks(&self, table: &Table, limit: usize) -> Result<Vec<Bytes>> {
        let mut chunks = Vec::new();
        let mut current = Table::empty(table.columns().to_vec());
        let mut size = 0usize;

        for row in table.rows() {
            size += row.len();
            size += row.iter().map(|cell| cell.approx_size()).sum::<usize>();
            current.push_row(row.to_vec())?;

            if size >= limit {
                debug!("chunk {} closed at {} rows", chunks.len(), current.row_count());
                chunks.push(self.encode(&current)?);
                current = Table::empty(table.columns().to_vec());
                size = 0;
            }
        }

        if !current.is_empty() || chunks.is_empty() {
            chunks.push(self.encode(&current)?);
        }
        debug!("{} rows split into {} chunks", table.row_count(), chunks.len());
        Ok(chunks)
    }

    /// Decode and concatenate chunked messages.
    ///
    /// All chunks must carry identical headers.
    pub fn decode_chunks(&self, chunks: &[Bytes]) -> Result<Table> {
        let (first, rest) = chunks
            .split_first()
            .ok_or_else(|| Error::framing("no recordset chunks"))?;
        let mut table = self.decode(first.clone())?;
        for (i, chunk) in rest.iter().enumerate() {
            let next = self.decode(chunk.clone())?;
            if next.columns() != table.columns() {
                return Err(Error::framing(format!(
                    "chunk {} headers differ from the first chunk",
                    i + 1
                )));
            }
            table.extend(next)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ConnectionSettings;
    use crate::types::{Cell, Column, NativeType};

    fn wide_table(rows: usize) -> Table {
        Table::from_rows(
            vec![
                Column::new("id", NativeType::Int4, false),
                Column::new("payload", NativeType::Varchar, true),
            ],
            (0..rows)
                .map(|i| vec![Cell::Int32(i as i32), Cell::Text("x".repeat(100))])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_small_table_is_one_chunk() {
        let settings = ConnectionSettings::new();
        let codec = RecordsetCodec::new(&settings);
        let chunks = codec.encode_chunks(&wide_table(3), DEFAULT_CHUNK_LIMIT).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_empty_table_still_produces_a_chunk() {
        let settings = ConnectionSettings::new();
        let codec = RecordsetCodec::new(&settings);
        let chunks = codec.encode_chunks(&wide_table(0), 10).unwrap();
        assert_eq!(chunks.len(), 1);
        let table = codec.decode_chunks(&chunks).unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_split_and_reassemble() {
        let settings = ConnectionSettings::new();
        let codec = RecordsetCodec::new(&settings);
        // each row: 2 flag bytes + 4 + 200 = 206; limit 500 closes every 3 rows
        let table = wide_table(10);
        let chunks = codec.encode_chunks(&table, 500).unwrap();
        assert_eq!(chunks.len(), 4);

        let first = codec.decode(chunks[0].clone()).unwrap();
        assert_eq!(first.row_count(), 3);

        let back = codec.decode_chunks(&chunks).unwrap();
        assert_eq!(back.row_count(), 10);
        let ids: Vec<i64> = back
            .column(0)
            .unwrap()
            .iter()
            .filter_map(Cell::to_i64)
            .collect();
        assert_eq!(ids, (0..10).collect::<Vec<i64>>());
    }

    #[test]
    fn test_mismatched_headers_rejected() {
        let settings = ConnectionSettings::new();
        let codec = RecordsetCodec::new(&settings);
        let a = codec.encode(&wide_table(1)).unwrap();
        let other = Table::empty(vec![Column::new("id", NativeType::Int8, false)]);
        let b = codec.encode(&other).unwrap();
        assert!(codec.decode_chunks(&[a, b]).unwrap_err().is_framing());
        assert!(codec.decode_chunks(&[]).unwrap_err().is_framing());
    }
}
