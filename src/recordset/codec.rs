//! Table ↔ recordset message conversion.

use bytes::Bytes;
use tracing::{debug, trace};

use super::envelope::{NullityMode, WireColumnHeader, WireEnvelope};
use super::table::Table;
use crate::error::{Error, Result};
use crate::settings::ConnectionSettings;
use crate::typemap::{native_from_signature, TypeMapper};
use crate::types::{Cell, Column, WireDateTime};
use crate::wire::{Signature, WireValue};

/// Encodes tables into recordset messages and decodes them back.
#[derive(Debug, Clone)]
pub struct RecordsetCodec<'a> {
    mapper: TypeMapper<'a>,
    nullity: NullityMode,
}

impl<'a> RecordsetCodec<'a> {
    /// Create a codec using column-level nullity.
    pub fn new(settings: &'a ConnectionSettings) -> Self {
        Self {
            mapper: TypeMapper::new(settings),
            nullity: NullityMode::default(),
        }
    }

    /// Use the given nullability layout for both directions.
    pub fn with_nullity_mode(mut self, mode: NullityMode) -> Self {
        self.nullity = mode;
        self
    }

    pub fn nullity_mode(&self) -> NullityMode {
        self.nullity
    }

    /// Build the in-memory message for a table.
    pub fn encode_envelope(&self, table: &Table) -> Result<WireEnvelope> {
        let columns = table.columns();
        let signatures: Vec<Signature> = columns
            .iter()
            .map(|c| self.mapper.wire_signature(c.native_type))
            .collect();

        let headers: Vec<WireColumnHeader> = columns
            .iter()
            .zip(&signatures)
            .map(|(c, sig)| WireColumnHeader::new(c.name.clone(), sig, c.nullable))
            .collect();
        trace!("header: {} columns", headers.len());

        // Some peers choke on "a()", so an empty table still claims a(i)
        let row_signature = if signatures.is_empty() {
            Signature::Struct(vec![Signature::Int32])
        } else {
            Signature::Struct(signatures.clone())
        };

        let mut rows = Vec::with_capacity(table.row_count());
        for r in 0..table.row_count() {
            let mut fields = Vec::with_capacity(signatures.len());
            for (c, sig) in signatures.iter().enumerate() {
                let cell = table.cell(r, c).unwrap_or(&Cell::Null);
                fields.push(cell_to_wire(cell, sig).map_err(|e| {
                    Error::type_conversion(format!(
                        "row {} column '{}': {}",
                        r, columns[c].name, e
                    ))
                })?);
            }
            rows.push(fields);
        }
        trace!("body: {} rows of {}", rows.len(), row_signature);

        let nullity = match self.nullity {
            NullityMode::ColumnLevel => {
                if columns.is_empty() || table.row_count() == 0 {
                    Vec::new()
                } else {
                    vec![columns.iter().map(|c| u8::from(c.nullable)).collect()]
                }
            }
            NullityMode::PerRow => (0..table.row_count())
                .map(|r| {
                    (0..columns.len())
                        .map(|c| u8::from(table.cell(r, c).is_some_and(Cell::is_null)))
                        .collect()
                })
                .collect(),
        };

        Ok(WireEnvelope {
            headers,
            row_signature,
            rows,
            nullity,
        })
    }

    /// Encode a table into a recordset message.
    pub fn encode(&self, table: &Table) -> Result<Bytes> {
        let bytes = self.encode_envelope(table)?.to_bytes()?;
        debug!(
            "encoded {} columns x {} rows into {} bytes",
            table.column_count(),
            table.row_count(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Rebuild a table from an in-memory message.
    ///
    /// Any disagreement between headers, body and nullability is a framing
    /// error and no table is returned.
    pub fn decode_envelope(&self, envelope: WireEnvelope) -> Result<Table> {
        let WireEnvelope {
            headers,
            row_signature,
            rows,
            nullity,
        } = envelope;

        let mut signatures = Vec::with_capacity(headers.len());
        for h in &headers {
            let sig = Signature::parse(&h.signature).map_err(|e| {
                Error::framing(format!("column '{}' has a bad signature: {}", h.name, e))
            })?;
            signatures.push(sig);
        }

        let columns: Vec<Column> = headers
            .iter()
            .zip(&signatures)
            .map(|(h, sig)| Column::new(h.name.clone(), native_from_signature(sig), h.nullable))
            .collect();

        if columns.is_empty() {
            if !rows.is_empty() {
                return Err(Error::framing(format!(
                    "{} body rows but no columns",
                    rows.len()
                )));
            }
            if !nullity.is_empty() {
                return Err(Error::framing("nullability present without columns"));
            }
            return Ok(Table::empty(columns));
        }

        match &row_signature {
            Signature::Struct(fields) if fields.len() == columns.len() => {
                for (i, (field, expected)) in fields.iter().zip(&signatures).enumerate() {
                    if field != expected {
                        return Err(Error::framing(format!(
                            "column {} is '{}' in the body but '{}' in the header",
                            i, field, expected
                        )));
                    }
                }
            }
            Signature::Struct(fields) => {
                return Err(Error::framing(format!(
                    "body rows have {} fields, header has {} columns",
                    fields.len(),
                    columns.len()
                )))
            }
            other => {
                return Err(Error::framing(format!(
                    "body rows are '{}', not structs",
                    other
                )))
            }
        }

        let nullable: Vec<bool> = columns.iter().map(|c| c.nullable).collect();
        let null_flags = self.check_nullity(&nullity, rows.len(), &nullable)?;

        for (r, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::framing(format!(
                    "row {} has {} fields, header has {} columns",
                    r,
                    row.len(),
                    columns.len()
                )));
            }
            for (c, (value, expected)) in row.iter().zip(&signatures).enumerate() {
                let actual = value.signature();
                if actual != *expected {
                    return Err(Error::framing(format!(
                        "row {} column '{}' holds '{}', header says '{}'",
                        r, columns[c].name, actual, expected
                    )));
                }
            }
        }

        let mut data: Vec<Vec<Cell>> = vec![Vec::with_capacity(rows.len()); columns.len()];
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                let is_null = null_flags
                    .and_then(|flags| flags.get(r))
                    .is_some_and(|flags| flags[c] == 1);
                let cell = if is_null {
                    Cell::Null
                } else {
                    wire_to_cell(value)
                };
                data[c].push(cell);
            }
        }

        debug!(
            "decoded {} columns x {} rows",
            columns.len(),
            data.first().map(Vec::len).unwrap_or(0)
        );
        Table::new(columns.into_iter().zip(data).collect())
    }

    /// Validate the nullability section against the headers; returns
    /// per-row flags in `PerRow` mode.
    fn check_nullity<'n>(
        &self,
        nullity: &'n [Vec<u8>],
        rows: usize,
        nullable: &[bool],
    ) -> Result<Option<&'n [Vec<u8>]>> {
        let expected_arrays = match self.nullity {
            NullityMode::ColumnLevel => usize::from(rows > 0),
            NullityMode::PerRow => rows,
        };
        if nullity.len() != expected_arrays {
            return Err(Error::framing(format!(
                "expected {} nullability arrays, found {}",
                expected_arrays,
                nullity.len()
            )));
        }
        for (i, flags) in nullity.iter().enumerate() {
            if flags.len() != nullable.len() {
                return Err(Error::framing(format!(
                    "nullability array has {} entries for {} columns",
                    flags.len(),
                    nullable.len()
                )));
            }
            for (c, (&flag, &allowed)) in flags.iter().zip(nullable).enumerate() {
                let consistent = match self.nullity {
                    NullityMode::ColumnLevel => flag == u8::from(allowed),
                    NullityMode::PerRow => flag == 0 || (flag == 1 && allowed),
                };
                if !consistent {
                    return Err(Error::framing(format!(
                        "nullability flag {} for column {} in array {} contradicts the header",
                        flag, c, i
                    )));
                }
            }
        }
        Ok(match self.nullity {
            NullityMode::ColumnLevel => None,
            NullityMode::PerRow => Some(nullity),
        })
    }

    /// Decode a recordset message into a table.
    pub fn decode(&self, data: Bytes) -> Result<Table> {
        trace!("decoding {} bytes", data.len());
        self.decode_envelope(WireEnvelope::from_bytes(data)?)
    }
}

/// Convert a cell to the wire value of a column signature.
///
/// NULL becomes the zero value of the type.
pub fn cell_to_wire(cell: &Cell, sig: &Signature) -> Result<WireValue> {
    if cell.is_null() {
        return Ok(WireValue::zero(sig));
    }
    let mismatch = || Error::type_conversion(format!("cannot encode {:?} as '{}'", cell, sig));
    let int = |cell: &Cell| cell.to_i64().ok_or_else(mismatch);

    let value = match sig {
        Signature::Byte => WireValue::Byte(u8::try_from(int(cell)?).map_err(|_| mismatch())?),
        Signature::Bool => match cell {
            Cell::Bool(b) => WireValue::Bool(*b),
            other => WireValue::Bool(int(other)? != 0),
        },
        Signature::Int16 => WireValue::Int16(i16::try_from(int(cell)?).map_err(|_| mismatch())?),
        Signature::UInt16 => {
            WireValue::UInt16(u16::try_from(int(cell)?).map_err(|_| mismatch())?)
        }
        Signature::Int32 => WireValue::Int32(i32::try_from(int(cell)?).map_err(|_| mismatch())?),
        Signature::UInt32 => {
            WireValue::UInt32(u32::try_from(int(cell)?).map_err(|_| mismatch())?)
        }
        Signature::Int64 => WireValue::Int64(int(cell)?),
        Signature::UInt64 => match cell {
            Cell::UInt64(v) => WireValue::UInt64(*v),
            other => WireValue::UInt64(u64::try_from(int(other)?).map_err(|_| mismatch())?),
        },
        Signature::Double => WireValue::Double(cell.to_f64().ok_or_else(mismatch)?),
        Signature::String => match cell {
            Cell::Binary(_) => return Err(mismatch()),
            Cell::Text(s) => WireValue::String(s.clone()),
            other => WireValue::String(other.to_string()),
        },
        Signature::Array(elem) if **elem == Signature::Byte => {
            WireValue::bytes(cell.as_bytes().ok_or_else(mismatch)?)
        }
        Signature::Struct(fields) if *fields == [Signature::Int64, Signature::Int32] => {
            match cell {
                Cell::DateTime(dt) => {
                    WireValue::Struct(vec![WireValue::Int64(dt.seconds), WireValue::Int32(dt.micros)])
                }
                _ => return Err(mismatch()),
            }
        }
        _ => return Err(mismatch()),
    };
    Ok(value)
}

/// Convert a received wire value to a cell.
///
/// Values without a dedicated cell kind are rendered as text.
pub fn wire_to_cell(value: WireValue) -> Cell {
    match value {
        WireValue::Byte(v) => Cell::Byte(v),
        WireValue::Bool(v) => Cell::Bool(v),
        WireValue::Int16(v) => Cell::Int16(v),
        WireValue::UInt16(v) => Cell::UInt16(v),
        WireValue::Int32(v) => Cell::Int32(v),
        WireValue::UInt32(v) => Cell::UInt32(v),
        WireValue::Int64(v) => Cell::Int64(v),
        WireValue::UInt64(v) => Cell::UInt64(v),
        WireValue::Double(v) => Cell::Double(v),
        WireValue::String(s) => Cell::Text(s),
        ref array @ WireValue::Array { .. } => match array.as_byte_vec() {
            Some(bytes) if array.signature() == Signature::array_of(Signature::Byte) => {
                Cell::Binary(bytes)
            }
            _ => Cell::Text(array.to_string()),
        },
        WireValue::Struct(fields) => {
            if let [WireValue::Int64(seconds), WireValue::Int32(micros)] = fields[..] {
                return Cell::DateTime(WireDateTime::new(seconds, micros));
            }
            Cell::Text(WireValue::Struct(fields).to_string())
        }
        other => Cell::Text(other.to_string()),
    }
}
