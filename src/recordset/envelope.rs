//! The recordset message: `a(ssy)vaay`.
//!
//! ```text
//! a(ssy)   column headers: name, wire signature, nullable flag
//! v        body: a(<row signature>) holding one struct per row
//! aay      nullability bytes
//! ```

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::wire::{ReadBuffer, Signature, WireValue, WriteBuffer};

/// Signature of a whole recordset message.
pub const ENVELOPE_SIGNATURE: &str = "a(ssy)vaay";

/// How null cells are flagged in the nullability section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullityMode {
    /// One inner array holding each column's nullable flag; written only
    /// when there are columns and rows. Null cells travel as zero values
    /// and cannot be told apart from real zeros.
    #[default]
    ColumnLevel,
    /// One inner array per row with a byte per cell, 1 marking NULL.
    PerRow,
}

/// One column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireColumnHeader {
    pub name: String,
    /// Wire signature string of the column's values.
    pub signature: String,
    pub nullable: bool,
}

impl WireColumnHeader {
    pub fn new(name: impl Into<String>, signature: &Signature, nullable: bool) -> Self {
        Self {
            name: name.into(),
            signature: signature.to_string(),
            nullable,
        }
    }

    fn header_signature() -> Signature {
        Signature::Struct(vec![Signature::String, Signature::String, Signature::Byte])
    }

    fn to_wire(&self) -> WireValue {
        WireValue::Struct(vec![
            WireValue::String(self.name.clone()),
            WireValue::String(self.signature.clone()),
            WireValue::Byte(u8::from(self.nullable)),
        ])
    }

    fn from_wire(value: &WireValue) -> Result<Self> {
        match value.as_struct() {
            Some([WireValue::String(name), WireValue::String(signature), WireValue::Byte(n)]) => {
                Ok(Self {
                    name: name.clone(),
                    signature: signature.clone(),
                    nullable: *n != 0,
                })
            }
            _ => Err(Error::framing("malformed column header")),
        }
    }
}

/// A recordset message in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct WireEnvelope {
    pub headers: Vec<WireColumnHeader>,
    /// Struct signature of a body row.
    pub row_signature: Signature,
    /// Row-major body cells.
    pub rows: Vec<Vec<WireValue>>,
    pub nullity: Vec<Vec<u8>>,
}

impl WireEnvelope {
    /// Serialize in one pass.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = WriteBuffer::new();

        WireValue::Array {
            elem: WireColumnHeader::header_signature(),
            items: self.headers.iter().map(WireColumnHeader::to_wire).collect(),
        }
        .marshal(&mut buf)?;

        let body = WireValue::Array {
            elem: self.row_signature.clone(),
            items: self
                .rows
                .iter()
                .map(|row| WireValue::Struct(row.clone()))
                .collect(),
        };
        WireValue::Variant(Box::new(body)).marshal(&mut buf)?;

        WireValue::Array {
            elem: Signature::array_of(Signature::Byte),
            items: self.nullity.iter().map(|n| WireValue::bytes(n)).collect(),
        }
        .marshal(&mut buf)?;

        Ok(buf.freeze())
    }

    /// Parse the message structure.
    ///
    /// Only the layout is checked here; whether the body agrees with the
    /// headers is up to the codec.
    pub fn from_bytes(data: Bytes) -> Result<Self> {
        let mut buf = ReadBuffer::new(data);

        let header_sig = Signature::array_of(WireColumnHeader::header_signature());
        let headers = WireValue::unmarshal(&header_sig, &mut buf)?;
        let headers = headers
            .as_array()
            .unwrap_or_default()
            .iter()
            .map(WireColumnHeader::from_wire)
            .collect::<Result<Vec<_>>>()?;

        let body = match WireValue::unmarshal(&Signature::Variant, &mut buf)? {
            WireValue::Variant(inner) => *inner,
            _ => return Err(Error::framing("body is not a variant")),
        };
        let (row_signature, rows) = match body {
            WireValue::Array { elem, items } => {
                let rows = items
                    .into_iter()
                    .map(|item| match item {
                        WireValue::Struct(fields) => Ok(fields),
                        other => Err(Error::framing(format!(
                            "body row is {}, not a struct",
                            other.signature()
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                (elem, rows)
            }
            other => {
                return Err(Error::framing(format!(
                    "body is {}, not an array",
                    other.signature()
                )))
            }
        };

        let nullity_sig = Signature::array_of(Signature::array_of(Signature::Byte));
        let nullity = WireValue::unmarshal(&nullity_sig, &mut buf)?;
        let nullity = nullity
            .as_array()
            .unwrap_or_default()
            .iter()
            .map(|v| {
                v.as_byte_vec()
                    .ok_or_else(|| Error::framing("malformed nullability entry"))
            })
            .collect::<Result<Vec<_>>>()?;

        if buf.remaining() > 0 {
            return Err(Error::framing(format!(
                "{} trailing bytes after recordset",
                buf.remaining()
            )));
        }

        Ok(Self {
            headers,
            row_signature,
            rows,
            nullity,
        })
    }
}
