//! Dynamically typed wire values and their marshalling.

use std::fmt;

use super::buffer::{wire_length, ReadBuffer, WriteBuffer};
use super::signature::{Signature, MAX_NESTING_DEPTH};
use crate::error::{Error, Result};

/// A value of any wire type.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Byte(u8),
    Bool(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    String(String),
    Signature(Signature),
    /// A value tagged with its own signature.
    Variant(Box<WireValue>),
    /// Homogeneous array; the element type is kept so empty arrays stay typed.
    Array {
        elem: Signature,
        items: Vec<WireValue>,
    },
    Struct(Vec<WireValue>),
}

impl WireValue {
    /// Byte array value.
    pub fn bytes(data: &[u8]) -> Self {
        WireValue::Array {
            elem: Signature::Byte,
            items: data.iter().copied().map(WireValue::Byte).collect(),
        }
    }

    /// Signature describing this value.
    pub fn signature(&self) -> Signature {
        match self {
            WireValue::Byte(_) => Signature::Byte,
            WireValue::Bool(_) => Signature::Bool,
            WireValue::Int16(_) => Signature::Int16,
            WireValue::UInt16(_) => Signature::UInt16,
            WireValue::Int32(_) => Signature::Int32,
            WireValue::UInt32(_) => Signature::UInt32,
            WireValue::Int64(_) => Signature::Int64,
            WireValue::UInt64(_) => Signature::UInt64,
            WireValue::Double(_) => Signature::Double,
            WireValue::String(_) => Signature::String,
            WireValue::Signature(_) => Signature::Signature,
            WireValue::Variant(_) => Signature::Variant,
            WireValue::Array { elem, .. } => Signature::array_of(elem.clone()),
            WireValue::Struct(fields) => {
                Signature::Struct(fields.iter().map(WireValue::signature).collect())
            }
        }
    }

    /// Zero value of a type, written in place of NULL cells.
    pub fn zero(sig: &Signature) -> Self {
        match sig {
            Signature::Byte => WireValue::Byte(0),
            Signature::Bool => WireValue::Bool(false),
            Signature::Int16 => WireValue::Int16(0),
            Signature::UInt16 => WireValue::UInt16(0),
            Signature::Int32 => WireValue::Int32(0),
            Signature::UInt32 => WireValue::UInt32(0),
            Signature::Int64 => WireValue::Int64(0),
            Signature::UInt64 => WireValue::UInt64(0),
            Signature::Double => WireValue::Double(0.0),
            Signature::String => WireValue::String(String::new()),
            Signature::Signature => WireValue::Signature(Signature::Byte),
            Signature::Variant => WireValue::Variant(Box::new(WireValue::Byte(0))),
            Signature::Array(elem) => WireValue::Array {
                elem: (**elem).clone(),
                items: Vec::new(),
            },
            Signature::Struct(fields) => {
                WireValue::Struct(fields.iter().map(WireValue::zero).collect())
            }
        }
    }

    /// Append this value to the buffer.
    pub fn marshal(&self, buf: &mut WriteBuffer) -> Result<()> {
        match self {
            WireValue::Byte(v) => buf.write_u8(*v),
            WireValue::Bool(v) => buf.write_bool(*v),
            WireValue::Int16(v) => buf.write_i16(*v),
            WireValue::UInt16(v) => buf.write_u16(*v),
            WireValue::Int32(v) => buf.write_i32(*v),
            WireValue::UInt32(v) => buf.write_u32(*v),
            WireValue::Int64(v) => buf.write_i64(*v),
            WireValue::UInt64(v) => buf.write_u64(*v),
            WireValue::Double(v) => buf.write_f64(*v),
            WireValue::String(s) => buf.write_str(s)?,
            WireValue::Signature(sig) => buf.write_signature_str(&sig.to_string())?,
            WireValue::Variant(inner) => {
                buf.write_signature_str(&inner.signature().to_string())?;
                inner.marshal(buf)?;
            }
            WireValue::Array { elem, items } => {
                let len_pos = buf.reserve_u32();
                // Padding before the first element is not part of the length
                buf.align(elem.alignment());
                let start = buf.len();
                for item in items {
                    if item.signature() != *elem {
                        return Err(Error::type_conversion(format!(
                            "array of {} holds a {} element",
                            elem,
                            item.signature()
                        )));
                    }
                    item.marshal(buf)?;
                }
                let len = wire_length(buf.len() - start, "array")?;
                buf.set_u32(len_pos, len);
            }
            WireValue::Struct(fields) => {
                buf.align(8);
                for field in fields {
                    field.marshal(buf)?;
                }
            }
        }
        Ok(())
    }

    /// Read one value of type `sig` from the buffer.
    pub fn unmarshal(sig: &Signature, buf: &mut ReadBuffer) -> Result<Self> {
        Self::unmarshal_at(sig, buf, 0)
    }

    fn unmarshal_at(sig: &Signature, buf: &mut ReadBuffer, depth: usize) -> Result<Self> {
        if depth > MAX_NESTING_DEPTH {
            return Err(Error::framing("value nesting too deep"));
        }
        let value = match sig {
            Signature::Byte => WireValue::Byte(buf.read_u8()?),
            Signature::Bool => WireValue::Bool(buf.read_bool()?),
            Signature::Int16 => WireValue::Int16(buf.read_i16()?),
            Signature::UInt16 => WireValue::UInt16(buf.read_u16()?),
            Signature::Int32 => WireValue::Int32(buf.read_i32()?),
            Signature::UInt32 => WireValue::UInt32(buf.read_u32()?),
            Signature::Int64 => WireValue::Int64(buf.read_i64()?),
            Signature::UInt64 => WireValue::UInt64(buf.read_u64()?),
            Signature::Double => WireValue::Double(buf.read_f64()?),
            Signature::String => WireValue::String(buf.read_str()?),
            Signature::Signature => {
                WireValue::Signature(Signature::parse(&buf.read_signature_str()?)?)
            }
            Signature::Variant => {
                let inner_sig = Signature::parse(&buf.read_signature_str()?)?;
                let inner = Self::unmarshal_at(&inner_sig, buf, depth + 1)?;
                WireValue::Variant(Box::new(inner))
            }
            Signature::Array(elem) => {
                let len = buf.read_u32()? as usize;
                buf.align(elem.alignment())?;
                if !buf.has_remaining(len) {
                    return Err(Error::framing(format!(
                        "array length {} exceeds remaining {} bytes",
                        len,
                        buf.remaining()
                    )));
                }
                let end = buf.position() + len;
                let mut items = Vec::new();
                while buf.position() < end {
                    items.push(Self::unmarshal_at(elem, buf, depth + 1)?);
                }
                if buf.position() != end {
                    return Err(Error::framing("array elements overrun declared length"));
                }
                WireValue::Array {
                    elem: (**elem).clone(),
                    items,
                }
            }
            Signature::Struct(fields) => {
                buf.align(8)?;
                let mut values = Vec::with_capacity(fields.len());
                for field in fields {
                    values.push(Self::unmarshal_at(field, buf, depth + 1)?);
                }
                WireValue::Struct(values)
            }
        };
        Ok(value)
    }

    /// Items of an array value.
    pub fn as_array(&self) -> Option<&[WireValue]> {
        match self {
            WireValue::Array { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Fields of a struct value.
    pub fn as_struct(&self) -> Option<&[WireValue]> {
        match self {
            WireValue::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Contents of a byte array value.
    pub fn as_byte_vec(&self) -> Option<Vec<u8>> {
        let items = self.as_array()?;
        items
            .iter()
            .map(|v| match v {
                WireValue::Byte(b) => Some(*b),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Byte(v) => write!(f, "{}", v),
            WireValue::Bool(v) => write!(f, "{}", if *v { 1 } else { 0 }),
            WireValue::Int16(v) => write!(f, "{}", v),
            WireValue::UInt16(v) => write!(f, "{}", v),
            WireValue::Int32(v) => write!(f, "{}", v),
            WireValue::UInt32(v) => write!(f, "{}", v),
            WireValue::Int64(v) => write!(f, "{}", v),
            WireValue::UInt64(v) => write!(f, "{}", v),
            WireValue::Double(v) => write!(f, "{}", v),
            WireValue::String(s) => write!(f, "{}", s),
            WireValue::Signature(sig) => write!(f, "{}", sig),
            WireValue::Variant(inner) => write!(f, "{}", inner),
            WireValue::Array { items, .. } => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            WireValue::Struct(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn marshal(value: &WireValue) -> Vec<u8> {
        let mut buf = WriteBuffer::new();
        value.marshal(&mut buf).unwrap();
        buf.as_bytes().to_vec()
    }

    #[test]
    fn test_array_length_excludes_leading_padding() {
        let value = WireValue::Array {
            elem: Signature::Int64,
            items: vec![WireValue::Int64(5)],
        };
        let bytes = marshal(&value);
        // length (8), 4 bytes of padding to reach 8, then the element
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &[8, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
        assert_eq!(bytes[8], 5);
    }

    #[test]
    fn test_empty_struct_array_still_aligns() {
        let value = WireValue::Array {
            elem: Signature::Struct(vec![Signature::Int32]),
            items: vec![],
        };
        assert_eq!(marshal(&value), vec![0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_variant_carries_signature() {
        let value = WireValue::Variant(Box::new(WireValue::Int32(7)));
        let bytes = marshal(&value);
        assert_eq!(bytes, vec![1, b'i', 0, 0, 7, 0, 0, 0]);

        let mut rd = ReadBuffer::new(Bytes::from(bytes));
        let back = WireValue::unmarshal(&Signature::Variant, &mut rd).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_nested_round_trip() {
        let value = WireValue::Struct(vec![
            WireValue::String("name".into()),
            WireValue::Struct(vec![WireValue::Int64(-1), WireValue::Int32(250)]),
            WireValue::bytes(b"\x00\x01"),
            WireValue::Double(1.5),
        ]);
        let sig = value.signature();
        assert_eq!(sig.to_string(), "(s(xi)ayd)");

        let mut rd = ReadBuffer::new(Bytes::from(marshal(&value)));
        let back = WireValue::unmarshal(&sig, &mut rd).unwrap();
        assert_eq!(rd.remaining(), 0);
        assert_eq!(back, value);
        assert_eq!(back.as_struct().unwrap()[2].as_byte_vec(), Some(vec![0, 1]));
    }

    #[test]
    fn test_mixed_array_rejected() {
        let value = WireValue::Array {
            elem: Signature::Int32,
            items: vec![WireValue::Int16(1)],
        };
        let mut buf = WriteBuffer::new();
        assert!(value.marshal(&mut buf).is_err());
    }

    #[test]
    fn test_array_length_past_end() {
        let mut rd = ReadBuffer::new(Bytes::from_static(&[16, 0, 0, 0, 1, 2]));
        let sig = Signature::array_of(Signature::Byte);
        assert!(WireValue::unmarshal(&sig, &mut rd).unwrap_err().is_framing());
    }

    #[test]
    fn test_display() {
        let value = WireValue::Struct(vec![
            WireValue::Int32(1),
            WireValue::Array {
                elem: Signature::String,
                items: vec![WireValue::String("a".into()), WireValue::String("b".into())],
            },
            WireValue::Bool(true),
        ]);
        assert_eq!(value.to_string(), "(1,[a,b],1)");
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(WireValue::zero(&Signature::String), WireValue::String(String::new()));
        let sig = Signature::parse("(xi)").unwrap();
        assert_eq!(
            WireValue::zero(&sig),
            WireValue::Struct(vec![WireValue::Int64(0), WireValue::Int32(0)])
        );
    }
}
