//! Type signatures of the self-describing wire format.
//!
//! A signature string is a sequence of type codes:
//!
//! | Code | Type | Alignment |
//! |------|------|-----------|
//! | `y` | byte | 1 |
//! | `b` | boolean (u32 0/1) | 4 |
//! | `n` / `q` | i16 / u16 | 2 |
//! | `i` / `u` | i32 / u32 | 4 |
//! | `x` / `t` | i64 / u64 | 8 |
//! | `d` | f64 | 8 |
//! | `s` | string | 4 |
//! | `g` | signature | 1 |
//! | `v` | variant | 1 |
//! | `a<T>` | array of T | 4 |
//! | `(...)` | struct | 8 |

use std::fmt;

use crate::error::{Error, Result};

/// Longest signature string accepted on the wire.
pub const MAX_SIGNATURE_LENGTH: usize = 255;

/// Deepest nesting of arrays and structs accepted.
pub const MAX_NESTING_DEPTH: usize = 32;

/// One complete type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Signature {
    Byte,
    Bool,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Double,
    String,
    Signature,
    Variant,
    Array(Box<Signature>),
    Struct(Vec<Signature>),
}

impl Signature {
    /// Parse a string holding exactly one complete type.
    pub fn parse(s: &str) -> Result<Self> {
        let mut sigs = parse_signatures(s)?;
        if sigs.len() != 1 {
            return Err(Error::invalid_signature(
                s,
                format!("expected one complete type, found {}", sigs.len()),
            ));
        }
        Ok(sigs.remove(0))
    }

    /// Array of the given element type.
    pub fn array_of(elem: Signature) -> Self {
        Signature::Array(Box::new(elem))
    }

    /// Alignment boundary of values of this type.
    pub fn alignment(&self) -> usize {
        match self {
            Signature::Byte | Signature::Signature | Signature::Variant => 1,
            Signature::Int16 | Signature::UInt16 => 2,
            Signature::Bool
            | Signature::Int32
            | Signature::UInt32
            | Signature::String
            | Signature::Array(_) => 4,
            Signature::Int64 | Signature::UInt64 | Signature::Double | Signature::Struct(_) => 8,
        }
    }

    /// Number of fields for a struct, 1 for any other type.
    pub fn arity(&self) -> usize {
        match self {
            Signature::Struct(fields) => fields.len(),
            _ => 1,
        }
    }

    /// Whether this is a fixed-width numeric or boolean type.
    pub fn is_fixed(&self) -> bool {
        matches!(
            self,
            Signature::Byte
                | Signature::Bool
                | Signature::Int16
                | Signature::UInt16
                | Signature::Int32
                | Signature::UInt32
                | Signature::Int64
                | Signature::UInt64
                | Signature::Double
        )
    }

    fn write_code(&self, out: &mut String) {
        match self {
            Signature::Byte => out.push('y'),
            Signature::Bool => out.push('b'),
            Signature::Int16 => out.push('n'),
            Signature::UInt16 => out.push('q'),
            Signature::Int32 => out.push('i'),
            Signature::UInt32 => out.push('u'),
            Signature::Int64 => out.push('x'),
            Signature::UInt64 => out.push('t'),
            Signature::Double => out.push('d'),
            Signature::String => out.push('s'),
            Signature::Signature => out.push('g'),
            Signature::Variant => out.push('v'),
            Signature::Array(elem) => {
                out.push('a');
                elem.write_code(out);
            }
            Signature::Struct(fields) => {
                out.push('(');
                for f in fields {
                    f.write_code(out);
                }
                out.push(')');
            }
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        self.write_code(&mut s);
        f.write_str(&s)
    }
}

/// Concatenate the codes of several types.
pub fn signature_string(sigs: &[Signature]) -> String {
    let mut s = String::new();
    for sig in sigs {
        sig.write_code(&mut s);
    }
    s
}

/// Parse a signature string into its sequence of complete types.
pub fn parse_signatures(s: &str) -> Result<Vec<Signature>> {
    if s.len() > MAX_SIGNATURE_LENGTH {
        return Err(Error::invalid_signature(s, "signature too long"));
    }
    let mut parser = Parser {
        src: s,
        bytes: s.as_bytes(),
        pos: 0,
    };
    let mut out = Vec::new();
    while parser.pos < parser.bytes.len() {
        out.push(parser.complete_type(0)?);
    }
    Ok(out)
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn fail(&self, message: impl Into<String>) -> Error {
        Error::invalid_signature(self.src, message)
    }

    fn complete_type(&mut self, depth: usize) -> Result<Signature> {
        if depth > MAX_NESTING_DEPTH {
            return Err(self.fail("nesting too deep"));
        }
        let code = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| self.fail("unexpected end of signature"))?;
        self.pos += 1;

        let sig = match code {
            b'y' => Signature::Byte,
            b'b' => Signature::Bool,
            b'n' => Signature::Int16,
            b'q' => Signature::UInt16,
            b'i' => Signature::Int32,
            b'u' => Signature::UInt32,
            b'x' => Signature::Int64,
            b't' => Signature::UInt64,
            b'd' => Signature::Double,
            b's' => Signature::String,
            b'g' => Signature::Signature,
            b'v' => Signature::Variant,
            b'a' => Signature::array_of(self.complete_type(depth + 1)?),
            b'(' => {
                let mut fields = Vec::new();
                loop {
                    match self.bytes.get(self.pos) {
                        None => return Err(self.fail("unterminated struct")),
                        Some(b')') => {
                            self.pos += 1;
                            break;
                        }
                        Some(_) => fields.push(self.complete_type(depth + 1)?),
                    }
                }
                if fields.is_empty() {
                    return Err(self.fail("empty struct"));
                }
                Signature::Struct(fields)
            }
            b')' => return Err(self.fail(format!("unbalanced ')' at {}", self.pos - 1))),
            other => {
                return Err(self.fail(format!(
                    "unknown type code '{}' at {}",
                    other as char,
                    self.pos - 1
                )))
            }
        };
        Ok(sig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope_signature() {
        let sigs = parse_signatures("a(ssy)vaay").unwrap();
        assert_eq!(sigs.len(), 3);
        assert_eq!(
            sigs[0],
            Signature::array_of(Signature::Struct(vec![
                Signature::String,
                Signature::String,
                Signature::Byte
            ]))
        );
        assert_eq!(sigs[1], Signature::Variant);
        assert_eq!(sigs[2], Signature::array_of(Signature::array_of(Signature::Byte)));
        assert_eq!(signature_string(&sigs), "a(ssy)vaay");
    }

    #[test]
    fn test_parse_nested_struct() {
        let sig = Signature::parse("(sx(xi)ay)").unwrap();
        assert_eq!(sig.arity(), 4);
        assert_eq!(sig.alignment(), 8);
        assert_eq!(sig.to_string(), "(sx(xi)ay)");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Signature::parse("").is_err());
        assert!(Signature::parse("(si").is_err());
        assert!(Signature::parse("()").is_err());
        assert!(Signature::parse("a").is_err());
        assert!(Signature::parse("si").is_err());
        assert!(Signature::parse("z").is_err());
        assert!(Signature::parse("i)").is_err());

        let deep = format!("{}i", "a".repeat(MAX_NESTING_DEPTH + 2));
        assert!(Signature::parse(&deep).is_err());
    }

    #[test]
    fn test_alignment() {
        assert_eq!(Signature::Byte.alignment(), 1);
        assert_eq!(Signature::Int16.alignment(), 2);
        assert_eq!(Signature::Bool.alignment(), 4);
        assert_eq!(Signature::array_of(Signature::Int64).alignment(), 4);
        assert_eq!(Signature::Double.alignment(), 8);
    }
}
