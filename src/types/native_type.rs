//! Native (server catalog) type identifiers.
//!
//! The catalog names types by integer OID. Only the OIDs listed here get
//! dedicated treatment; every other OID is carried in `NativeType::Other`
//! and handled as opaque character data by the mapper.

use std::fmt;

/// Raw catalog type identifier.
pub type Oid = i32;

pub const OID_BOOL: Oid = 16;
pub const OID_BYTEA: Oid = 17;
pub const OID_CHAR: Oid = 18;
pub const OID_NAME: Oid = 19;
pub const OID_INT8: Oid = 20;
pub const OID_INT2: Oid = 21;
pub const OID_INT4: Oid = 23;
pub const OID_TEXT: Oid = 25;
pub const OID_OID: Oid = 26;
pub const OID_XID: Oid = 28;
pub const OID_CHAR2: Oid = 409;
pub const OID_CHAR4: Oid = 410;
pub const OID_CHAR8: Oid = 411;
pub const OID_FLOAT4: Oid = 700;
pub const OID_FLOAT8: Oid = 701;
pub const OID_MONEY: Oid = 790;
pub const OID_BPCHAR: Oid = 1042;
pub const OID_VARCHAR: Oid = 1043;
pub const OID_DATE: Oid = 1082;
pub const OID_TIME: Oid = 1083;
pub const OID_DATETIME: Oid = 1114;
pub const OID_NUMERIC: Oid = 1700;
pub const OID_LO_UNDEFINED: Oid = -999;

/// Sentinel returned when a SQL type has no native counterpart.
pub const OID_NO_MAPPING: Oid = 0;

/// Name reported for large-object columns.
pub const LO_TYPE_NAME: &str = "lo";

/// Native database type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Bool,
    Bytea,
    /// Single character.
    Char,
    /// Catalog identifier type; its column size is undefined.
    Name,
    Int8,
    Int2,
    Int4,
    Text,
    Oid,
    Xid,
    Char2,
    Char4,
    Char8,
    Float4,
    Float8,
    Money,
    /// Blank-padded CHAR(n).
    Bpchar,
    Varchar,
    Date,
    Time,
    /// Timestamp carried on the wire as (seconds, microseconds).
    DateTime,
    Numeric,
    /// Large object without a registered type.
    LargeObject,
    /// Any OID without dedicated handling.
    Other(Oid),
}

impl NativeType {
    /// Every type with dedicated handling.
    pub const KNOWN: [NativeType; 23] = [
        NativeType::Bool,
        NativeType::Bytea,
        NativeType::Char,
        NativeType::Name,
        NativeType::Int8,
        NativeType::Int2,
        NativeType::Int4,
        NativeType::Text,
        NativeType::Oid,
        NativeType::Xid,
        NativeType::Char2,
        NativeType::Char4,
        NativeType::Char8,
        NativeType::Float4,
        NativeType::Float8,
        NativeType::Money,
        NativeType::Bpchar,
        NativeType::Varchar,
        NativeType::Date,
        NativeType::Time,
        NativeType::DateTime,
        NativeType::Numeric,
        NativeType::LargeObject,
    ];

    /// Classify a raw OID. Never fails.
    pub fn from_oid(oid: Oid) -> Self {
        match oid {
            OID_BOOL => NativeType::Bool,
            OID_BYTEA => NativeType::Bytea,
            OID_CHAR => NativeType::Char,
            OID_NAME => NativeType::Name,
            OID_INT8 => NativeType::Int8,
            OID_INT2 => NativeType::Int2,
            OID_INT4 => NativeType::Int4,
            OID_TEXT => NativeType::Text,
            OID_OID => NativeType::Oid,
            OID_XID => NativeType::Xid,
            OID_CHAR2 => NativeType::Char2,
            OID_CHAR4 => NativeType::Char4,
            OID_CHAR8 => NativeType::Char8,
            OID_FLOAT4 => NativeType::Float4,
            OID_FLOAT8 => NativeType::Float8,
            OID_MONEY => NativeType::Money,
            OID_BPCHAR => NativeType::Bpchar,
            OID_VARCHAR => NativeType::Varchar,
            OID_DATE => NativeType::Date,
            OID_TIME => NativeType::Time,
            OID_DATETIME => NativeType::DateTime,
            OID_NUMERIC => NativeType::Numeric,
            OID_LO_UNDEFINED => NativeType::LargeObject,
            other => NativeType::Other(other),
        }
    }

    /// Get the catalog OID.
    pub fn oid(&self) -> Oid {
        match self {
            NativeType::Bool => OID_BOOL,
            NativeType::Bytea => OID_BYTEA,
            NativeType::Char => OID_CHAR,
            NativeType::Name => OID_NAME,
            NativeType::Int8 => OID_INT8,
            NativeType::Int2 => OID_INT2,
            NativeType::Int4 => OID_INT4,
            NativeType::Text => OID_TEXT,
            NativeType::Oid => OID_OID,
            NativeType::Xid => OID_XID,
            NativeType::Char2 => OID_CHAR2,
            NativeType::Char4 => OID_CHAR4,
            NativeType::Char8 => OID_CHAR8,
            NativeType::Float4 => OID_FLOAT4,
            NativeType::Float8 => OID_FLOAT8,
            NativeType::Money => OID_MONEY,
            NativeType::Bpchar => OID_BPCHAR,
            NativeType::Varchar => OID_VARCHAR,
            NativeType::Date => OID_DATE,
            NativeType::Time => OID_TIME,
            NativeType::DateTime => OID_DATETIME,
            NativeType::Numeric => OID_NUMERIC,
            NativeType::LargeObject => OID_LO_UNDEFINED,
            NativeType::Other(oid) => *oid,
        }
    }

    /// Whether this is the "no mapping" sentinel.
    pub fn is_unmapped(&self) -> bool {
        self.oid() == OID_NO_MAPPING
    }

    /// Whether this is one of the character-family types.
    pub fn is_character(&self) -> bool {
        matches!(
            self,
            NativeType::Char
                | NativeType::Char2
                | NativeType::Char4
                | NativeType::Char8
                | NativeType::Varchar
                | NativeType::Bpchar
                | NativeType::Text
                | NativeType::Name
        )
    }

    /// Whether literals of this type are written without quotes.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            NativeType::Int2
                | NativeType::Oid
                | NativeType::Xid
                | NativeType::Int4
                | NativeType::Int8
                | NativeType::Numeric
                | NativeType::Float4
                | NativeType::Float8
                | NativeType::Money
        )
    }
}

impl From<Oid> for NativeType {
    fn from(oid: Oid) -> Self {
        NativeType::from_oid(oid)
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Other(oid) => write!(f, "OID({})", oid),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_oid_known() {
        for t in NativeType::KNOWN {
            assert_eq!(NativeType::from_oid(t.oid()), t);
        }
    }

    #[test]
    fn test_from_oid_unknown() {
        let t = NativeType::from_oid(600); // point
        assert_eq!(t, NativeType::Other(600));
        assert_eq!(t.oid(), 600);
        assert!(!t.is_character());
        assert!(!t.is_numeric());
        assert_eq!(format!("{}", t), "OID(600)");
    }

    #[test]
    fn test_sentinel() {
        assert!(NativeType::from_oid(OID_NO_MAPPING).is_unmapped());
        assert!(!NativeType::Int4.is_unmapped());
    }
}
