//! Native type → SQL type / host type / column facet mapping.
//!
//! A [`TypeMapper`] borrows the connection settings, optionally the metadata
//! of the active result set, and optionally an error sink. Every mapping is
//! total over [`NativeType`]: unknown types degrade to opaque character
//! data. The single undefined query (column size of `name`) is an error.

mod attributes;
mod size;

use crate::error::ErrorSink;
use crate::settings::ConnectionSettings;
use crate::types::{
    CType, DatetimeSubcode, DescriptorType, NativeType, ResultMetadata, SqlType, OID_NO_MAPPING,
};
use crate::wire::Signature;

pub use attributes::type_name;
pub use size::{NUMERIC_DEFAULT_SCALE, NUMERIC_DEFAULT_SIZE};

/// Maps native types to client-facing type information.
#[derive(Clone, Copy)]
pub struct TypeMapper<'a> {
    settings: &'a ConnectionSettings,
    result: Option<&'a ResultMetadata>,
    sink: Option<&'a dyn ErrorSink>,
}

impl std::fmt::Debug for TypeMapper<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeMapper")
            .field("settings", self.settings)
            .field("result", &self.result)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl<'a> TypeMapper<'a> {
    /// Create a mapper with no result metadata and no error sink.
    pub fn new(settings: &'a ConnectionSettings) -> Self {
        Self {
            settings,
            result: None,
            sink: None,
        }
    }

    /// Consult the given result set when sizing columns.
    pub fn with_result(mut self, result: &'a ResultMetadata) -> Self {
        self.result = Some(result);
        self
    }

    /// Report hard failures to the given sink as well as returning them.
    pub fn with_error_sink(mut self, sink: &'a dyn ErrorSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Connection settings in effect.
    pub fn settings(&self) -> &ConnectionSettings {
        self.settings
    }

    /// Result metadata in effect, if any.
    pub fn result(&self) -> Option<&ResultMetadata> {
        self.result
    }

    fn wide(&self, narrow: SqlType) -> SqlType {
        if !self.settings.wide_chars {
            return narrow;
        }
        match narrow {
            SqlType::Char => SqlType::WChar,
            SqlType::VarChar => SqlType::WVarChar,
            SqlType::LongVarChar => SqlType::WLongVarChar,
            other => other,
        }
    }

    fn odbc3_or(&self, typed: SqlType, old: SqlType) -> SqlType {
        if self.settings.is_odbc3() {
            typed
        } else {
            old
        }
    }

    /// Concise SQL type of a column.
    ///
    /// With a column index, (bp)char and varchar columns wider than
    /// `MAX_VARCHAR_SIZE` are reported as long varchar.
    pub fn concise_type(&self, native: NativeType, col: Option<usize>) -> SqlType {
        match native {
            NativeType::Char | NativeType::Char2 | NativeType::Char4 | NativeType::Char8 => {
                self.wide(SqlType::Char)
            }
            NativeType::Name => self.wide(SqlType::VarChar),
            NativeType::Bpchar | NativeType::Varchar => {
                if col.is_some() && self.exceeds_varchar(native, col) {
                    return self.wide(SqlType::LongVarChar);
                }
                if native == NativeType::Bpchar {
                    self.wide(SqlType::Char)
                } else {
                    self.wide(SqlType::VarChar)
                }
            }
            NativeType::Text => self.wide(SqlType::LongVarChar),
            NativeType::Bytea => {
                if self.settings.bytea_as_longvarbinary {
                    SqlType::LongVarBinary
                } else {
                    SqlType::VarBinary
                }
            }
            NativeType::LargeObject => SqlType::LongVarBinary,
            NativeType::Int2 => SqlType::SmallInt,
            NativeType::Oid | NativeType::Xid | NativeType::Int4 => SqlType::Integer,
            NativeType::Int8 => {
                if let Some(sql) = self.settings.int8_as.sql_type() {
                    sql
                } else if self.settings.lacks_native_int64 {
                    SqlType::Numeric
                } else {
                    SqlType::BigInt
                }
            }
            NativeType::Numeric => SqlType::Numeric,
            NativeType::Float4 => SqlType::Real,
            NativeType::Float8 | NativeType::Money => SqlType::Float,
            NativeType::Date => self.odbc3_or(SqlType::TypeDate, SqlType::Date),
            NativeType::Time => self.odbc3_or(SqlType::TypeTime, SqlType::Time),
            NativeType::DateTime => self.odbc3_or(SqlType::TypeTimestamp, SqlType::Timestamp),
            NativeType::Bool => SqlType::Char,
            NativeType::Other(_) => SqlType::VarChar,
        }
    }

    /// Descriptor type: typed date/time types collapse to `Datetime`.
    pub fn descriptor_type(&self, native: NativeType, col: Option<usize>) -> DescriptorType {
        self.concise_type(native, col).descriptor_type()
    }

    /// Datetime subcode for date/time columns.
    pub fn datetime_subcode(
        &self,
        native: NativeType,
        col: Option<usize>,
    ) -> Option<DatetimeSubcode> {
        self.concise_type(native, col).datetime_subcode()
    }

    /// Host buffer type values of this native type are delivered in.
    pub fn c_type(&self, native: NativeType) -> CType {
        let text = if self.settings.wide_chars {
            CType::WChar
        } else {
            CType::Char
        };
        match native {
            NativeType::Int8 => {
                if self.settings.lacks_native_int64 {
                    CType::Char
                } else {
                    CType::SBigInt
                }
            }
            NativeType::Numeric => CType::Char,
            NativeType::Int2 => CType::SShort,
            NativeType::Oid | NativeType::Xid => CType::ULong,
            NativeType::Int4 => CType::SLong,
            NativeType::Float4 | NativeType::Money => CType::Float,
            NativeType::Float8 => CType::Double,
            NativeType::Date => {
                if self.settings.is_odbc3() {
                    CType::TypeDate
                } else {
                    CType::Date
                }
            }
            NativeType::Time => {
                if self.settings.is_odbc3() {
                    CType::TypeTime
                } else {
                    CType::Time
                }
            }
            NativeType::DateTime => {
                if self.settings.is_odbc3() {
                    CType::TypeTimestamp
                } else {
                    CType::Timestamp
                }
            }
            NativeType::Bool => CType::Char,
            NativeType::Bytea | NativeType::LargeObject => CType::Binary,
            _ => text,
        }
    }

    /// Default host type for a SQL type under these settings.
    pub fn default_c_type(&self, sql_type: SqlType) -> CType {
        CType::default_for(sql_type, self.settings.wide_chars)
    }

    /// Wire signature of values of this native type.
    pub fn wire_signature(&self, native: NativeType) -> Signature {
        if native == NativeType::Bool {
            return Signature::Bool;
        }
        match self.c_type(native) {
            CType::SShort => Signature::Int16,
            CType::UShort => Signature::UInt16,
            CType::SLong => Signature::Int32,
            CType::ULong => Signature::UInt32,
            CType::SBigInt => Signature::Int64,
            CType::UBigInt => Signature::UInt64,
            CType::STinyInt | CType::UTinyInt => Signature::Byte,
            CType::Bit => Signature::Bool,
            CType::Float | CType::Double => Signature::Double,
            CType::Char | CType::WChar => Signature::String,
            CType::Binary => Signature::array_of(Signature::Byte),
            CType::Date
            | CType::Time
            | CType::Timestamp
            | CType::TypeDate
            | CType::TypeTime
            | CType::TypeTimestamp => datetime_signature(),
        }
    }
}

/// `(xi)`: seconds since the epoch and microseconds.
pub fn datetime_signature() -> Signature {
    Signature::Struct(vec![Signature::Int64, Signature::Int32])
}

/// Native type used to store a SQL type.
pub fn sql_type_to_native(sql_type: SqlType) -> NativeType {
    match sql_type {
        SqlType::Binary | SqlType::VarBinary | SqlType::LongVarBinary => NativeType::Bytea,
        SqlType::Char | SqlType::WChar => NativeType::Bpchar,
        SqlType::Bit => NativeType::Char,
        SqlType::Date | SqlType::TypeDate => NativeType::Date,
        SqlType::Double | SqlType::Float => NativeType::Float8,
        SqlType::Decimal | SqlType::Numeric => NativeType::Numeric,
        SqlType::BigInt => NativeType::Int8,
        SqlType::Integer => NativeType::Int4,
        SqlType::LongVarChar | SqlType::WLongVarChar => NativeType::Text,
        SqlType::Real => NativeType::Float4,
        SqlType::SmallInt | SqlType::TinyInt => NativeType::Int2,
        SqlType::Time | SqlType::TypeTime => NativeType::Time,
        SqlType::Timestamp | SqlType::TypeTimestamp => NativeType::DateTime,
        SqlType::VarChar | SqlType::WVarChar => NativeType::Varchar,
    }
}

/// Native type for a raw SQL type code; unknown codes give the
/// `OID_NO_MAPPING` sentinel.
pub fn sql_code_to_native(code: i16) -> NativeType {
    match SqlType::from_code(code) {
        Some(sql_type) => sql_type_to_native(sql_type),
        None => NativeType::Other(OID_NO_MAPPING),
    }
}

/// Native type for a received column signature.
///
/// Anything without a dedicated mapping is carried as opaque text.
pub fn native_from_signature(sig: &Signature) -> NativeType {
    match sig {
        Signature::Int64 => NativeType::Int8,
        Signature::Int32 | Signature::UInt16 => NativeType::Int4,
        Signature::Int16 | Signature::Byte => NativeType::Int2,
        Signature::UInt32 => NativeType::Oid,
        Signature::UInt64 => NativeType::Numeric,
        Signature::Bool => NativeType::Bool,
        Signature::Double => NativeType::Float8,
        Signature::String => NativeType::Varchar,
        Signature::Array(elem) if **elem == Signature::Byte => NativeType::Bytea,
        s if *s == datetime_signature() => NativeType::DateTime,
        _ => NativeType::Varchar,
    }
}
