//! Host ("C") buffer types.

use std::fmt;

use super::sql_type::SqlType;

/// In-memory representation a caller's buffer is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CType {
    Char,
    WChar,
    SShort,
    UShort,
    SLong,
    ULong,
    Float,
    Double,
    Bit,
    STinyInt,
    UTinyInt,
    SBigInt,
    UBigInt,
    Binary,
    Date,
    Time,
    Timestamp,
    TypeDate,
    TypeTime,
    TypeTimestamp,
}

impl CType {
    /// Numeric type code.
    pub fn code(&self) -> i16 {
        match self {
            CType::Char => 1,
            CType::WChar => -8,
            CType::SShort => -15,
            CType::UShort => -17,
            CType::SLong => -16,
            CType::ULong => -18,
            CType::Float => 7,
            CType::Double => 8,
            CType::Bit => -7,
            CType::STinyInt => -26,
            CType::UTinyInt => -28,
            CType::SBigInt => -25,
            CType::UBigInt => -27,
            CType::Binary => -2,
            CType::Date => 9,
            CType::Time => 10,
            CType::Timestamp => 11,
            CType::TypeDate => 91,
            CType::TypeTime => 92,
            CType::TypeTimestamp => 93,
        }
    }

    /// Fixed octet size of the host type; 0 for variable-length types.
    pub fn octet_length(&self) -> i32 {
        match self {
            CType::SShort | CType::UShort => 2,
            CType::SLong | CType::ULong | CType::Float => 4,
            CType::Double | CType::SBigInt | CType::UBigInt => 8,
            CType::Bit | CType::STinyInt | CType::UTinyInt => 1,
            // DATE_STRUCT / TIME_STRUCT: three 16-bit fields
            CType::Date | CType::TypeDate | CType::Time | CType::TypeTime => 6,
            CType::Timestamp | CType::TypeTimestamp => 16,
            CType::Binary | CType::Char | CType::WChar => 0,
        }
    }

    /// Whether the host type holds text.
    pub fn is_text(&self) -> bool {
        matches!(self, CType::Char | CType::WChar)
    }

    /// Whether the host type is a date, time or timestamp structure.
    pub fn is_datetime(&self) -> bool {
        matches!(
            self,
            CType::Date
                | CType::Time
                | CType::Timestamp
                | CType::TypeDate
                | CType::TypeTime
                | CType::TypeTimestamp
        )
    }

    /// Default host type for a SQL type.
    ///
    /// `wide_chars` decides whether the wide SQL types land in wide or
    /// narrow buffers.
    pub fn default_for(sql_type: SqlType, wide_chars: bool) -> Self {
        match sql_type {
            SqlType::Char
            | SqlType::VarChar
            | SqlType::LongVarChar
            | SqlType::Decimal
            | SqlType::Numeric => CType::Char,
            SqlType::BigInt => CType::SBigInt,
            SqlType::WChar | SqlType::WVarChar | SqlType::WLongVarChar => {
                if wide_chars {
                    CType::WChar
                } else {
                    CType::Char
                }
            }
            SqlType::Bit => CType::Bit,
            SqlType::TinyInt => CType::STinyInt,
            SqlType::SmallInt => CType::SShort,
            SqlType::Integer => CType::SLong,
            SqlType::Real => CType::Float,
            SqlType::Float | SqlType::Double => CType::Double,
            SqlType::Binary | SqlType::VarBinary | SqlType::LongVarBinary => CType::Binary,
            SqlType::Date => CType::Date,
            SqlType::Time => CType::Time,
            SqlType::Timestamp => CType::Timestamp,
            SqlType::TypeDate => CType::TypeDate,
            SqlType::TypeTime => CType::TypeTime,
            SqlType::TypeTimestamp => CType::TypeTimestamp,
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQL_C_{}", format!("{:?}", self).to_uppercase())
    }
}
