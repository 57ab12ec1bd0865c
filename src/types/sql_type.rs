//! Client-visible SQL types and their descriptor forms.

use std::fmt;

/// Descriptor type code shared by all typed date/time SQL types.
pub const SQL_DATETIME: i16 = 9;

/// Standard SQL type reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Char,
    Numeric,
    Decimal,
    Integer,
    SmallInt,
    Float,
    Real,
    Double,
    /// 2.x DATE.
    Date,
    /// 2.x TIME.
    Time,
    /// 2.x TIMESTAMP.
    Timestamp,
    VarChar,
    TypeDate,
    TypeTime,
    TypeTimestamp,
    LongVarChar,
    Binary,
    VarBinary,
    LongVarBinary,
    BigInt,
    TinyInt,
    Bit,
    WChar,
    WVarChar,
    WLongVarChar,
}

/// Coarse grouping of SQL types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    /// Text, including bits carried as one-character text.
    Character,
    Binary,
    Integer,
    /// NUMERIC / DECIMAL.
    Exact,
    Approximate,
    Datetime,
}

impl SqlType {
    /// Types reported by type-info queries, narrow set.
    pub const SUPPORTED: [SqlType; 21] = [
        SqlType::BigInt,
        SqlType::Bit,
        SqlType::Char,
        SqlType::TypeDate,
        SqlType::Date,
        SqlType::Decimal,
        SqlType::Double,
        SqlType::Float,
        SqlType::Integer,
        SqlType::LongVarBinary,
        SqlType::LongVarChar,
        SqlType::Numeric,
        SqlType::Real,
        SqlType::SmallInt,
        SqlType::TypeTime,
        SqlType::TypeTimestamp,
        SqlType::Time,
        SqlType::Timestamp,
        SqlType::TinyInt,
        SqlType::VarBinary,
        SqlType::VarChar,
    ];

    /// Additional types reported when wide characters are enabled.
    pub const SUPPORTED_WIDE: [SqlType; 3] =
        [SqlType::WChar, SqlType::WVarChar, SqlType::WLongVarChar];

    /// Numeric type code.
    pub fn code(&self) -> i16 {
        match self {
            SqlType::Char => 1,
            SqlType::Numeric => 2,
            SqlType::Decimal => 3,
            SqlType::Integer => 4,
            SqlType::SmallInt => 5,
            SqlType::Float => 6,
            SqlType::Real => 7,
            SqlType::Double => 8,
            SqlType::Date => 9,
            SqlType::Time => 10,
            SqlType::Timestamp => 11,
            SqlType::VarChar => 12,
            SqlType::TypeDate => 91,
            SqlType::TypeTime => 92,
            SqlType::TypeTimestamp => 93,
            SqlType::LongVarChar => -1,
            SqlType::Binary => -2,
            SqlType::VarBinary => -3,
            SqlType::LongVarBinary => -4,
            SqlType::BigInt => -5,
            SqlType::TinyInt => -6,
            SqlType::Bit => -7,
            SqlType::WChar => -8,
            SqlType::WVarChar => -9,
            SqlType::WLongVarChar => -10,
        }
    }

    /// Look up a type by its numeric code.
    ///
    /// Code 9 is read as the 2.x DATE type; the 3.x descriptor meaning of 9
    /// (generic datetime) is not a concise type.
    pub fn from_code(code: i16) -> Option<Self> {
        let t = match code {
            1 => SqlType::Char,
            2 => SqlType::Numeric,
            3 => SqlType::Decimal,
            4 => SqlType::Integer,
            5 => SqlType::SmallInt,
            6 => SqlType::Float,
            7 => SqlType::Real,
            8 => SqlType::Double,
            9 => SqlType::Date,
            10 => SqlType::Time,
            11 => SqlType::Timestamp,
            12 => SqlType::VarChar,
            91 => SqlType::TypeDate,
            92 => SqlType::TypeTime,
            93 => SqlType::TypeTimestamp,
            -1 => SqlType::LongVarChar,
            -2 => SqlType::Binary,
            -3 => SqlType::VarBinary,
            -4 => SqlType::LongVarBinary,
            -5 => SqlType::BigInt,
            -6 => SqlType::TinyInt,
            -7 => SqlType::Bit,
            -8 => SqlType::WChar,
            -9 => SqlType::WVarChar,
            -10 => SqlType::WLongVarChar,
            _ => return None,
        };
        Some(t)
    }

    /// Family this type belongs to.
    pub fn family(&self) -> TypeFamily {
        match self {
            SqlType::Char
            | SqlType::VarChar
            | SqlType::LongVarChar
            | SqlType::WChar
            | SqlType::WVarChar
            | SqlType::WLongVarChar
            | SqlType::Bit => TypeFamily::Character,
            SqlType::Binary | SqlType::VarBinary | SqlType::LongVarBinary => TypeFamily::Binary,
            SqlType::BigInt | SqlType::Integer | SqlType::SmallInt | SqlType::TinyInt => {
                TypeFamily::Integer
            }
            SqlType::Numeric | SqlType::Decimal => TypeFamily::Exact,
            SqlType::Float | SqlType::Real | SqlType::Double => TypeFamily::Approximate,
            SqlType::Date
            | SqlType::Time
            | SqlType::Timestamp
            | SqlType::TypeDate
            | SqlType::TypeTime
            | SqlType::TypeTimestamp => TypeFamily::Datetime,
        }
    }

    /// Whether this is one of the wide-character types.
    pub fn is_wide(&self) -> bool {
        matches!(
            self,
            SqlType::WChar | SqlType::WVarChar | SqlType::WLongVarChar
        )
    }

    /// Two-level descriptor type.
    pub fn descriptor_type(&self) -> DescriptorType {
        match self {
            SqlType::TypeDate | SqlType::TypeTime | SqlType::TypeTimestamp => {
                DescriptorType::Datetime
            }
            other => DescriptorType::Concise(*other),
        }
    }

    /// Datetime subcode for the typed date/time types.
    pub fn datetime_subcode(&self) -> Option<DatetimeSubcode> {
        match self {
            SqlType::TypeDate => Some(DatetimeSubcode::Date),
            SqlType::TypeTime => Some(DatetimeSubcode::Time),
            SqlType::TypeTimestamp => Some(DatetimeSubcode::Timestamp),
            _ => None,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlType::Char => "CHAR",
            SqlType::Numeric => "NUMERIC",
            SqlType::Decimal => "DECIMAL",
            SqlType::Integer => "INTEGER",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Float => "FLOAT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::Date | SqlType::TypeDate => "DATE",
            SqlType::Time | SqlType::TypeTime => "TIME",
            SqlType::Timestamp | SqlType::TypeTimestamp => "TIMESTAMP",
            SqlType::VarChar => "VARCHAR",
            SqlType::LongVarChar => "LONGVARCHAR",
            SqlType::Binary => "BINARY",
            SqlType::VarBinary => "VARBINARY",
            SqlType::LongVarBinary => "LONGVARBINARY",
            SqlType::BigInt => "BIGINT",
            SqlType::TinyInt => "TINYINT",
            SqlType::Bit => "BIT",
            SqlType::WChar => "WCHAR",
            SqlType::WVarChar => "WVARCHAR",
            SqlType::WLongVarChar => "WLONGVARCHAR",
        };
        write!(f, "{}", name)
    }
}

/// Descriptor-level type: typed date/time types collapse to `Datetime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    Datetime,
    Concise(SqlType),
}

impl DescriptorType {
    /// Numeric descriptor code.
    pub fn code(&self) -> i16 {
        match self {
            DescriptorType::Datetime => SQL_DATETIME,
            DescriptorType::Concise(t) => t.code(),
        }
    }
}

/// Subcode distinguishing date, time and timestamp under `Datetime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatetimeSubcode {
    Date,
    Time,
    Timestamp,
}

impl DatetimeSubcode {
    /// Numeric subcode.
    pub fn code(&self) -> i16 {
        match self {
            DatetimeSubcode::Date => 1,
            DatetimeSubcode::Time => 2,
            DatetimeSubcode::Timestamp => 3,
        }
    }
}
