//! Derived column attributes.

use super::sql_type::{DatetimeSubcode, DescriptorType, SqlType};

/// Longest character column reported as (W)CHAR/(W)VARCHAR.
pub const MAX_VARCHAR_SIZE: i32 = 255;

/// Column size cannot be bounded (large objects).
pub const SQL_NO_TOTAL: i32 = -4;

/// Column size is unknown under the `DontKnow` policy.
pub const UNKNOWN_SIZE: i32 = -1;

/// Bytes per wide character in host buffers.
pub const WCHAR_LEN: i32 = 2;

/// How to size a column whose width the server did not report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownSizePolicy {
    /// Maximum allowed size.
    Max,
    /// Longest value actually observed.
    Longest,
    /// Report `UNKNOWN_SIZE`.
    DontKnow,
}

/// Column nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    NoNulls,
    Nullable,
    Unknown,
}

impl Nullability {
    /// Numeric code.
    pub fn code(&self) -> i16 {
        match self {
            Nullability::NoNulls => 0,
            Nullability::Nullable => 1,
            Nullability::Unknown => 2,
        }
    }
}

impl From<bool> for Nullability {
    fn from(nullable: bool) -> Self {
        if nullable {
            Nullability::Nullable
        } else {
            Nullability::NoNulls
        }
    }
}

/// Which predicates a column supports in WHERE clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Searchable {
    /// Only LIKE.
    LikeOnly,
    /// Everything except LIKE.
    AllExceptLike,
    /// Every predicate.
    Searchable,
}

impl Searchable {
    /// Numeric code.
    pub fn code(&self) -> i16 {
        match self {
            Searchable::LikeOnly => 1,
            Searchable::AllExceptLike => 2,
            Searchable::Searchable => 3,
        }
    }
}

/// Every descriptive attribute of one column.
///
/// `None` means the attribute does not apply to the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFacets {
    pub concise_type: SqlType,
    pub descriptor_type: DescriptorType,
    pub datetime_subcode: Option<DatetimeSubcode>,
    /// Column size (2.x precision).
    pub column_size: i32,
    /// 3.x precision; numeric only.
    pub precision: Option<i32>,
    pub decimal_digits: Option<i16>,
    /// 3.x scale; numeric only.
    pub scale: Option<i16>,
    pub min_decimal_digits: Option<i16>,
    pub max_decimal_digits: Option<i16>,
    pub display_size: i32,
    pub buffer_length: i32,
    /// Descriptor length (`SQL_DESC_LENGTH`).
    pub length: i32,
    pub transfer_octet_length: i32,
    pub radix: Option<i16>,
    pub nullable: Nullability,
    pub auto_increment: Option<bool>,
    pub case_sensitive: bool,
    pub money: bool,
    pub searchable: Searchable,
    pub unsigned: Option<bool>,
    pub literal_prefix: Option<&'static str>,
    pub literal_suffix: Option<&'static str>,
    pub create_params: Option<&'static str>,
    pub type_name: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(Nullability::from(true).code(), 1);
        assert_eq!(Nullability::from(false), Nullability::NoNulls);
        assert_eq!(Searchable::Searchable.code(), 3);
        assert_eq!(Searchable::AllExceptLike.code(), 2);
    }
}
