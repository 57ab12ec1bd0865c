//! Type vocabulary shared by the mapper and the recordset codec.

mod c_type;
mod column;
mod facets;
mod metadata;
mod native_type;
mod sql_type;
mod value;

pub use c_type::CType;
pub use column::{Column, ColumnInfo};
pub use facets::{
    ColumnFacets, Nullability, Searchable, UnknownSizePolicy, MAX_VARCHAR_SIZE, SQL_NO_TOTAL,
    UNKNOWN_SIZE, WCHAR_LEN,
};
pub use metadata::{FieldMetadata, ResultMetadata};
pub use native_type::*;
pub use sql_type::{DatetimeSubcode, DescriptorType, SqlType, TypeFamily, SQL_DATETIME};
pub use value::{Cell, WireDateTime};
