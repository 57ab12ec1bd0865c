//! Column description and type-info catalog built on the mapper.

use crate::error::Result;
use crate::typemap::{sql_type_to_native, type_name, TypeMapper};
use crate::types::{
    DatetimeSubcode, NativeType, Nullability, Searchable, SqlType, UnknownSizePolicy,
};

/// What a "describe column" call reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub name: String,
    pub concise_type: SqlType,
    pub column_size: i32,
    pub decimal_digits: Option<i16>,
    pub nullable: Nullability,
}

/// Describe one result column.
pub fn describe_column(
    mapper: &TypeMapper<'_>,
    name: &str,
    native: NativeType,
    col: Option<usize>,
    policy: UnknownSizePolicy,
) -> Result<ColumnDescription> {
    Ok(ColumnDescription {
        name: name.to_string(),
        concise_type: mapper.concise_type(native, col),
        column_size: mapper.column_size(native, col, policy)?,
        decimal_digits: mapper.decimal_digits(native, col),
        nullable: mapper.nullable(native),
    })
}

/// One row of the type-info catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfoRow {
    pub type_name: &'static str,
    pub data_type: SqlType,
    pub column_size: i32,
    pub literal_prefix: Option<&'static str>,
    pub literal_suffix: Option<&'static str>,
    pub create_params: Option<&'static str>,
    pub nullable: Nullability,
    pub case_sensitive: bool,
    pub searchable: Searchable,
    pub unsigned_attribute: Option<bool>,
    pub fixed_prec_scale: bool,
    pub auto_unique_value: Option<bool>,
    pub minimum_scale: Option<i16>,
    pub maximum_scale: Option<i16>,
    /// Descriptor-level type code.
    pub sql_data_type: i16,
    pub sql_datetime_sub: Option<DatetimeSubcode>,
    pub num_prec_radix: Option<i16>,
}

/// The type-info catalog: one row per supported SQL type.
///
/// Wide character types are listed only when wide characters are enabled.
pub fn type_info(mapper: &TypeMapper<'_>) -> Result<Vec<TypeInfoRow>> {
    let wide = mapper.settings().wide_chars;
    let sql_types = SqlType::SUPPORTED
        .iter()
        .chain(SqlType::SUPPORTED_WIDE.iter().filter(|_| wide));

    let mut rows = Vec::new();
    for &data_type in sql_types {
        let native = sql_type_to_native(data_type);
        rows.push(TypeInfoRow {
            type_name: type_name(native, false),
            data_type,
            column_size: mapper.column_size(native, None, UnknownSizePolicy::Max)?,
            literal_prefix: mapper.literal_prefix(native),
            literal_suffix: mapper.literal_suffix(native),
            create_params: mapper.create_params(native),
            nullable: mapper.nullable(native),
            case_sensitive: mapper.case_sensitive(native),
            searchable: mapper.searchable(native),
            unsigned_attribute: mapper.unsigned(native),
            fixed_prec_scale: mapper.is_money(native),
            auto_unique_value: mapper.auto_increment(native, None),
            minimum_scale: mapper.min_decimal_digits(native),
            maximum_scale: mapper.max_decimal_digits(native),
            sql_data_type: data_type.descriptor_type().code(),
            sql_datetime_sub: data_type.datetime_subcode(),
            num_prec_radix: mapper.radix(native),
        });
    }
    Ok(rows)
}
