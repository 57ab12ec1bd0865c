//! Descriptive column attributes and the combined facet record.

use super::TypeMapper;
use crate::error::Result;
use crate::types::{
    ColumnFacets, NativeType, Nullability, Searchable, UnknownSizePolicy, LO_TYPE_NAME,
};

/// Catalog name of a native type.
pub fn type_name(native: NativeType, auto_increment: bool) -> &'static str {
    match native {
        NativeType::Char | NativeType::Bpchar => "char",
        NativeType::Char2 => "char2",
        NativeType::Char4 => "char4",
        NativeType::Char8 => "char8",
        NativeType::Int8 if auto_increment => "bigserial",
        NativeType::Int8 => "int8",
        NativeType::Numeric => "numeric",
        NativeType::Varchar => "varchar",
        NativeType::Text => "text",
        NativeType::Name => "name",
        NativeType::Int2 => "int2",
        NativeType::Oid => "oid",
        NativeType::Xid => "xid",
        NativeType::Int4 if auto_increment => "serial",
        NativeType::Int4 => "int4",
        NativeType::Float4 => "float4",
        NativeType::Float8 => "float8",
        NativeType::Date => "date",
        NativeType::Time => "time",
        NativeType::DateTime => "datetime",
        NativeType::Money => "money",
        NativeType::Bool => "bool",
        NativeType::Bytea => "bytea",
        NativeType::LargeObject => LO_TYPE_NAME,
        NativeType::Other(_) => "unknown",
    }
}

impl TypeMapper<'_> {
    /// Numeric radix.
    pub fn radix(&self, native: NativeType) -> Option<i16> {
        match native {
            NativeType::Int2
            | NativeType::Xid
            | NativeType::Oid
            | NativeType::Int4
            | NativeType::Int8
            | NativeType::Numeric
            | NativeType::Float4
            | NativeType::Money
            | NativeType::Float8 => Some(10),
            _ => None,
        }
    }

    /// Nullability; the server never tells, so every column may be NULL.
    pub fn nullable(&self, _native: NativeType) -> Nullability {
        Nullability::Nullable
    }

    /// Whether the column auto-increments, where the question applies.
    ///
    /// Only a live column flagged in the result metadata answers true.
    pub fn auto_increment(&self, native: NativeType, col: Option<usize>) -> Option<bool> {
        match native {
            NativeType::Bool
            | NativeType::Int2
            | NativeType::Oid
            | NativeType::Xid
            | NativeType::Int4
            | NativeType::Int8
            | NativeType::Numeric
            | NativeType::Float4
            | NativeType::Float8
            | NativeType::Money
            | NativeType::Date
            | NativeType::Time
            | NativeType::DateTime => Some(
                col.and_then(|c| self.field(c))
                    .is_some_and(|f| f.auto_increment),
            ),
            _ => None,
        }
    }

    /// Whether comparisons are case sensitive.
    pub fn case_sensitive(&self, native: NativeType) -> bool {
        native.is_character()
    }

    /// Whether the column holds a currency-like exact value.
    pub fn is_money(&self, native: NativeType) -> bool {
        matches!(native, NativeType::Money | NativeType::Numeric)
    }

    /// Which predicates can filter on the column.
    pub fn searchable(&self, native: NativeType) -> Searchable {
        if native.is_character() {
            Searchable::Searchable
        } else {
            Searchable::AllExceptLike
        }
    }

    /// Signedness of numeric columns.
    pub fn unsigned(&self, native: NativeType) -> Option<bool> {
        match native {
            NativeType::Oid | NativeType::Xid => Some(true),
            NativeType::Int2
            | NativeType::Int4
            | NativeType::Int8
            | NativeType::Numeric
            | NativeType::Float4
            | NativeType::Float8
            | NativeType::Money => Some(false),
            _ => None,
        }
    }

    /// Quote opening a literal; numerics are written bare.
    pub fn literal_prefix(&self, native: NativeType) -> Option<&'static str> {
        (!native.is_numeric()).then_some("'")
    }

    /// Quote closing a literal.
    pub fn literal_suffix(&self, native: NativeType) -> Option<&'static str> {
        (!native.is_numeric()).then_some("'")
    }

    /// Parameters accepted in a column definition.
    pub fn create_params(&self, native: NativeType) -> Option<&'static str> {
        match native {
            NativeType::Bpchar | NativeType::Varchar => Some("max. length"),
            NativeType::Numeric => Some("precision, scale"),
            _ => None,
        }
    }

    /// Every facet of a column.
    pub fn facets(
        &self,
        native: NativeType,
        col: Option<usize>,
        policy: UnknownSizePolicy,
    ) -> Result<ColumnFacets> {
        let concise_type = self.concise_type(native, col);
        let auto_increment = self.auto_increment(native, col);
        Ok(ColumnFacets {
            concise_type,
            descriptor_type: concise_type.descriptor_type(),
            datetime_subcode: concise_type.datetime_subcode(),
            column_size: self.column_size(native, col, policy)?,
            precision: self.precision(native, col),
            decimal_digits: self.decimal_digits(native, col),
            scale: self.scale(native, col),
            min_decimal_digits: self.min_decimal_digits(native),
            max_decimal_digits: self.max_decimal_digits(native),
            display_size: self.display_size(native, col, policy)?,
            buffer_length: self.buffer_length(native, col, policy)?,
            length: self.desc_length(native, col, policy)?,
            transfer_octet_length: self.transfer_octet_length(native, col, policy)?,
            radix: self.radix(native),
            nullable: self.nullable(native),
            auto_increment,
            case_sensitive: self.case_sensitive(native),
            money: self.is_money(native),
            searchable: self.searchable(native),
            unsigned: self.unsigned(native),
            literal_prefix: self.literal_prefix(native),
            literal_suffix: self.literal_suffix(native),
            create_params: self.create_params(native),
            type_name: type_name(native, auto_increment.unwrap_or(false)),
        })
    }
}
