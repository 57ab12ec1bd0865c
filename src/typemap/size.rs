//! Column size, precision and length facets.

use tracing::{debug, trace, warn};

use super::TypeMapper;
use crate::error::{Error, ErrorCode, Result};
use crate::types::{
    CType, FieldMetadata, NativeType, UnknownSizePolicy, MAX_VARCHAR_SIZE, SQL_NO_TOTAL,
    UNKNOWN_SIZE, WCHAR_LEN,
};

/// Numeric precision reported when nothing better is known.
pub const NUMERIC_DEFAULT_SIZE: i32 = 28;

/// Numeric scale reported when nothing better is known.
pub const NUMERIC_DEFAULT_SCALE: i32 = 6;

impl TypeMapper<'_> {
    pub(super) fn field(&self, col: usize) -> Option<&FieldMetadata> {
        self.result.and_then(|r| r.field(col))
    }

    fn is_catalog(&self) -> bool {
        self.result.is_some_and(|r| r.catalog)
    }

    /// (size, scale) of a numeric column.
    fn numeric_shape(&self, col: Option<usize>) -> (i32, i32) {
        let defaults = (NUMERIC_DEFAULT_SIZE, NUMERIC_DEFAULT_SCALE);
        let Some(col) = col else {
            return defaults;
        };
        let Some(field) = self.field(col) else {
            debug!("numeric column {} has no field metadata, using defaults", col);
            return defaults;
        };

        if let Some(m) = field.modifier() {
            return ((m >> 16) & 0xffff, m & 0xffff);
        }

        if self.is_catalog() {
            return match field.field_size {
                Some(size) if size > 0 => (2 * size, size),
                _ => defaults,
            };
        }

        let longest = field.display_size.unwrap_or(0);
        if longest <= 0 {
            return defaults;
        }
        trace!("numeric column {} sized from display width {}", col, longest);
        ((2 * longest).max(10), longest.max(5))
    }

    /// Size of a character (or unknown) column.
    ///
    /// Declared character types never consult the policy: varchar and
    /// bpchar trust their declared length, bpchar falls back to the longest
    /// value seen, and all three fall back to the maximum. Only types the
    /// server gave no length for are resolved by `policy`.
    fn char_column_size(
        &self,
        native: NativeType,
        col: Option<usize>,
        policy: UnknownSizePolicy,
    ) -> i32 {
        let max = MAX_VARCHAR_SIZE;
        let Some(col) = col else {
            return max;
        };
        let Some(field) = self.field(col) else {
            debug!("character column {} has no field metadata, using {}", col, max);
            return max;
        };

        if let Some(size) = field.field_size.filter(|s| *s > 0) {
            return size;
        }
        if self.is_catalog() {
            return max;
        }

        let p = field.display_size.unwrap_or(0);
        let len = field.modifier().unwrap_or(0);
        if len > 0
            && (len >= p || matches!(native, NativeType::Varchar | NativeType::Bpchar))
        {
            return len;
        }

        match native {
            NativeType::Bpchar if p > 0 => return p,
            NativeType::Bpchar | NativeType::Varchar | NativeType::Text => return max,
            _ => {}
        }

        trace!(
            "column {} of unknown width (modifier {}, longest {}), policy {:?}",
            col,
            len,
            p,
            policy
        );
        match policy {
            UnknownSizePolicy::Longest if p > 0 => p,
            UnknownSizePolicy::Longest | UnknownSizePolicy::Max => max.max(p),
            UnknownSizePolicy::DontKnow => UNKNOWN_SIZE,
        }
    }

    pub(super) fn exceeds_varchar(&self, native: NativeType, col: Option<usize>) -> bool {
        self.char_column_size(native, col, UnknownSizePolicy::Max) > MAX_VARCHAR_SIZE
    }

    /// Host octet length of a character column of `prec` characters.
    fn char_octet_length(&self, prec: i32) -> i32 {
        if prec < 0 {
            // SQL_NO_TOTAL and UNKNOWN_SIZE pass through
            return prec;
        }
        if self.settings.wide_chars {
            return prec * WCHAR_LEN;
        }
        let mut coef = self.settings.mb_max_bytes_per_char;
        if coef < 2 && self.settings.lf_conversion {
            coef = 2;
        }
        if coef == 1 {
            return prec;
        }
        if prec <= MAX_VARCHAR_SIZE && prec * coef > MAX_VARCHAR_SIZE {
            return MAX_VARCHAR_SIZE;
        }
        prec * coef
    }

    /// Column size (2.x precision).
    ///
    /// Fails only for `name` columns, whose size is structurally
    /// undefined; the failure is also reported to the error sink.
    pub fn column_size(
        &self,
        native: NativeType,
        col: Option<usize>,
        policy: UnknownSizePolicy,
    ) -> Result<i32> {
        let size = match native {
            NativeType::Char => 1,
            NativeType::Char2 => 2,
            NativeType::Char4 => 4,
            NativeType::Char8 => 8,
            NativeType::Name => {
                let err = Error::UnsupportedOperation {
                    operation: "column size",
                    type_name: "name",
                };
                warn!("{}", err);
                if let Some(sink) = self.sink {
                    sink.report(ErrorCode::Internal, &err.to_string());
                }
                return Err(err);
            }
            NativeType::Int2 => 5,
            NativeType::Oid | NativeType::Xid | NativeType::Int4 => 10,
            NativeType::Int8 => 19,
            NativeType::Numeric => self.numeric_shape(col).0,
            NativeType::Float4 | NativeType::Money => 7,
            NativeType::Float8 => 15,
            NativeType::Date => 10,
            NativeType::Time => 8,
            // "[seconds,micros]": up to 19 digits plus sign, 6 digits, punctuation
            NativeType::DateTime => 28,
            NativeType::Bool => {
                if self.settings.true_is_minus1 {
                    2
                } else {
                    1
                }
            }
            NativeType::LargeObject => SQL_NO_TOTAL,
            NativeType::Bytea if self.settings.bytea_as_longvarbinary => SQL_NO_TOTAL,
            _ => self.char_column_size(native, col, policy),
        };
        Ok(size)
    }

    /// 3.x precision; only numerics have one.
    pub fn precision(&self, native: NativeType, col: Option<usize>) -> Option<i32> {
        (native == NativeType::Numeric).then(|| self.numeric_shape(col).0)
    }

    /// 3.x scale; only numerics have one.
    pub fn scale(&self, native: NativeType, col: Option<usize>) -> Option<i16> {
        (native == NativeType::Numeric).then(|| self.numeric_shape(col).1 as i16)
    }

    /// Characters needed to display a value.
    pub fn display_size(
        &self,
        native: NativeType,
        col: Option<usize>,
        policy: UnknownSizePolicy,
    ) -> Result<i32> {
        let size = match native {
            NativeType::Int2 => 6,
            NativeType::Oid | NativeType::Xid => 10,
            NativeType::Int4 => 11,
            // 19 digits and a sign
            NativeType::Int8 => 20,
            NativeType::Numeric => self.numeric_shape(col).0 + 2,
            NativeType::Money => 15,
            NativeType::Float4 => 13,
            NativeType::Float8 => 22,
            _ => return self.column_size(native, col, policy),
        };
        Ok(size)
    }

    /// Bytes transferred when fetching into the default host type.
    pub fn buffer_length(
        &self,
        native: NativeType,
        col: Option<usize>,
        policy: UnknownSizePolicy,
    ) -> Result<i32> {
        let len = match native {
            NativeType::Int2 => 2,
            NativeType::Oid | NativeType::Xid | NativeType::Int4 => 4,
            NativeType::Int8 => {
                if self.c_type(native) == CType::Char {
                    20
                } else {
                    8
                }
            }
            NativeType::Numeric => self.numeric_shape(col).0 + 2,
            NativeType::Float4 | NativeType::Money => 4,
            NativeType::Float8 => 8,
            NativeType::Date | NativeType::Time => 6,
            NativeType::DateTime => 16,
            NativeType::Bpchar | NativeType::Varchar => {
                self.char_octet_length(self.column_size(native, col, policy)?)
            }
            _ => return self.column_size(native, col, policy),
        };
        Ok(len)
    }

    /// Descriptor length.
    pub fn desc_length(
        &self,
        native: NativeType,
        col: Option<usize>,
        policy: UnknownSizePolicy,
    ) -> Result<i32> {
        let len = match native {
            NativeType::Int2 => 2,
            NativeType::Oid | NativeType::Xid | NativeType::Int4 => 4,
            NativeType::Int8 => 20,
            NativeType::Numeric => self.numeric_shape(col).0 + 2,
            NativeType::Float4 | NativeType::Money => 4,
            NativeType::Float8 => 8,
            _ => return self.column_size(native, col, policy),
        };
        Ok(len)
    }

    /// Maximum octets transferred for character and binary columns; -1 for
    /// everything else.
    pub fn transfer_octet_length(
        &self,
        native: NativeType,
        col: Option<usize>,
        policy: UnknownSizePolicy,
    ) -> Result<i32> {
        match native {
            NativeType::Varchar | NativeType::Bpchar | NativeType::Text => {
                Ok(self.char_octet_length(self.column_size(native, col, policy)?))
            }
            NativeType::Bytea => self.column_size(native, col, policy),
            _ => Ok(-1),
        }
    }

    /// Smallest supported scale.
    pub fn min_decimal_digits(&self, native: NativeType) -> Option<i16> {
        match native {
            NativeType::Numeric => Some(0),
            n if is_fixed_scale(n) => Some(0),
            _ => None,
        }
    }

    /// Largest supported scale.
    pub fn max_decimal_digits(&self, native: NativeType) -> Option<i16> {
        match native {
            NativeType::Numeric => Some(NUMERIC_DEFAULT_SCALE as i16),
            n if is_fixed_scale(n) => Some(0),
            _ => None,
        }
    }

    /// Digits right of the decimal point.
    pub fn decimal_digits(&self, native: NativeType, col: Option<usize>) -> Option<i16> {
        match native {
            NativeType::Numeric => Some(self.numeric_shape(col).1 as i16),
            n if is_fixed_scale(n) => Some(0),
            _ => None,
        }
    }
}

/// Types whose scale is always zero.
fn is_fixed_scale(native: NativeType) -> bool {
    matches!(
        native,
        NativeType::Int2
            | NativeType::Oid
            | NativeType::Xid
            | NativeType::Int4
            | NativeType::Int8
            | NativeType::Float4
            | NativeType::Float8
            | NativeType::Money
            | NativeType::Bool
            | NativeType::DateTime
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorSink;
    use crate::settings::ConnectionSettings;
    use crate::types::{ResultMetadata, SqlType};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        reports: RefCell<Vec<(ErrorCode, String)>>,
    }

    impl ErrorSink for RecordingSink {
        fn report(&self, code: ErrorCode, message: &str) {
            self.reports.borrow_mut().push((code, message.to_string()));
        }
    }

    const MAX: UnknownSizePolicy = UnknownSizePolicy::Max;

    #[test]
    fn test_fixed_sizes() {
        let settings = ConnectionSettings::new();
        let m = TypeMapper::new(&settings);
        assert_eq!(m.column_size(NativeType::Int2, None, MAX).unwrap(), 5);
        assert_eq!(m.column_size(NativeType::Oid, None, MAX).unwrap(), 10);
        assert_eq!(m.column_size(NativeType::Int8, None, MAX).unwrap(), 19);
        assert_eq!(m.column_size(NativeType::Float8, None, MAX).unwrap(), 15);
        assert_eq!(m.column_size(NativeType::DateTime, None, MAX).unwrap(), 28);
        assert_eq!(m.column_size(NativeType::Char8, None, MAX).unwrap(), 8);
        assert_eq!(m.column_size(NativeType::Bool, None, MAX).unwrap(), 1);
        assert_eq!(m.column_size(NativeType::LargeObject, None, MAX).unwrap(), SQL_NO_TOTAL);
        assert_eq!(m.display_size(NativeType::Int4, None, MAX).unwrap(), 11);
        assert_eq!(m.display_size(NativeType::Date, None, MAX).unwrap(), 10);
        assert_eq!(m.buffer_length(NativeType::DateTime, None, MAX).unwrap(), 16);
        assert_eq!(m.buffer_length(NativeType::Int8, None, MAX).unwrap(), 8);
        assert_eq!(m.desc_length(NativeType::Int8, None, MAX).unwrap(), 20);

        let settings = ConnectionSettings::new()
            .with_true_is_minus1(true)
            .with_lacks_native_int64(true)
            .with_bytea_as_longvarbinary(true);
        let m = TypeMapper::new(&settings);
        assert_eq!(m.column_size(NativeType::Bool, None, MAX).unwrap(), 2);
        assert_eq!(m.buffer_length(NativeType::Int8, None, MAX).unwrap(), 20);
        assert_eq!(m.column_size(NativeType::Bytea, None, MAX).unwrap(), SQL_NO_TOTAL);
        assert_eq!(
            m.transfer_octet_length(NativeType::Bytea, None, MAX).unwrap(),
            SQL_NO_TOTAL
        );
    }

    #[test]
    fn test_numeric_defaults() {
        let settings = ConnectionSettings::new();
        let m = TypeMapper::new(&settings);
        assert_eq!(m.column_size(NativeType::Numeric, None, MAX).unwrap(), 28);
        assert_eq!(m.decimal_digits(NativeType::Numeric, None), Some(6));
        assert_eq!(m.display_size(NativeType::Numeric, None, MAX).unwrap(), 30);
        assert_eq!(m.precision(NativeType::Numeric, None), Some(28));
        assert_eq!(m.precision(NativeType::Int4, None), None);
        assert_eq!(m.scale(NativeType::Float8, None), None);

        // Index without any result set
        assert_eq!(m.column_size(NativeType::Numeric, Some(3), MAX).unwrap(), 28);
    }

    #[test]
    fn test_numeric_from_modifier_ignores_display() {
        let settings = ConnectionSettings::new();
        let result = ResultMetadata::live(vec![FieldMetadata::new("amount")
            .with_type_modifier((10 << 16) | 2)
            .with_display_size(40)]);
        let m = TypeMapper::new(&settings).with_result(&result);
        assert_eq!(m.column_size(NativeType::Numeric, Some(0), MAX).unwrap(), 10);
        assert_eq!(m.decimal_digits(NativeType::Numeric, Some(0)), Some(2));
        assert_eq!(m.scale(NativeType::Numeric, Some(0)), Some(2));
        assert_eq!(m.buffer_length(NativeType::Numeric, Some(0), MAX).unwrap(), 12);
    }

    #[test]
    fn test_numeric_from_catalog_and_display() {
        let settings = ConnectionSettings::new();
        let catalog = ResultMetadata::catalog(vec![
            FieldMetadata::new("a").with_field_size(8),
            FieldMetadata::new("b"),
        ]);
        let m = TypeMapper::new(&settings).with_result(&catalog);
        assert_eq!(m.column_size(NativeType::Numeric, Some(0), MAX).unwrap(), 16);
        assert_eq!(m.decimal_digits(NativeType::Numeric, Some(0)), Some(8));
        assert_eq!(m.column_size(NativeType::Numeric, Some(1), MAX).unwrap(), 28);

        let live = ResultMetadata::live(vec![
            FieldMetadata::new("a").with_display_size(3),
            FieldMetadata::new("b").with_display_size(12),
            FieldMetadata::new("c").with_display_size(0),
        ]);
        let m = TypeMapper::new(&settings).with_result(&live);
        assert_eq!(m.column_size(NativeType::Numeric, Some(0), MAX).unwrap(), 10);
        assert_eq!(m.decimal_digits(NativeType::Numeric, Some(0)), Some(5));
        assert_eq!(m.column_size(NativeType::Numeric, Some(1), MAX).unwrap(), 24);
        assert_eq!(m.decimal_digits(NativeType::Numeric, Some(1)), Some(12));
        assert_eq!(m.column_size(NativeType::Numeric, Some(2), MAX).unwrap(), 28);
    }

    #[test]
    fn test_char_size_policies() {
        let settings = ConnectionSettings::new();
        let result = ResultMetadata::live(vec![
            FieldMetadata::new("empty"),
            FieldMetadata::new("observed").with_display_size(300),
            FieldMetadata::new("short").with_display_size(17),
            FieldMetadata::new("declared").with_type_modifier(64).with_display_size(12),
        ]);
        let m = TypeMapper::new(&settings).with_result(&result);
        let unknown = NativeType::Other(4242);
        let size = |col, policy| m.column_size(unknown, Some(col), policy).unwrap();

        assert_eq!(size(0, UnknownSizePolicy::Max), 255);
        assert_eq!(size(0, UnknownSizePolicy::DontKnow), UNKNOWN_SIZE);
        assert_eq!(size(0, UnknownSizePolicy::Longest), 255);

        assert_eq!(size(1, UnknownSizePolicy::Max), 300);
        assert_eq!(size(2, UnknownSizePolicy::Max), 255);
        assert_eq!(size(2, UnknownSizePolicy::Longest), 17);
        assert_eq!(size(2, UnknownSizePolicy::DontKnow), UNKNOWN_SIZE);

        assert_eq!(size(3, UnknownSizePolicy::DontKnow), 64);

        // Static queries and columns with no metadata use the maximum
        assert_eq!(m.column_size(NativeType::Text, None, UnknownSizePolicy::DontKnow).unwrap(), 255);
        assert_eq!(size(9, UnknownSizePolicy::DontKnow), 255);
    }

    #[test]
    fn test_declared_char_types_ignore_policy() {
        let settings = ConnectionSettings::new();
        let result = ResultMetadata::live(vec![
            FieldMetadata::new("empty"),
            FieldMetadata::new("observed").with_display_size(300),
            FieldMetadata::new("truncated").with_type_modifier(20).with_display_size(40),
            FieldMetadata::new("short").with_display_size(17),
        ]);
        let m = TypeMapper::new(&settings).with_result(&result);
        let size = |native, col, policy| m.column_size(native, Some(col), policy).unwrap();

        for policy in [MAX, UnknownSizePolicy::Longest, UnknownSizePolicy::DontKnow] {
            assert_eq!(size(NativeType::Varchar, 0, policy), 255);
            assert_eq!(size(NativeType::Varchar, 1, policy), 255);
            assert_eq!(size(NativeType::Text, 1, policy), 255);
            assert_eq!(size(NativeType::Bpchar, 0, policy), 255);
            assert_eq!(size(NativeType::Bpchar, 3, policy), 17);
        }

        // A declared length wins over a longer observed value
        assert_eq!(size(NativeType::Varchar, 2, MAX), 20);
        assert_eq!(size(NativeType::Bpchar, 2, MAX), 20);
        // Text has no declared length, so it falls back to the maximum
        assert_eq!(size(NativeType::Text, 2, UnknownSizePolicy::DontKnow), 255);

        // Wide observed values do not promote an undeclared varchar
        assert_eq!(m.concise_type(NativeType::Varchar, Some(1)), SqlType::VarChar);
        assert_eq!(m.concise_type(NativeType::Bpchar, Some(1)), SqlType::LongVarChar);
    }

    #[test]
    fn test_char_size_manual_and_catalog() {
        let settings = ConnectionSettings::new();
        let result = ResultMetadata::catalog(vec![
            FieldMetadata::new("table_name").with_field_size(128),
            FieldMetadata::new("remarks").with_display_size(500),
        ]);
        let m = TypeMapper::new(&settings).with_result(&result);
        assert_eq!(m.column_size(NativeType::Varchar, Some(0), MAX).unwrap(), 128);
        assert_eq!(
            m.column_size(NativeType::Varchar, Some(1), UnknownSizePolicy::DontKnow).unwrap(),
            255
        );
    }

    #[test]
    fn test_unknown_oid_sized_as_character() {
        let settings = ConnectionSettings::new();
        let m = TypeMapper::new(&settings);
        assert_eq!(m.column_size(NativeType::Other(4242), None, MAX).unwrap(), 255);
        assert_eq!(m.transfer_octet_length(NativeType::Other(4242), None, MAX).unwrap(), -1);
    }

    #[test]
    fn test_octet_lengths() {
        let result = ResultMetadata::live(vec![
            FieldMetadata::new("a").with_type_modifier(150),
            FieldMetadata::new("b").with_type_modifier(300),
            FieldMetadata::new("c"),
        ]);

        let plain = ConnectionSettings::new();
        let m = TypeMapper::new(&plain).with_result(&result);
        assert_eq!(m.buffer_length(NativeType::Varchar, Some(0), MAX).unwrap(), 150);

        let lf = ConnectionSettings::new().with_lf_conversion(true);
        let m = TypeMapper::new(&lf).with_result(&result);
        // 150 * 2 crosses the varchar limit: capped
        assert_eq!(m.buffer_length(NativeType::Varchar, Some(0), MAX).unwrap(), 255);
        assert_eq!(m.buffer_length(NativeType::Varchar, Some(1), MAX).unwrap(), 600);
        assert_eq!(m.transfer_octet_length(NativeType::Text, Some(1), MAX).unwrap(), 600);

        let mb = ConnectionSettings::new().with_mb_max_bytes_per_char(3);
        let m = TypeMapper::new(&mb).with_result(&result);
        assert_eq!(m.buffer_length(NativeType::Bpchar, Some(1), MAX).unwrap(), 900);

        let wide = ConnectionSettings::new().with_wide_chars(true);
        let m = TypeMapper::new(&wide).with_result(&result);
        assert_eq!(m.buffer_length(NativeType::Varchar, Some(0), MAX).unwrap(), 300);

        // Unknown sizes are not scaled
        let m = TypeMapper::new(&lf).with_result(&result);
        assert_eq!(
            m.buffer_length(NativeType::Other(4242), Some(2), UnknownSizePolicy::DontKnow)
                .unwrap(),
            UNKNOWN_SIZE
        );
        assert_eq!(
            m.transfer_octet_length(NativeType::Varchar, Some(2), UnknownSizePolicy::DontKnow)
                .unwrap(),
            255
        );
    }

    #[test]
    fn test_name_column_size_is_reported() {
        let settings = ConnectionSettings::new();
        let sink = RecordingSink::default();
        let m = TypeMapper::new(&settings).with_error_sink(&sink);

        let err = m.column_size(NativeType::Name, None, MAX).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Internal);
        assert!(m.display_size(NativeType::Name, None, MAX).is_err());

        let reports = sink.reports.borrow();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].0, ErrorCode::Internal);
        assert_eq!(reports[0].1, "column size not implemented for name");
    }

    #[test]
    fn test_decimal_digit_bounds() {
        let settings = ConnectionSettings::new();
        let m = TypeMapper::new(&settings);
        assert_eq!(m.min_decimal_digits(NativeType::Numeric), Some(0));
        assert_eq!(m.max_decimal_digits(NativeType::Numeric), Some(6));
        assert_eq!(m.max_decimal_digits(NativeType::Bool), Some(0));
        assert_eq!(m.decimal_digits(NativeType::DateTime, None), Some(0));
        assert_eq!(m.decimal_digits(NativeType::Date, None), None);
        assert_eq!(m.min_decimal_digits(NativeType::Varchar), None);
    }
}
