//! Per-connection display preferences consumed by the type mapper.
//!
//! A `ConnectionSettings` value is an immutable snapshot: the statement
//! layer clones it when a statement is prepared and passes it by reference
//! into every mapper call for that statement's lifetime.

use crate::error::{Error, Result};
use crate::types::SqlType;

/// How 64-bit integer columns are surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Int8As {
    /// Use BIGINT unless the environment lacks native 64-bit integers.
    #[default]
    Default,
    /// Always BIGINT.
    BigInt,
    /// NUMERIC (decimal string).
    Numeric,
    /// VARCHAR.
    VarChar,
}

impl Int8As {
    /// SQL type forced by this preference, if any.
    pub fn sql_type(self) -> Option<SqlType> {
        match self {
            Int8As::Default => None,
            Int8As::BigInt => Some(SqlType::BigInt),
            Int8As::Numeric => Some(SqlType::Numeric),
            Int8As::VarChar => Some(SqlType::VarChar),
        }
    }
}

/// Revision of the standard the calling application expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OdbcVersion {
    /// 2.x: old-style DATE/TIME/TIMESTAMP codes.
    V2,
    /// 3.x: typed DATE/TIME/TIMESTAMP codes.
    #[default]
    V3,
}

/// Connection-scoped settings read by the mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Report wide-character SQL/C types.
    pub wide_chars: bool,
    /// 64-bit integer display preference.
    pub int8_as: Int8As,
    /// Convert LF to CR/LF on fetch (doubles narrow character octet lengths).
    pub lf_conversion: bool,
    /// Maximum bytes per character of the client encoding.
    pub mb_max_bytes_per_char: i32,
    /// The consuming environment cannot hold 64-bit integers.
    pub lacks_native_int64: bool,
    /// Booleans are encoded as -1/0 rather than 1/0.
    pub true_is_minus1: bool,
    /// Report bytea as LONGVARBINARY instead of VARBINARY.
    pub bytea_as_longvarbinary: bool,
    /// Standard revision the application expects.
    pub odbc_version: OdbcVersion,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionSettings {
    /// Create settings with driver defaults.
    pub fn new() -> Self {
        Self {
            wide_chars: false,
            int8_as: Int8As::Default,
            lf_conversion: false,
            mb_max_bytes_per_char: 1,
            lacks_native_int64: false,
            true_is_minus1: false,
            bytea_as_longvarbinary: false,
            odbc_version: OdbcVersion::V3,
        }
    }

    /// Enable or disable wide-character types.
    pub fn with_wide_chars(mut self, enabled: bool) -> Self {
        self.wide_chars = enabled;
        self
    }

    /// Set the 64-bit integer display preference.
    pub fn with_int8_as(mut self, int8_as: Int8As) -> Self {
        self.int8_as = int8_as;
        self
    }

    /// Enable or disable LF to CR/LF conversion.
    pub fn with_lf_conversion(mut self, enabled: bool) -> Self {
        self.lf_conversion = enabled;
        self
    }

    /// Set the maximum bytes per character of the client encoding.
    pub fn with_mb_max_bytes_per_char(mut self, n: i32) -> Self {
        self.mb_max_bytes_per_char = n;
        self
    }

    /// Mark the environment as lacking native 64-bit integers.
    pub fn with_lacks_native_int64(mut self, lacks: bool) -> Self {
        self.lacks_native_int64 = lacks;
        self
    }

    /// Encode booleans as -1/0.
    pub fn with_true_is_minus1(mut self, enabled: bool) -> Self {
        self.true_is_minus1 = enabled;
        self
    }

    /// Report bytea as LONGVARBINARY.
    pub fn with_bytea_as_longvarbinary(mut self, enabled: bool) -> Self {
        self.bytea_as_longvarbinary = enabled;
        self
    }

    /// Set the expected standard revision.
    pub fn with_odbc_version(mut self, version: OdbcVersion) -> Self {
        self.odbc_version = version;
        self
    }

    /// Whether the application expects 3.x type codes.
    pub fn is_odbc3(&self) -> bool {
        self.odbc_version == OdbcVersion::V3
    }

    /// Parse a connection-string fragment like `WideChars=1;Int8As=numeric`.
    ///
    /// Keys are case-insensitive and empty segments are ignored. Unknown
    /// keys are rejected.
    pub fn parse(conn_str: &str) -> Result<Self> {
        let mut settings = Self::new();

        for segment in conn_str.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| invalid(segment, ""))?;
            let key = key.trim();
            let value = value.trim();

            match key.to_ascii_lowercase().as_str() {
                "widechars" => settings.wide_chars = parse_bool(key, value)?,
                "int8as" => {
                    settings.int8_as = match value.to_ascii_lowercase().as_str() {
                        "" | "0" | "default" => Int8As::Default,
                        "bigint" | "-5" => Int8As::BigInt,
                        "numeric" | "2" => Int8As::Numeric,
                        "varchar" | "string" | "12" => Int8As::VarChar,
                        _ => return Err(invalid(key, value)),
                    }
                }
                "lfconversion" => settings.lf_conversion = parse_bool(key, value)?,
                "maxbytesperchar" => {
                    settings.mb_max_bytes_per_char = value
                        .parse::<i32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| invalid(key, value))?
                }
                "lacksint64" => settings.lacks_native_int64 = parse_bool(key, value)?,
                "trueisminus1" => settings.true_is_minus1 = parse_bool(key, value)?,
                "byteaaslongvarbinary" => {
                    settings.bytea_as_longvarbinary = parse_bool(key, value)?
                }
                "odbcversion" => {
                    settings.odbc_version = match value {
                        "2" | "2.0" | "2.x" => OdbcVersion::V2,
                        "3" | "3.0" | "3.x" => OdbcVersion::V3,
                        _ => return Err(invalid(key, value)),
                    }
                }
                _ => return Err(invalid(key, value)),
            }
        }

        Ok(settings)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &str, value: &str) -> Error {
    Error::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
    }
}
