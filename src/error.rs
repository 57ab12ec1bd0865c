//! Error types for type mapping and recordset framing.

use std::fmt;
use std::panic::Location;
use thiserror::Error;

/// Result type alias for mapper and codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable error codes handed to the statement layer.
///
/// The statement layer translates these into its own diagnostic records;
/// the numeric values never change between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Internal driver error (structurally undefined facet query).
    Internal,
    /// Malformed or inconsistent wire envelope.
    Framing,
    /// Caller supplied an invalid argument or setting.
    InvalidArgument,
    /// A cell could not be converted to the requested representation.
    TypeConversion,
}

impl ErrorCode {
    /// Numeric value of the code.
    pub fn as_i32(self) -> i32 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::Framing => 2,
            ErrorCode::InvalidArgument => 3,
            ErrorCode::TypeConversion => 4,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Internal => write!(f, "internal error"),
            ErrorCode::Framing => write!(f, "framing error"),
            ErrorCode::InvalidArgument => write!(f, "invalid argument"),
            ErrorCode::TypeConversion => write!(f, "type conversion error"),
        }
    }
}

/// Error type for mapper and codec operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A facet was requested that is undefined for the native type.
    #[error("{operation} not implemented for {type_name}")]
    UnsupportedOperation {
        operation: &'static str,
        type_name: &'static str,
    },

    /// Structural mismatch in a received envelope.
    #[error("Framing error: {message}")]
    Framing { message: String },

    /// Signature string could not be parsed.
    #[error("Invalid signature '{signature}': {message}")]
    InvalidSignature { signature: String, message: String },

    /// Buffer too small.
    #[error("Buffer too small: need {needed} bytes, have {available} filed at {location}")]
    BufferTooSmall {
        needed: usize,
        available: usize,
        location: &'static Location<'static>,
    },

    /// Columns of a table have different lengths.
    #[error("Column {column} has {actual} values, expected {expected}")]
    UnevenColumns {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Type conversion error.
    #[error("Type conversion error: {message}")]
    TypeConversion { message: String },

    /// Unknown key or unparsable value in a settings string.
    #[error("Invalid setting {key}={value}")]
    InvalidSetting { key: String, value: String },
}

impl Error {
    /// Create a framing error.
    pub fn framing(message: impl Into<String>) -> Self {
        Self::Framing {
            message: message.into(),
        }
    }

    /// Create an invalid signature error.
    pub fn invalid_signature(signature: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSignature {
            signature: signature.into(),
            message: message.into(),
        }
    }

    /// Create a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion {
            message: message.into(),
        }
    }

    /// Stable code for the statement layer.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::UnsupportedOperation { .. } => ErrorCode::Internal,
            Error::Framing { .. }
            | Error::InvalidSignature { .. }
            | Error::BufferTooSmall { .. } => ErrorCode::Framing,
            Error::UnevenColumns { .. } | Error::InvalidSetting { .. } => {
                ErrorCode::InvalidArgument
            }
            Error::TypeConversion { .. } => ErrorCode::TypeConversion,
        }
    }

    /// Whether this error invalidates a single decoded response.
    pub fn is_framing(&self) -> bool {
        self.code() == ErrorCode::Framing
    }
}

/// Statement/connection error reporting sink.
///
/// The mapper delivers its one hard failure (an undefined facet query)
/// through this sink in addition to returning it.
pub trait ErrorSink {
    /// Record an error against the current statement.
    fn report(&self, code: ErrorCode, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let err = Error::UnsupportedOperation {
            operation: "column size",
            type_name: "name",
        };
        assert_eq!(err.code(), ErrorCode::Internal);
        assert_eq!(err.to_string(), "column size not implemented for name");

        assert!(Error::framing("arity").is_framing());
        assert!(Error::invalid_signature("(", "unterminated struct").is_framing());
        assert!(!Error::type_conversion("bad").is_framing());
    }

    #[test]
    fn test_code_values_are_stable() {
        assert_eq!(ErrorCode::Internal.as_i32(), 1);
        assert_eq!(ErrorCode::Framing.as_i32(), 2);
        assert_eq!(format!("{}", ErrorCode::Internal), "internal error");
    }
}
