//! Type mapping and recordset wire encoding for an ODBC-style driver.
//!
//! The crate sits between a statement layer and a message-bus transport:
//!
//! - [`typemap`] turns native catalog types into SQL types, host buffer
//!   types and every descriptive column facet.
//! - [`recordset`] encodes columnar tables into the self-describing
//!   `a(ssy)vaay` message and decodes replies back into tables.
//! - [`describe`] builds column descriptions and the type-info catalog.
//!
//! # Example
//!
//! ```
//! use odbc_wire_rs::{Column, ConnectionSettings, NativeType, RecordsetCodec, Result, Table};
//!
//! fn main() -> Result<()> {
//!     let settings = ConnectionSettings::new();
//!     let table = Table::new(vec![
//!         (Column::new("name", NativeType::Varchar, true), vec!["a".into(), "bb".into()]),
//!         (Column::new("n", NativeType::Int4, false), vec![1.into(), 2.into()]),
//!     ])?;
//!
//!     let codec = RecordsetCodec::new(&settings);
//!     let bytes = codec.encode(&table)?;
//!     let back = codec.decode(bytes)?;
//!     assert_eq!(back.row_count(), 2);
//!     Ok(())
//! }
//! ```

pub mod describe;
pub mod error;
pub mod recordset;
pub mod settings;
pub mod typemap;
pub mod types;
pub mod wire;

// Re-export main types
pub use describe::{describe_column, type_info, ColumnDescription, TypeInfoRow};
pub use error::{Error, ErrorCode, ErrorSink, Result};
pub use recordset::{NullityMode, RecordsetCodec, Row, Table, WireEnvelope, DEFAULT_CHUNK_LIMIT};
pub use settings::{ConnectionSettings, Int8As, OdbcVersion};
pub use typemap::TypeMapper;
pub use types::{
    CType, Cell, Column, ColumnFacets, NativeType, ResultMetadata, SqlType, UnknownSizePolicy,
};
pub use wire::Signature;
