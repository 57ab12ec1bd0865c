//! Recordset encoding: columnar tables to and from the self-describing
//! `a(ssy)vaay` message.

mod chunk;
mod codec;
mod envelope;
mod table;

pub use chunk::DEFAULT_CHUNK_LIMIT;
pub use codec::{cell_to_wire, wire_to_cell, RecordsetCodec};
pub use envelope::{NullityMode, WireColumnHeader, WireEnvelope, ENVELOPE_SIGNATURE};
pub use table::{Row, Table};
