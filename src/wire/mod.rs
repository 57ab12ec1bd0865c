//! Self-describing, aligned, little-endian wire marshalling.
//!
//! This is the value layer of the message bus the driver talks to: every
//! value carries (or is described by) a type signature, and every value is
//! aligned to its natural boundary relative to the start of the message.

mod buffer;
mod signature;
mod value;

pub use buffer::{padding_for, wire_length, ReadBuffer, WriteBuffer};
pub use signature::{
    parse_signatures, signature_string, Signature, MAX_NESTING_DEPTH, MAX_SIGNATURE_LENGTH,
};
pub use value::WireValue;
