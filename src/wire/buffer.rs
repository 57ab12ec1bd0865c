//! Buffer utilities for reading and writing aligned little-endian wire data.
//!
//! Alignment padding is computed relative to the start of the buffer, so a
//! message must always be marshalled into (and read from) a buffer of its
//! own.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};

/// Number of padding bytes needed to move `pos` to a multiple of `align`.
pub fn padding_for(pos: usize, align: usize) -> usize {
    if align <= 1 {
        return 0;
    }
    (align - pos % align) % align
}

/// Length prefix for `len` bytes of `what`; the wire caps lengths at u32.
pub fn wire_length(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| Error::framing(format!("{} of {} bytes exceeds 4 GiB", what, len)))
}

/// A buffer for reading wire data.
pub struct ReadBuffer {
    data: Bytes,
    pos: usize,
}

impl ReadBuffer {
    /// Create a new read buffer from bytes.
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// Get the current position in the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the remaining bytes in the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if the buffer has at least `n` bytes remaining.
    pub fn has_remaining(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    #[track_caller]
    fn ensure(&self, n: usize) -> Result<()> {
        if !self.has_remaining(n) {
            return Err(Error::BufferTooSmall {
                needed: n,
                available: self.remaining(),
                location: std::panic::Location::caller(),
            });
        }
        Ok(())
    }

    /// Skip padding up to the next multiple of `align`.
    ///
    /// Padding bytes must be zero.
    pub fn align(&mut self, align: usize) -> Result<()> {
        let pad = padding_for(self.pos, align);
        self.ensure(pad)?;
        if self.data[self.pos..self.pos + pad].iter().any(|&b| b != 0) {
            return Err(Error::framing(format!(
                "non-zero alignment padding at offset {}",
                self.pos
            )));
        }
        self.pos += pad;
        Ok(())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let val = self.data[self.pos];
        self.pos += 1;
        Ok(val)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.align(N)?;
        self.ensure(N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(bytes)
    }

    /// Read an aligned little-endian i16.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    /// Read an aligned little-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read an aligned little-endian i32.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Read an aligned little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read an aligned little-endian i64.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Read an aligned little-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read an aligned little-endian IEEE 754 double.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Read a boolean (u32 that must be 0 or 1).
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::framing(format!("invalid boolean value {}", other))),
        }
    }

    /// Read raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Bytes> {
        self.ensure(n)?;
        let bytes = self.data.slice(self.pos..self.pos + n);
        self.pos += n;
        Ok(bytes)
    }

    fn read_nul_terminated(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        if self.read_u8()? != 0 {
            return Err(Error::framing("string not NUL-terminated"));
        }
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::framing(format!("string is not valid UTF-8: {}", e)))
    }

    /// Read a string: u32 length, bytes, NUL.
    pub fn read_str(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        self.read_nul_terminated(len)
    }

    /// Read a signature string: u8 length, bytes, NUL.
    pub fn read_signature_str(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        self.read_nul_terminated(len)
    }
}

/// A buffer for writing wire data.
pub struct WriteBuffer {
    data: BytesMut,
}

impl WriteBuffer {
    /// Create a new write buffer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(8192)
    }

    /// Create a new write buffer with specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
        }
    }

    /// Get the current length of the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the buffer contents as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Freeze the buffer into immutable bytes.
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    /// Write zero padding up to the next multiple of `align`.
    pub fn align(&mut self, align: usize) {
        let pad = padding_for(self.data.len(), align);
        self.data.put_bytes(0, pad);
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, val: u8) {
        self.data.put_u8(val);
    }

    /// Write an aligned little-endian i16.
    pub fn write_i16(&mut self, val: i16) {
        self.align(2);
        self.data.put_i16_le(val);
    }

    /// Write an aligned little-endian u16.
    pub fn write_u16(&mut self, val: u16) {
        self.align(2);
        self.data.put_u16_le(val);
    }

    /// Write an aligned little-endian i32.
    pub fn write_i32(&mut self, val: i32) {
        self.align(4);
        self.data.put_i32_le(val);
    }

    /// Write an aligned little-endian u32.
    pub fn write_u32(&mut self, val: u32) {
        self.align(4);
        self.data.put_u32_le(val);
    }

    /// Write an aligned little-endian i64.
    pub fn write_i64(&mut self, val: i64) {
        self.align(8);
        self.data.put_i64_le(val);
    }

    /// Write an aligned little-endian u64.
    pub fn write_u64(&mut self, val: u64) {
        self.align(8);
        self.data.put_u64_le(val);
    }

    /// Write an aligned little-endian IEEE 754 double.
    pub fn write_f64(&mut self, val: f64) {
        self.align(8);
        self.data.put_f64_le(val);
    }

    /// Write a boolean as u32 0/1.
    pub fn write_bool(&mut self, val: bool) {
        self.write_u32(u32::from(val));
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write a string: u32 length, bytes, NUL.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_u32(wire_length(s.len(), "string")?);
        self.write_bytes(s.as_bytes());
        self.write_u8(0);
        Ok(())
    }

    /// Write a signature string: u8 length, bytes, NUL.
    pub fn write_signature_str(&mut self, s: &str) -> Result<()> {
        let len = u8::try_from(s.len())
            .map_err(|_| Error::invalid_signature(s, "signature too long"))?;
        self.write_u8(len);
        self.write_bytes(s.as_bytes());
        self.write_u8(0);
        Ok(())
    }

    /// Reserve an aligned u32 slot and return its position.
    pub fn reserve_u32(&mut self) -> usize {
        self.align(4);
        let pos = self.data.len();
        self.data.put_u32_le(0);
        pos
    }

    /// Set a u32 value at a specific position (little-endian).
    pub fn set_u32(&mut self, pos: usize, val: u32) {
        self.data[pos..pos + 4].copy_from_slice(&val.to_le_bytes());
    }
}

impl Default for WriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}
