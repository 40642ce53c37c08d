//! Primitive encoding/decoding for score records.
//!
//! Implements bounded byte reads and fixed-width big-endian integers.

use crate::error::{CodecError, EncodeError};

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the total length of the underlying data.
    pub fn total_len(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, CodecError> {
        let byte = *self.data.get(self.pos).ok_or(CodecError::UnexpectedEof {
            context,
            needed: 1,
            available: 0,
        })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], CodecError> {
        if n > self.remaining_len() {
            return Err(CodecError::UnexpectedEof {
                context,
                needed: n,
                available: self.remaining_len(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads a big-endian integer of `length` bytes.
    ///
    /// Signed integers are read as two's complement. `length` must not
    /// exceed 8 bytes.
    #[inline]
    pub fn read_int_be(
        &mut self,
        length: usize,
        signed: bool,
        context: &'static str,
    ) -> Result<i128, CodecError> {
        let bytes = self.read_bytes(length, context)?;
        let unsigned = bytes
            .iter()
            .fold(0u128, |acc, &b| (acc << 8) | u128::from(b));

        let bits = 8 * length as u32;
        let value = unsigned as i128;
        if signed && length > 0 && (unsigned >> (bits - 1)) & 1 == 1 {
            Ok(value - (1i128 << bits))
        } else {
            Ok(value)
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes `value` as a big-endian integer of `length` bytes.
    ///
    /// Signed integers are written as two's complement. Fails without
    /// writing anything if `value` is outside the range of the field.
    #[inline]
    pub fn write_int_be(
        &mut self,
        value: i128,
        length: usize,
        signed: bool,
    ) -> Result<(), EncodeError> {
        if !int_fits(value, length, signed) {
            return Err(EncodeError::IntOverflow {
                value,
                length,
                signed,
            });
        }
        let bytes = value.to_be_bytes();
        self.buf.extend_from_slice(&bytes[bytes.len() - length..]);
        Ok(())
    }
}

/// Returns true if `value` is representable in `length` bytes.
fn int_fits(value: i128, length: usize, signed: bool) -> bool {
    match length {
        0 => value == 0,
        1..=15 => {
            let bits = 8 * length as u32;
            if signed {
                let half = 1i128 << (bits - 1);
                (-half..half).contains(&value)
            } else {
                (0..1i128 << bits).contains(&value)
            }
        }
        16 => signed || value >= 0,
        _ => false,
    }
}

impl From<Writer> for Vec<u8> {
    fn from(writer: Writer) -> Self {
        writer.into_bytes()
    }
}
