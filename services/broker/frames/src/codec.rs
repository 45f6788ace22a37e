//! Wire primitives shared by every frame codec.
//!
//! Integers are big-endian. Lengths and counts are unsigned LEB128 varints,
//! so encoding never has to reject an oversized field.

use crate::error::{FrameError, Result};
use broker_common::{Id, ID_SIZE};
use bytes::{Buf, BufMut, BytesMut};

/// Longest valid varint for a `u64`
pub const MAX_VARINT_LEN: usize = 10;

/// Append `value` as an unsigned LEB128 varint
pub fn put_varint(buf: &mut BytesMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Number of bytes `put_varint` writes for `value`
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

/// Append a varint length prefix followed by the UTF-8 bytes of `value`
pub fn put_str(buf: &mut BytesMut, value: &str) {
    put_varint(buf, value.len() as u64);
    buf.put_slice(value.as_bytes());
}

/// Encoded size of a length-prefixed string
pub fn str_len(value: &str) -> usize {
    varint_len(value.len() as u64) + value.len()
}

/// Forward-only reader over a borrowed frame buffer.
///
/// Every read checks the remaining length first; short input surfaces as an
/// error, never a panic.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    /// Read from the start of `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Read from `offset` into `buf`
    pub fn at(buf: &'a [u8], offset: usize) -> Result<Self> {
        let mut reader = Self::new(buf);
        reader.skip(offset)?;
        Ok(reader)
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.buf.len() < needed {
            return Err(FrameError::truncated(needed, self.buf.len()));
        }
        Ok(())
    }

    /// Advance past `n` bytes
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.buf.advance(n);
        Ok(())
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    /// Read a big-endian `u16`
    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.buf.get_u16())
    }

    /// Read a big-endian `i64`
    pub fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        Ok(self.buf.get_i64())
    }

    /// Read a 16-byte identifier
    pub fn read_id(&mut self) -> Result<Id> {
        self.ensure(ID_SIZE)?;
        let high = self.buf.get_u64();
        let low = self.buf.get_u64();
        Ok(Id::from_parts(high, low))
    }

    /// Read an unsigned LEB128 varint
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut value = 0u64;
        for idx in 0..MAX_VARINT_LEN {
            let byte = self.read_u8()?;
            let payload = u64::from(byte & 0x7F);
            if idx == MAX_VARINT_LEN - 1 && payload > 1 {
                return Err(FrameError::invalid_encoding("varint overflows u64"));
            }
            value |= payload << (7 * idx);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(FrameError::invalid_encoding("varint longer than 10 bytes"))
    }

    fn read_len(&mut self) -> Result<usize> {
        let len = self.read_varint()?;
        match usize::try_from(len) {
            Ok(len) if len <= self.buf.len() => Ok(len),
            _ => Err(FrameError::invalid_encoding(format!(
                "declared length {len} exceeds {} remaining bytes",
                self.buf.len()
            ))),
        }
    }

    /// Read a length-prefixed UTF-8 string without copying it
    pub fn read_str(&mut self) -> Result<&'a str> {
        let len = self.read_len()?;
        let (head, rest) = self.buf.split_at(len);
        let value = std::str::from_utf8(head)
            .map_err(|e| FrameError::invalid_encoding(format!("string is not UTF-8: {e}")))?;
        self.buf = rest;
        Ok(value)
    }

    /// Advance past a length-prefixed string without validating its bytes
    pub fn skip_str(&mut self) -> Result<()> {
        let len = self.read_len()?;
        self.buf.advance(len);
        Ok(())
    }
}
