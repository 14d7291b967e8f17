//! Bounds-checked little-endian reads over an in-memory buffer.
//!
//! Every read either returns the requested bytes or fails with
//! [`TnefError::Truncated`]; nothing is ever read past the end of the slice.

use byteorder::{ByteOrder, LittleEndian};
use uuid::Uuid;

use crate::error::{Result, TnefError};

/// A cursor over an immutable byte slice.
///
/// Offers two styles of access:
/// - positional reads ([`read_uint`](Self::read_uint), [`read_slice`](Self::read_slice))
///   that take an absolute offset and leave the position untouched, and
/// - sequential reads (`u8`, `u16`, `u32`, `take`, ...) that advance on success.
#[derive(Clone, Copy, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Create a cursor positioned at `pos`. A position past the end is allowed
    /// and simply reports [`is_at_end`](Self::is_at_end).
    pub fn with_pos(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Return `length` raw bytes at `offset`.
    pub fn read_slice(&self, offset: usize, length: usize, what: &'static str) -> Result<&'a [u8]> {
        let end = offset
            .checked_add(length)
            .ok_or_else(|| TnefError::truncated(what, offset, length, self.buf.len()))?;
        self.buf
            .get(offset..end)
            .ok_or_else(|| TnefError::truncated(what, offset, length, self.buf.len()))
    }

    /// Interpret `length` bytes at `offset` as an unsigned little-endian integer.
    ///
    /// Supported widths are 1, 2, 4, 8 and 16 bytes.
    pub fn read_uint(&self, offset: usize, length: usize, what: &'static str) -> Result<u128> {
        if !matches!(length, 1 | 2 | 4 | 8 | 16) {
            return Err(TnefError::InvalidWidth { width: length });
        }
        let bytes = self.read_slice(offset, length, what)?;
        Ok(LittleEndian::read_uint128(bytes, length))
    }

    /// Read `len` bytes and advance.
    pub fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8]> {
        let out = self.read_slice(self.pos, len, what)?;
        self.pos += len;
        Ok(out)
    }

    /// Skip the `(-consumed) mod 4` alignment bytes that follow a field of
    /// `consumed` bytes. Padding that runs past the end is clamped, since
    /// writers routinely drop the trailing pad of the last value.
    pub fn skip_padding(&mut self, consumed: usize) {
        let pad = padding(consumed);
        self.pos = self.pos.saturating_add(pad).min(self.buf.len().max(self.pos));
    }

    pub fn u8(&mut self, what: &'static str) -> Result<u8> {
        let b = self.take(1, what)?;
        Ok(b[0])
    }

    pub fn u16(&mut self, what: &'static str) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2, what)?))
    }

    pub fn u32(&mut self, what: &'static str) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4, what)?))
    }

    /// Read a 16-byte GUID stored in the mixed-endian Windows layout.
    pub fn guid(&mut self, what: &'static str) -> Result<Uuid> {
        let bytes: [u8; 16] = self
            .take(16, what)?
            .try_into()
            .map_err(|_| TnefError::truncated(what, self.pos, 16, self.buf.len()))?;
        Ok(Uuid::from_bytes_le(bytes))
    }
}

/// Number of bytes needed to round `len` up to a multiple of four.
pub fn padding(len: usize) -> usize {
    len.wrapping_neg() & 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_uint_widths() {
        let buf: Vec<u8> = (1..=16).collect();
        let cursor = ByteCursor::new(&buf);
        assert_eq!(cursor.read_uint(0, 1, "u8").unwrap(), 0x01);
        assert_eq!(cursor.read_uint(0, 2, "u16").unwrap(), 0x0201);
        assert_eq!(cursor.read_uint(0, 4, "u32").unwrap(), 0x0403_0201);
        assert_eq!(cursor.read_uint(0, 8, "u64").unwrap(), 0x0807_0605_0403_0201);
        assert_eq!(
            cursor.read_uint(0, 16, "u128").unwrap(),
            0x100f_0e0d_0c0b_0a09_0807_0605_0403_0201
        );
    }

    #[test]
    fn test_read_uint_rejects_odd_width() {
        let buf = [0u8; 8];
        let cursor = ByteCursor::new(&buf);
        assert!(matches!(
            cursor.read_uint(0, 3, "u24"),
            Err(TnefError::InvalidWidth { width: 3 })
        ));
    }

    #[test]
    fn test_out_of_range_is_explicit() {
        let buf = [0xAAu8, 0xBB, 0xCC];
        let cursor = ByteCursor::new(&buf);
        match cursor.read_uint(2, 2, "tag") {
            Err(TnefError::Truncated {
                what,
                offset,
                need,
                have,
            }) => {
                assert_eq!(what, "tag");
                assert_eq!(offset, 2);
                assert_eq!(need, 2);
                assert_eq!(have, 1);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
        assert!(cursor.read_slice(usize::MAX, 2, "overflow").is_err());
        assert_eq!(cursor.read_slice(3, 0, "empty").unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_sequential_reads_advance() {
        let buf = [0x02, 0x10, 0x80, 0x03, 0x00, 0x00, 0x00, 0xFF];
        let mut cursor = ByteCursor::new(&buf);
        assert_eq!(cursor.u8("level").unwrap(), 0x02);
        assert_eq!(cursor.u16("tag").unwrap(), 0x8010);
        assert_eq!(cursor.u32("len").unwrap(), 3);
        assert_eq!(cursor.pos(), 7);
        assert_eq!(cursor.remaining(), 1);
        assert!(cursor.u16("short").is_err());
        // A failed read leaves the position unchanged.
        assert_eq!(cursor.pos(), 7);
    }

    #[test]
    fn test_padding() {
        assert_eq!(padding(0), 0);
        assert_eq!(padding(1), 3);
        assert_eq!(padding(2), 2);
        assert_eq!(padding(3), 1);
        assert_eq!(padding(4), 0);
        assert_eq!(padding(9), 3);
    }

    #[test]
    fn test_skip_padding_clamps_at_end() {
        let buf = [0u8; 6];
        let mut cursor = ByteCursor::with_pos(&buf, 5);
        cursor.skip_padding(1);
        assert_eq!(cursor.pos(), 6);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_guid_mixed_endian() {
        let bytes = [
            0x28, 0x03, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x46,
        ];
        let mut cursor = ByteCursor::new(&bytes);
        let guid = cursor.guid("guid").unwrap();
        assert_eq!(
            guid.to_string().to_uppercase(),
            "00020328-0000-0000-C000-000000000046"
        );
    }
}
