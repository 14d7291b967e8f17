//! Decoder for one top-level TNEF record.
//!
//! ```text
//! level(1) tag(2) type(2) payload_length(4) payload(L) checksum(2)
//! ```
//!
//! The checksum is read but not verified.

use crate::error::TnefError;
use crate::model::attribute::{AttributeLevel, AttributeTag, TnefAttribute};

use super::cursor::ByteCursor;

/// Fixed bytes before the payload.
pub const RECORD_HEADER_LEN: usize = 9;

/// Trailing checksum bytes after the payload.
pub const RECORD_CHECKSUM_LEN: usize = 2;

/// Outcome of reading a record at an offset.
#[derive(Debug)]
pub enum RecordRead<'a> {
    /// A complete record.
    Decoded(TnefAttribute<'a>),
    /// The offset is at or beyond the end of the buffer.
    EndOfBuffer,
    /// A field could not be read within the buffer.
    Malformed(TnefError),
}

/// Decode the record starting at `offset`.
pub fn read_record(buf: &[u8], offset: usize) -> RecordRead<'_> {
    if offset >= buf.len() {
        return RecordRead::EndOfBuffer;
    }
    match decode_record(buf, offset) {
        Ok(attr) => RecordRead::Decoded(attr),
        Err(e) => RecordRead::Malformed(e),
    }
}

fn decode_record(buf: &[u8], offset: usize) -> crate::error::Result<TnefAttribute<'_>> {
    let mut cursor = ByteCursor::with_pos(buf, offset);
    let level = AttributeLevel::from(cursor.u8("record level")?);
    let tag = AttributeTag::from(cursor.u16("record tag")?);
    let value_type = cursor.u16("record type")?;
    let payload_len = cursor.u32("record length")? as usize;
    let payload = cursor.take(payload_len, "record payload")?;
    let _checksum = cursor.u16("record checksum")?;

    Ok(TnefAttribute {
        level,
        tag,
        value_type,
        payload,
        record_length: RECORD_HEADER_LEN + payload_len + RECORD_CHECKSUM_LEN,
    })
}
