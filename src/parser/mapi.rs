//! Decoder for the MAPI property block carried by `MapiProperties` records.
//!
//! ```text
//! count(4)
//! count × {
//!     raw_type(2) property_id(2)
//!     [named: guid(16) kind(4) [kind 0: id(4)] [kind 1: len(4) name(len) pad]]
//!     [multi-value: value_count(4)]
//!     value_count × { fixed bytes | len(4) bytes } padded to 4
//! }
//! ```

use tracing::{debug, warn};

use crate::error::{Result, TnefError};
use crate::model::property::{
    is_named_id, MapiProperty, PropertyName, PropertyType, ValueWidth, MULTI_VALUE_FLAG,
};

use super::cursor::{padding, ByteCursor};

/// Multi-value counts above this are only accepted when the remaining
/// payload could plausibly hold them.
pub const MAX_TRUSTED_VALUE_COUNT: u32 = 1024;

/// Why a property block stopped early.
#[derive(Debug)]
struct Stopped {
    error: TnefError,
    /// Whether the whole block must be discarded.
    corrupt: bool,
}

/// Decode a property block, degrading gracefully.
///
/// Returns `None` when a multi-value count trips the corruption guard.
/// Entries that run past the end of the payload are dropped along with
/// everything after them.
pub fn decode_properties(payload: &[u8]) -> Option<Vec<MapiProperty>> {
    let (props, stopped) = decode_block(payload);
    match stopped {
        Some(Stopped {
            corrupt: true,
            error,
        }) => {
            warn!(error = %error, "Discarding corrupt MAPI property set");
            None
        }
        Some(Stopped { error, .. }) => {
            debug!(
                error = %error,
                decoded = props.len(),
                "MAPI property block ended early"
            );
            Some(props)
        }
        None => Some(props),
    }
}

/// Decode a property block, failing on the first problem.
pub fn decode_properties_strict(payload: &[u8]) -> Result<Vec<MapiProperty>> {
    match decode_block(payload) {
        (props, None) => Ok(props),
        (_, Some(stopped)) => Err(stopped.error),
    }
}

fn decode_block(payload: &[u8]) -> (Vec<MapiProperty>, Option<Stopped>) {
    let mut cursor = ByteCursor::new(payload);
    let count = match cursor.u32("property count") {
        Ok(n) => n,
        Err(error) => {
            return (
                Vec::new(),
                Some(Stopped {
                    error,
                    corrupt: false,
                }),
            )
        }
    };

    // Each entry takes at least four bytes, so the payload bounds the capacity.
    let mut props = Vec::with_capacity((count as usize).min(cursor.remaining() / 4));
    for index in 0..count {
        if cursor.is_at_end() {
            let error = TnefError::truncated("property entry", cursor.pos(), 4, payload.len());
            debug!(index, count, "Property block exhausted before declared count");
            return (
                props,
                Some(Stopped {
                    error,
                    corrupt: false,
                }),
            );
        }
        match decode_entry(&mut cursor) {
            Ok(prop) => props.push(prop),
            Err(error) => {
                let corrupt = matches!(error, TnefError::CorruptPropertySet { .. });
                return (props, Some(Stopped { error, corrupt }));
            }
        }
    }
    (props, None)
}

fn decode_entry(cursor: &mut ByteCursor<'_>) -> Result<MapiProperty> {
    let raw_type = cursor.u16("property type")?;
    let base_type = PropertyType::from(raw_type & !MULTI_VALUE_FLAG);
    let width = base_type.width();
    let multi_value = raw_type & MULTI_VALUE_FLAG != 0 || width == ValueWidth::Variable;

    let property_id = cursor.u16("property id")?;

    let (guid, name) = if is_named_id(property_id) {
        let guid = cursor.guid("named property guid")?;
        let kind = cursor.u32("named property kind")?;
        let name = match kind {
            0 => Some(PropertyName::Id(cursor.u32("named property id")?)),
            1 => {
                let len = cursor.u32("named property name length")? as usize;
                let raw = cursor.take(len, "named property name")?;
                cursor.skip_padding(len);
                Some(PropertyName::String(decode_utf16_name(raw)))
            }
            other => {
                debug!(kind = other, property_id, "Unrecognized named property kind");
                None
            }
        };
        (Some(guid), name)
    } else {
        (None, None)
    };

    let value_count = if multi_value {
        cursor.u32("value count")?
    } else {
        1
    };

    if value_count > MAX_TRUSTED_VALUE_COUNT && value_count as usize > cursor.remaining() {
        return Err(TnefError::CorruptPropertySet {
            count: value_count,
            remaining: cursor.remaining(),
            offset: cursor.pos(),
        });
    }

    let mut values = Vec::with_capacity(value_capacity(value_count, width, cursor.remaining()));
    for _ in 0..value_count {
        let len = match width {
            ValueWidth::Fixed(n) => n,
            ValueWidth::Variable => cursor.u32("value length")? as usize,
        };
        let value = cursor.take(len, "property value")?;
        values.push(value.to_vec());
        cursor.skip_padding(len);
    }

    Ok(MapiProperty {
        base_type,
        property_id,
        guid,
        name,
        values,
    })
}

/// Capacity to reserve for `count` values: no more than the remaining
/// bytes can hold, since each slot costs far more than a byte.
fn value_capacity(count: u32, width: ValueWidth, remaining: usize) -> usize {
    let min_value_len = match width {
        ValueWidth::Fixed(n) => n + padding(n),
        ValueWidth::Variable => 4,
    };
    (count as usize).min(remaining / min_value_len.max(1))
}

/// Named-property string names are UTF-16LE with a trailing NUL.
fn decode_utf16_name(raw: &[u8]) -> String {
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .take_while(|&u| u != 0)
        .collect();
    String::from_utf16_lossy(&units)
}
