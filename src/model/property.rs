//! MAPI properties carried inside a `MapiProperties` record.

use uuid::Uuid;

/// Flag OR'ed into a raw property type when the property holds several values.
pub const MULTI_VALUE_FLAG: u16 = 0x1000;

/// Lowest property id that denotes a named property.
pub const NAMED_PROPERTY_MIN: u16 = 0x8000;

/// Highest property id that denotes a named property.
pub const NAMED_PROPERTY_MAX: u16 = 0xFFFE;

/// Well-known property ids used by this crate.
pub mod ids {
    /// Plain-text message body.
    pub const BODY: u16 = 0x1000;
    /// HTML message body.
    pub const BODY_HTML: u16 = 0x1013;
    pub const SUBJECT: u16 = 0x0037;
    pub const MESSAGE_CLASS: u16 = 0x001A;
    /// 8.3 attachment file name.
    pub const ATTACH_FILENAME: u16 = 0x3704;
    /// Full attachment file name (not limited to 8.3).
    pub const ATTACH_LONG_FILENAME: u16 = 0x3707;
    pub const ATTACH_MIME_TAG: u16 = 0x370E;
}

/// Base MAPI property type (the raw type with the multi-value flag masked off).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Unspecified,
    Null,
    Short,
    Int,
    Float,
    Double,
    Currency,
    AppTime,
    Error,
    Boolean,
    Object,
    Int8Byte,
    String,
    UnicodeString,
    SysTime,
    Clsid,
    Binary,
    Unknown(u16),
}

/// How many bytes a single value of a property type occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueWidth {
    /// Every value is exactly this many bytes.
    Fixed(usize),
    /// Every value carries its own 4-byte length prefix.
    Variable,
}

impl PropertyType {
    /// Value width for this type.
    ///
    /// Types without a defined width (unspecified, null, unknown) occupy zero bytes.
    pub fn width(self) -> ValueWidth {
        match self {
            Self::Short | Self::Boolean => ValueWidth::Fixed(2),
            Self::Int | Self::Float | Self::Error => ValueWidth::Fixed(4),
            Self::Double | Self::AppTime | Self::Currency | Self::Int8Byte | Self::SysTime => {
                ValueWidth::Fixed(8)
            }
            Self::Clsid => ValueWidth::Fixed(16),
            Self::String | Self::UnicodeString | Self::Object | Self::Binary => {
                ValueWidth::Variable
            }
            Self::Unspecified | Self::Null | Self::Unknown(_) => ValueWidth::Fixed(0),
        }
    }
}

impl From<u16> for PropertyType {
    fn from(value: u16) -> Self {
        match value {
            0x0000 => Self::Unspecified,
            0x0001 => Self::Null,
            0x0002 => Self::Short,
            0x0003 => Self::Int,
            0x0004 => Self::Float,
            0x0005 => Self::Double,
            0x0006 => Self::Currency,
            0x0007 => Self::AppTime,
            0x000A => Self::Error,
            0x000B => Self::Boolean,
            0x000D => Self::Object,
            0x0014 => Self::Int8Byte,
            0x001E => Self::String,
            0x001F => Self::UnicodeString,
            0x0040 => Self::SysTime,
            0x0048 => Self::Clsid,
            0x0102 => Self::Binary,
            other => Self::Unknown(other),
        }
    }
}

impl From<PropertyType> for u16 {
    fn from(ty: PropertyType) -> Self {
        match ty {
            PropertyType::Unspecified => 0x0000,
            PropertyType::Null => 0x0001,
            PropertyType::Short => 0x0002,
            PropertyType::Int => 0x0003,
            PropertyType::Float => 0x0004,
            PropertyType::Double => 0x0005,
            PropertyType::Currency => 0x0006,
            PropertyType::AppTime => 0x0007,
            PropertyType::Error => 0x000A,
            PropertyType::Boolean => 0x000B,
            PropertyType::Object => 0x000D,
            PropertyType::Int8Byte => 0x0014,
            PropertyType::String => 0x001E,
            PropertyType::UnicodeString => 0x001F,
            PropertyType::SysTime => 0x0040,
            PropertyType::Clsid => 0x0048,
            PropertyType::Binary => 0x0102,
            PropertyType::Unknown(v) => v,
        }
    }
}

/// Identifier of a named property inside its GUID namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyName {
    /// `kind == 0`: numeric id.
    Id(u32),
    /// `kind == 1`: UTF-16 string name.
    String(String),
}

/// One decoded MAPI property entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapiProperty {
    pub base_type: PropertyType,
    pub property_id: u16,
    /// Namespace GUID, present only for named properties.
    pub guid: Option<Uuid>,
    /// Name inside the GUID namespace, present only for named properties
    /// with a recognized kind.
    pub name: Option<PropertyName>,
    /// Raw value bytes, in wire order. Length 1 unless multi-valued.
    pub values: Vec<Vec<u8>>,
}

impl MapiProperty {
    /// Whether the id falls in the named-property range.
    pub fn is_named(&self) -> bool {
        is_named_id(self.property_id)
    }

    pub fn first_value(&self) -> Option<&[u8]> {
        self.values.first().map(Vec::as_slice)
    }

    /// First value decoded as text according to the property type.
    ///
    /// Unicode strings are UTF-16LE; everything else is read as UTF-8
    /// (lossily). Embedded NUL terminators are removed.
    pub fn first_value_text(&self) -> Option<String> {
        let raw = self.first_value()?;
        let text = match self.base_type {
            PropertyType::UnicodeString => {
                let units: Vec<u16> = raw
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
            _ => String::from_utf8_lossy(raw).into_owned(),
        };
        Some(text.replace('\0', ""))
    }
}

pub fn is_named_id(id: u16) -> bool {
    (NAMED_PROPERTY_MIN..=NAMED_PROPERTY_MAX).contains(&id)
}
