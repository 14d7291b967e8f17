//! Top-level TNEF attribute records.

/// Attribute level byte: which object a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeLevel {
    /// Message-level attribute (`0x01`).
    Message,
    /// Attachment-level attribute (`0x02`).
    Attachment,
    /// Any other level byte, carried through unchanged.
    Other(u8),
}

impl From<u8> for AttributeLevel {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::Message,
            0x02 => Self::Attachment,
            other => Self::Other(other),
        }
    }
}

impl From<AttributeLevel> for u8 {
    fn from(level: AttributeLevel) -> Self {
        match level {
            AttributeLevel::Message => 0x01,
            AttributeLevel::Attachment => 0x02,
            AttributeLevel::Other(v) => v,
        }
    }
}

macro_rules! attribute_tags {
    ($($(#[$doc:meta])* $name:ident = $value:literal,)*) => {
        /// Attribute identifier (the low 16 bits of the TNEF attribute id).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum AttributeTag {
            $($(#[$doc])* $name,)*
            /// Identifier not known to this crate.
            Unknown(u16),
        }

        impl From<u16> for AttributeTag {
            fn from(value: u16) -> Self {
                match value {
                    $($value => Self::$name,)*
                    other => Self::Unknown(other),
                }
            }
        }

        impl From<AttributeTag> for u16 {
            fn from(tag: AttributeTag) -> Self {
                match tag {
                    $(AttributeTag::$name => $value,)*
                    AttributeTag::Unknown(v) => v,
                }
            }
        }
    };
}

attribute_tags! {
    Owner = 0x0000,
    SentFor = 0x0001,
    Delegate = 0x0002,
    DateStart = 0x0006,
    DateEnd = 0x0007,
    AidOwner = 0x0008,
    RequestResponse = 0x0009,
    From = 0x8000,
    Subject = 0x8004,
    DateSent = 0x8005,
    DateReceived = 0x8006,
    MessageStatus = 0x8007,
    MessageClass = 0x8008,
    MessageId = 0x8009,
    ParentId = 0x800A,
    ConversationId = 0x800B,
    Body = 0x800C,
    Priority = 0x800D,
    /// Raw attachment bytes.
    AttachData = 0x800F,
    /// Attachment file name (8.3 style, NUL terminated).
    AttachTitle = 0x8010,
    AttachMetaFile = 0x8011,
    AttachCreateDate = 0x8012,
    AttachModifyDate = 0x8013,
    DateModified = 0x8020,
    AttachTransportFilename = 0x9001,
    /// Boundary marker: opens a new attachment.
    AttachRenderData = 0x9002,
    /// Embedded MAPI property block.
    MapiProperties = 0x9003,
    RecipientTable = 0x9004,
    Attachment = 0x9005,
    TnefVersion = 0x9006,
    OemCodepage = 0x9007,
    OriginalMessageClass = 0x9008,
}

/// One decoded top-level record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TnefAttribute<'a> {
    pub level: AttributeLevel,
    pub tag: AttributeTag,
    /// The attribute's value type (high 16 bits of the attribute id).
    pub value_type: u16,
    /// Payload bytes, borrowed from the input buffer.
    pub payload: &'a [u8],
    /// Bytes consumed by the whole record: `9 + payload.len() + 2`.
    pub record_length: usize,
}
