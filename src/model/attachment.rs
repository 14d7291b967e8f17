//! Attachments assembled from attachment-level records.

use super::property::{ids, MapiProperty};

/// An attachment extracted from a TNEF stream.
///
/// Populated across the attachment-level records that follow an
/// `AttachRenderData` boundary marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    /// File name from the `AttachTitle` record, NUL terminators removed.
    pub title: Option<String>,

    /// Raw content from the `AttachData` record.
    pub data: Option<Vec<u8>>,

    /// Attachment-level MAPI properties (long file name, MIME tag, ...).
    pub properties: Vec<MapiProperty>,
}

impl Attachment {
    /// Best available file name: the long file name property, then the
    /// title, then the 8.3 file name property.
    pub fn file_name(&self) -> Option<String> {
        let text = |id| {
            self.property(id)
                .and_then(MapiProperty::first_value_text)
                .filter(|name| !name.trim().is_empty())
        };
        text(ids::ATTACH_LONG_FILENAME)
            .or_else(|| self.title.clone().filter(|t| !t.trim().is_empty()))
            .or_else(|| text(ids::ATTACH_FILENAME))
    }

    /// MIME type from the attachment properties, if the sender supplied one.
    pub fn mime_type(&self) -> Option<String> {
        self.property(ids::ATTACH_MIME_TAG)
            .and_then(MapiProperty::first_value_text)
    }

    /// Size of the attachment content in bytes (0 when there is none).
    pub fn size(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    pub fn property(&self, id: u16) -> Option<&MapiProperty> {
        self.properties.iter().find(|p| p.property_id == id)
    }
}
