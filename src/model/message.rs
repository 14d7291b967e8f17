//! The decoded result of one TNEF stream.

use super::attachment::Attachment;
use super::property::{ids, MapiProperty};

/// Everything extracted from a TNEF stream.
///
/// Built fresh by each decode call; nothing is shared between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Attachments in stream order.
    pub attachments: Vec<Attachment>,

    /// Message-level MAPI properties (empty when absent or corrupt).
    pub properties: Vec<MapiProperty>,

    /// First value of the `Body` property.
    pub body: Option<Vec<u8>>,

    /// First value of the `BodyHtml` property.
    pub body_html: Option<Vec<u8>>,
}

impl DecodedMessage {
    /// Message-level property with the given id.
    pub fn property(&self, id: u16) -> Option<&MapiProperty> {
        self.properties.iter().find(|p| p.property_id == id)
    }

    /// Plain-text body as a string, NUL terminators removed.
    ///
    /// Decoded according to the `Body` property's type when that property
    /// is available (UTF-16 bodies are common), else as UTF-8.
    pub fn body_text(&self) -> Option<String> {
        self.property(ids::BODY)
            .and_then(MapiProperty::first_value_text)
            .or_else(|| self.body.as_deref().map(bytes_to_text))
    }

    /// HTML body as a string, NUL terminators removed.
    pub fn body_html_text(&self) -> Option<String> {
        self.property(ids::BODY_HTML)
            .and_then(MapiProperty::first_value_text)
            .or_else(|| self.body_html.as_deref().map(bytes_to_text))
    }

    /// Message subject, when the sender included one.
    pub fn subject(&self) -> Option<String> {
        self.property(ids::SUBJECT)
            .and_then(MapiProperty::first_value_text)
    }

    /// MAPI message class (`IPM.Note`, `IPM.Appointment`, ...).
    pub fn message_class(&self) -> Option<String> {
        self.property(ids::MESSAGE_CLASS)
            .and_then(MapiProperty::first_value_text)
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some() || self.body_html.is_some()
    }
}

fn bytes_to_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace('\0', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::property::PropertyType;

    #[test]
    fn test_body_text_strips_terminators() {
        let msg = DecodedMessage {
            body: Some(b"Hello\0".to_vec()),
            ..Default::default()
        };
        assert_eq!(msg.body_text().as_deref(), Some("Hello"));
        assert_eq!(msg.body_html_text(), None);
        assert!(msg.has_body());
        assert!(!DecodedMessage::default().has_body());
    }

    #[test]
    fn test_subject_from_unicode_property() {
        let subject: Vec<u8> = "Réunion\0"
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();
        let msg = DecodedMessage {
            properties: vec![MapiProperty {
                base_type: PropertyType::UnicodeString,
                property_id: ids::SUBJECT,
                guid: None,
                name: None,
                values: vec![subject],
            }],
            ..Default::default()
        };
        assert_eq!(msg.subject().as_deref(), Some("Réunion"));
        assert_eq!(msg.message_class(), None);
    }
}
