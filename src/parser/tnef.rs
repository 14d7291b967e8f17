//! TNEF container decoding: signature check, record scan and result assembly.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, TnefError};
use crate::model::attachment::Attachment;
use crate::model::attribute::{AttributeLevel, AttributeTag, TnefAttribute};
use crate::model::message::DecodedMessage;
use crate::model::property::{ids, MapiProperty};

use super::cursor::ByteCursor;
use super::mapi;
use super::record::{read_record, RecordRead};

/// Little-endian signature at the start of every TNEF stream.
pub const TNEF_SIGNATURE: u32 = 0x223E_9F78;

/// Offset of the first record: signature (4) + legacy key (2).
pub const FIRST_RECORD_OFFSET: usize = 6;

/// What the assembler does with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordAction {
    /// Open a new attachment.
    BeginAttachment,
    /// Set the current attachment's title.
    AttachmentTitle,
    /// Set the current attachment's content.
    AttachmentData,
    /// Decode the current attachment's property block.
    AttachmentProperties,
    /// Decode the message property block and pick out the bodies.
    MessageProperties,
    Ignore,
}

impl RecordAction {
    fn classify(level: AttributeLevel, tag: AttributeTag) -> Self {
        match (level, tag) {
            (_, AttributeTag::AttachRenderData) => Self::BeginAttachment,
            (AttributeLevel::Attachment, AttributeTag::AttachTitle) => Self::AttachmentTitle,
            (AttributeLevel::Attachment, AttributeTag::AttachData) => Self::AttachmentData,
            (AttributeLevel::Attachment, AttributeTag::MapiProperties) => {
                Self::AttachmentProperties
            }
            (AttributeLevel::Attachment, _) => Self::Ignore,
            (_, AttributeTag::MapiProperties) => Self::MessageProperties,
            _ => Self::Ignore,
        }
    }
}

/// Whether a malformed stream is tolerated or reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Stop at the first malformed record and keep what was decoded;
    /// drop corrupt property sets.
    #[default]
    Lenient,
    /// Fail on the first malformed record or corrupt property set.
    Strict,
}

/// Decode a TNEF stream.
///
/// Returns `None` when the buffer does not start with the TNEF signature.
/// Malformed input never fails: decoding stops at the first unreadable
/// record and returns what was assembled up to that point.
pub fn decode(buf: &[u8]) -> Option<DecodedMessage> {
    // Lenient decoding only fails on the signature check.
    match decode_with_mode(buf, DecodeMode::Lenient) {
        Ok(message) => Some(message),
        Err(e) => {
            debug!(error = %e, "Not a TNEF stream");
            None
        }
    }
}

/// Decode a TNEF stream, reporting every problem as a typed error.
pub fn decode_strict(buf: &[u8]) -> Result<DecodedMessage> {
    decode_with_mode(buf, DecodeMode::Strict)
}

/// Decode a TNEF stream with an explicit [`DecodeMode`].
pub fn decode_with_mode(buf: &[u8], mode: DecodeMode) -> Result<DecodedMessage> {
    check_signature(buf)?;

    let mut assembler = Assembler::new(mode);
    let mut offset = FIRST_RECORD_OFFSET;
    loop {
        match read_record(buf, offset) {
            RecordRead::EndOfBuffer => break,
            RecordRead::Malformed(e) => {
                if mode == DecodeMode::Strict {
                    return Err(e);
                }
                warn!(offset, error = %e, "Stopping at malformed record");
                break;
            }
            RecordRead::Decoded(attr) => {
                offset += attr.record_length;
                assembler.apply(&attr)?;
            }
        }
    }

    Ok(assembler.finish())
}

/// Read and decode a file.
///
/// Returns `Ok(None)` when the file is not a TNEF stream. I/O failures are
/// the only errors in lenient mode.
pub fn decode_file(path: impl AsRef<Path>, mode: DecodeMode) -> Result<Option<DecodedMessage>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| TnefError::io(path, e))?;
    let len = file.metadata().map_err(|e| TnefError::io(path, e))?.len();
    if len == 0 {
        debug!(path = %path.display(), "Empty file");
        return match mode {
            DecodeMode::Lenient => Ok(None),
            DecodeMode::Strict => Err(TnefError::truncated("signature", 0, 4, 0)),
        };
    }

    // SAFETY: the map is read-only and does not outlive this call.
    let map = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| TnefError::io(path, e))?;

    let decoded = match mode {
        DecodeMode::Lenient => decode(&map),
        DecodeMode::Strict => Some(decode_strict(&map)?),
    };
    if decoded.is_none() {
        debug!(path = %path.display(), "Not a TNEF file");
    }
    Ok(decoded)
}

fn check_signature(buf: &[u8]) -> Result<()> {
    let cursor = ByteCursor::new(buf);
    let found = cursor.read_uint(0, 4, "signature")? as u32;
    if found != TNEF_SIGNATURE {
        return Err(TnefError::SignatureMismatch { found });
    }
    Ok(())
}

/// Loop state while scanning records.
struct Assembler {
    mode: DecodeMode,
    message: DecodedMessage,
    /// Index into `message.attachments` of the attachment being filled.
    current: Option<usize>,
}

impl Assembler {
    fn new(mode: DecodeMode) -> Self {
        Self {
            mode,
            message: DecodedMessage::default(),
            current: None,
        }
    }

    fn apply(&mut self, attr: &TnefAttribute<'_>) -> Result<()> {
        let action = RecordAction::classify(attr.level, attr.tag);
        debug!(
            level = ?attr.level,
            tag = ?attr.tag,
            len = attr.payload.len(),
            ?action,
            "Record"
        );

        match action {
            RecordAction::BeginAttachment => {
                self.message.attachments.push(Attachment::default());
                self.current = Some(self.message.attachments.len() - 1);
            }
            RecordAction::AttachmentTitle => {
                let title = decode_title(attr.payload);
                if let Some(att) = self.current_attachment(attr) {
                    att.title = Some(title);
                }
            }
            RecordAction::AttachmentData => {
                if let Some(att) = self.current_attachment(attr) {
                    att.data = Some(attr.payload.to_vec());
                }
            }
            RecordAction::AttachmentProperties => {
                let props = self.decode_properties(attr.payload)?;
                if let Some(att) = self.current_attachment(attr) {
                    att.properties = props;
                }
            }
            RecordAction::MessageProperties => {
                // Bodies always mirror the property set currently held.
                let props = self.decode_properties(attr.payload)?;
                self.message.body = first_value_of(&props, ids::BODY);
                self.message.body_html = first_value_of(&props, ids::BODY_HTML);
                self.message.properties = props;
            }
            RecordAction::Ignore => {}
        }
        Ok(())
    }

    fn current_attachment(&mut self, attr: &TnefAttribute<'_>) -> Option<&mut Attachment> {
        let att = self
            .current
            .and_then(|i| self.message.attachments.get_mut(i));
        if att.is_none() {
            debug!(tag = ?attr.tag, "Attachment record before any boundary marker, ignored");
        }
        att
    }

    fn decode_properties(&self, payload: &[u8]) -> Result<Vec<MapiProperty>> {
        match self.mode {
            DecodeMode::Strict => mapi::decode_properties_strict(payload),
            DecodeMode::Lenient => Ok(mapi::decode_properties(payload).unwrap_or_default()),
        }
    }

    fn finish(self) -> DecodedMessage {
        self.message
    }
}

fn first_value_of(props: &[MapiProperty], id: u16) -> Option<Vec<u8>> {
    props
        .iter()
        .find(|p| p.property_id == id)
        .and_then(|p| p.first_value())
        .map(<[u8]>::to_vec)
}

/// Decode an attachment title: UTF-8 when valid, Windows-1252 otherwise,
/// with every NUL removed.
fn decode_title(payload: &[u8]) -> String {
    let text = match std::str::from_utf8(payload) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(payload);
            decoded.into_owned()
        }
    };
    text.replace('\0', "")
}
