//! In-memory builders for TNEF test streams.

#![allow(dead_code)]

pub const SIGNATURE: [u8; 4] = [0x78, 0x9F, 0x3E, 0x22];

pub const LVL_MESSAGE: u8 = 0x01;
pub const LVL_ATTACHMENT: u8 = 0x02;

pub const ATT_ATTACH_DATA: u16 = 0x800F;
pub const ATT_ATTACH_TITLE: u16 = 0x8010;
pub const ATT_ATTACH_REND_DATA: u16 = 0x9002;
pub const ATT_MAPI_PROPS: u16 = 0x9003;
pub const ATT_TNEF_VERSION: u16 = 0x9006;

/// Builds a TNEF stream record by record.
pub struct TnefBuilder {
    buf: Vec<u8>,
}

impl TnefBuilder {
    pub fn new() -> Self {
        let mut buf = SIGNATURE.to_vec();
        buf.extend_from_slice(&[0x01, 0x00]); // legacy key
        Self { buf }
    }

    pub fn record(mut self, level: u8, tag: u16, payload: &[u8]) -> Self {
        self.buf.push(level);
        self.buf.extend_from_slice(&tag.to_le_bytes());
        self.buf.extend_from_slice(&0x0006u16.to_le_bytes());
        self.buf
            .extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(payload);
        let checksum = payload
            .iter()
            .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)));
        self.buf.extend_from_slice(&checksum.to_le_bytes());
        self
    }

    pub fn attachment(self, title: &str, data: &[u8]) -> Self {
        let mut title_bytes = title.as_bytes().to_vec();
        title_bytes.push(0);
        self.record(LVL_ATTACHMENT, ATT_ATTACH_REND_DATA, &[])
            .record(LVL_ATTACHMENT, ATT_ATTACH_TITLE, &title_bytes)
            .record(LVL_ATTACHMENT, ATT_ATTACH_DATA, data)
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// Builds a MAPI property block.
pub struct MapiBuilder {
    count: u32,
    entries: Vec<u8>,
}

impl MapiBuilder {
    pub fn new() -> Self {
        Self {
            count: 0,
            entries: Vec::new(),
        }
    }

    /// A single-valued variable-width property (string/binary).
    pub fn variable(mut self, raw_type: u16, id: u16, value: &[u8]) -> Self {
        self.count += 1;
        self.entries.extend_from_slice(&raw_type.to_le_bytes());
        self.entries.extend_from_slice(&id.to_le_bytes());
        self.entries.extend_from_slice(&1u32.to_le_bytes());
        self.push_value(value);
        self
    }

    /// A single-valued 4-byte integer property.
    pub fn int(mut self, id: u16, value: u32) -> Self {
        self.count += 1;
        self.entries.extend_from_slice(&0x0003u16.to_le_bytes());
        self.entries.extend_from_slice(&id.to_le_bytes());
        self.entries.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Raw entry bytes, counted as one property.
    pub fn raw_entry(mut self, bytes: &[u8]) -> Self {
        self.count += 1;
        self.entries.extend_from_slice(bytes);
        self
    }

    fn push_value(&mut self, value: &[u8]) {
        self.entries
            .extend_from_slice(&(value.len() as u32).to_le_bytes());
        self.entries.extend_from_slice(value);
        let pad = value.len().wrapping_neg() & 3;
        self.entries.extend(std::iter::repeat(0).take(pad));
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = self.count.to_le_bytes().to_vec();
        out.extend(self.entries);
        out
    }
}
