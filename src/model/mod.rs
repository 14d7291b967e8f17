//! Core data model: TNEF records, MAPI properties, attachments and the decoded message.

pub mod attachment;
pub mod attribute;
pub mod message;
pub mod property;
