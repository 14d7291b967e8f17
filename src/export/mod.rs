//! Export functionality: attachments, message bodies and output file naming.

pub mod attachment;
pub mod body;
pub mod filename;
