//! `tnefextract`: decode TNEF (`winmail.dat`) streams and extract their
//! attachments and message bodies.
//!
//! The core is [`parser::decode`], a pure function from a byte buffer to a
//! [`model::message::DecodedMessage`]. The remaining modules write the
//! results to disk and drive batch extraction over a directory.

pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;

pub use error::{Result, TnefError};
pub use model::attachment::Attachment;
pub use model::message::DecodedMessage;
pub use model::property::MapiProperty;
pub use parser::{decode, decode_file, decode_strict, DecodeMode};
