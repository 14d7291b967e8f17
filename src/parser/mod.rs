//! TNEF decoding: byte cursor, record decoder, MAPI property decoder and the container assembler.

pub mod cursor;
pub mod mapi;
pub mod record;
pub mod tnef;

pub use tnef::{decode, decode_file, decode_strict, decode_with_mode, DecodeMode};
