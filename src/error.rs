//! Centralized error types for tnefextract.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the tnefextract library.
#[derive(Error, Debug)]
pub enum TnefError {
    /// The buffer does not start with the TNEF signature.
    #[error("Not a TNEF stream: expected signature 0x223E9F78, found {found:#010X}")]
    SignatureMismatch { found: u32 },

    /// A read ran past the end of the buffer.
    #[error("Truncated {what} at offset {offset}: need {need} byte(s), have {have}")]
    Truncated {
        what: &'static str,
        offset: usize,
        need: usize,
        have: usize,
    },

    /// A multi-value count failed the allocation guard.
    #[error(
        "Corrupt MAPI property set at offset {offset}: {count} values declared, {remaining} byte(s) remaining"
    )]
    CorruptPropertySet {
        count: u32,
        remaining: usize,
        offset: usize,
    },

    /// An integer width the cursor cannot interpret.
    #[error("Unsupported integer width: {width} byte(s)")]
    InvalidWidth { width: usize },

    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The input file exceeds the configured size limit.
    #[error("File '{path}' is {size} bytes, over the {limit} byte limit")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// Convenience alias for `Result<T, TnefError>`.
pub type Result<T> = std::result::Result<T, TnefError>;

impl TnefError {
    /// Create an `Io` variant from a path and an `io::Error`.
    ///
    /// `NotFound` is reported as [`TnefError::FileNotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound(path)
        } else {
            Self::Io { path, source }
        }
    }

    /// Build a `Truncated` error for a read of `need` bytes at `offset` in a buffer of `len` bytes.
    pub(crate) fn truncated(what: &'static str, offset: usize, need: usize, len: usize) -> Self {
        Self::Truncated {
            what,
            offset,
            need,
            have: len.saturating_sub(offset),
        }
    }
}
