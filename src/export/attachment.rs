//! Write decoded attachments to disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::model::attachment::Attachment;
use crate::model::message::DecodedMessage;

use super::filename::{create_unique, sanitize_filename_part};

/// Options controlling attachment export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Maximum length of a sanitized file name.
    pub max_filename_len: usize,
    /// Stop after this many attachments.
    pub max_attachments: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ExportOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_filename_len: config.extract.max_filename_len,
            max_attachments: config.limits.max_attachments,
        }
    }
}

/// Write a single attachment into `output_dir`.
///
/// `index` is the attachment's position in the message and names untitled
/// attachments (`attachment_1.bin`, ...). Returns `None` for attachments
/// that carry no data.
pub fn export_attachment(
    attachment: &Attachment,
    index: usize,
    output_dir: &Path,
    options: &ExportOptions,
) -> anyhow::Result<Option<PathBuf>> {
    let Some(data) = attachment.data.as_deref() else {
        tracing::debug!(index, "Attachment has no data, skipped");
        return Ok(None);
    };

    let filename = attachment_filename(attachment, index, options.max_filename_len);
    let (path, mut file) = create_unique(&output_dir.join(&filename))?;
    file.write_all(data)?;
    Ok(Some(path))
}

/// Write every attachment of a message into `output_dir`, creating it if needed.
///
/// Failures on individual attachments are logged and skipped.
pub fn write_attachments(
    message: &DecodedMessage,
    output_dir: &Path,
    options: &ExportOptions,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    if message.attachments.len() > options.max_attachments {
        tracing::warn!(
            count = message.attachments.len(),
            limit = options.max_attachments,
            "Too many attachments, extra ones are not written"
        );
    }

    let mut paths = Vec::new();
    for (i, att) in message
        .attachments
        .iter()
        .enumerate()
        .take(options.max_attachments)
    {
        match export_attachment(att, i, output_dir, options) {
            Ok(Some(path)) => paths.push(path),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    index = i,
                    title = att.title.as_deref().unwrap_or(""),
                    error = %e,
                    "Failed to export attachment"
                );
            }
        }
    }

    Ok(paths)
}

/// Sanitized file name for an attachment, synthesized when it has none.
pub fn attachment_filename(attachment: &Attachment, index: usize, max_len: usize) -> String {
    match attachment.file_name() {
        Some(name) => sanitize_filename_part(&name, max_len),
        None => format!("attachment_{}.bin", index + 1),
    }
}
