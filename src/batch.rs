//! Batch extraction over a directory of candidate TNEF files.
//!
//! Every regular file in the directory is tried; files that are not TNEF
//! streams are logged and skipped. Output goes to a subdirectory of the
//! scanned directory (`processed` by default).

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, TnefError};
use crate::export::attachment::{write_attachments, ExportOptions};
use crate::export::body::write_bodies;
use crate::parser::{decode_file, DecodeMode};

/// Options for [`process_directory`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Output subdirectory name inside the scanned directory.
    pub output_dir_name: String,
    /// Also write message bodies.
    pub write_bodies: bool,
    /// Skip files larger than this.
    pub max_file_size: u64,
    pub mode: DecodeMode,
    pub export: ExportOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for BatchOptions {
    fn from(config: &Config) -> Self {
        Self {
            output_dir_name: config.extract.output_dir_name.clone(),
            write_bodies: config.extract.write_bodies,
            max_file_size: config.limits.max_file_size,
            mode: if config.decode.strict {
                DecodeMode::Strict
            } else {
                DecodeMode::Lenient
            },
            export: ExportOptions::from(config),
        }
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchStats {
    /// Regular files examined.
    pub files_seen: usize,
    /// Files that decoded as TNEF.
    pub tnef_files: usize,
    /// Files skipped: not TNEF or over the size limit.
    pub skipped: usize,
    /// Files that could not be read or decoded.
    pub failed: usize,
    /// Attachment files written.
    pub attachments_written: usize,
    /// Body files written.
    pub bodies_written: usize,
}

/// Outcome of extracting one file.
#[derive(Debug)]
pub enum FileOutcome {
    Extracted {
        attachments: Vec<PathBuf>,
        bodies: Vec<PathBuf>,
    },
    NotTnef,
    TooLarge {
        size: u64,
    },
}

/// List the regular files of `dir`, sorted by name, ignoring the output directory.
pub fn collect_input_files(dir: &Path, output_dir_name: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| TnefError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TnefError::io(dir, e))?;
        let path = entry.path();
        if entry.file_name() == output_dir_name {
            continue;
        }
        match entry.file_type() {
            Ok(ft) if ft.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Cannot stat entry"),
        }
    }
    files.sort();
    Ok(files)
}

/// Decode one file and write its attachments (and optionally bodies) into `output_dir`.
pub fn extract_file(
    path: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> anyhow::Result<FileOutcome> {
    let size = std::fs::metadata(path)
        .map_err(|e| TnefError::io(path, e))?
        .len();
    if size > options.max_file_size {
        warn!(
            path = %path.display(),
            size,
            limit = options.max_file_size,
            "File exceeds size limit, skipped"
        );
        return Ok(FileOutcome::TooLarge { size });
    }

    let Some(message) = decode_file(path, options.mode)? else {
        return Ok(FileOutcome::NotTnef);
    };

    let attachments = write_attachments(&message, output_dir, &options.export)?;
    let bodies = if options.write_bodies {
        let stem = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "message".to_string());
        write_bodies(&message, output_dir, &stem)?
    } else {
        Vec::new()
    };

    info!(
        path = %path.display(),
        attachments = attachments.len(),
        bodies = bodies.len(),
        "Extracted"
    );
    Ok(FileOutcome::Extracted {
        attachments,
        bodies,
    })
}

/// Extract every TNEF file in `dir` into `dir/<output_dir_name>`.
///
/// The progress callback receives `(current, total)`.
pub fn process_directory(
    dir: &Path,
    options: &BatchOptions,
    progress: &dyn Fn(usize, usize),
) -> anyhow::Result<BatchStats> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let files = collect_input_files(dir, &options.output_dir_name)?;
    let output_dir = dir.join(&options.output_dir_name);
    let total = files.len();
    let mut stats = BatchStats::default();

    for (i, path) in files.iter().enumerate() {
        progress(i, total);
        stats.files_seen += 1;

        match extract_file(path, &output_dir, options) {
            Ok(FileOutcome::Extracted {
                attachments,
                bodies,
            }) => {
                stats.tnef_files += 1;
                stats.attachments_written += attachments.len();
                stats.bodies_written += bodies.len();
            }
            Ok(FileOutcome::NotTnef) => {
                info!(path = %path.display(), "Not a TNEF file, skipped");
                stats.skipped += 1;
            }
            Ok(FileOutcome::TooLarge { .. }) => stats.skipped += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to extract");
                stats.failed += 1;
            }
        }
    }
    progress(total, total);

    Ok(stats)
}
