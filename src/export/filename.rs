//! Output file naming: sanitizing untrusted names and reserving unique paths.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Sanitize a string for use in filenames.
///
/// Replaces invalid characters with `_` and truncates to `max_len`.
/// Names made only of dots are rejected so they cannot climb out of the
/// output directory.
pub fn sanitize_filename_part(s: &str, max_len: usize) -> String {
    let sanitized: String = s
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' || c == '_' || c == '@' {
                c
            } else {
                '_'
            }
        })
        .take(max_len)
        .collect();

    if sanitized.chars().all(|c| c == '.') {
        "unknown".to_string()
    } else {
        sanitized
    }
}

/// Atomically create a new file at `path`, or at `stem_N.ext` if that name
/// is taken. Safe against other writers racing for the same directory.
pub fn create_unique(path: &Path) -> io::Result<(PathBuf, File)> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => return Ok((path.to_path_buf(), file)),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
        Err(e) => return Err(e),
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    for i in 1..1000 {
        let candidate = if ext.is_empty() {
            parent.join(format!("{stem}_{i}"))
        } else {
            parent.join(format!("{stem}_{i}.{ext}"))
        };
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for {}", path.display()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename_part("hello world.txt", 20), "hello_world.txt");
        assert_eq!(sanitize_filename_part("a/b\\c:d*e", 20), "a_b_c_d_e");
        assert_eq!(sanitize_filename_part("", 20), "unknown");
        assert_eq!(sanitize_filename_part("..", 20), "unknown");
        assert_eq!(sanitize_filename_part("../../etc/passwd", 40), ".._.._etc_passwd");
        assert_eq!(sanitize_filename_part("abcdef", 3), "abc");
    }

    #[test]
    fn test_create_unique_appends_counter() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("report.pdf");
        let (first, _) = create_unique(&target).unwrap();
        let (second, _) = create_unique(&target).unwrap();
        let (third, _) = create_unique(&target).unwrap();
        assert_eq!(first, target);
        assert_eq!(second, tmp.path().join("report_1.pdf"));
        assert_eq!(third, tmp.path().join("report_2.pdf"));
    }

    #[test]
    fn test_create_unique_without_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("README");
        create_unique(&target).unwrap();
        let (second, _) = create_unique(&target).unwrap();
        assert_eq!(second, tmp.path().join("README_1"));
    }
}
