//! Write message bodies to disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::model::message::DecodedMessage;

use super::filename::{create_unique, sanitize_filename_part};

/// Write `{stem}.txt` and/or `{stem}.html` for the bodies present in `message`.
///
/// Returns the written paths; an empty list when the message has no body.
pub fn write_bodies(
    message: &DecodedMessage,
    output_dir: &Path,
    stem: &str,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    if !message.has_body() {
        return Ok(paths);
    }
    std::fs::create_dir_all(output_dir)?;

    let stem = sanitize_filename_part(stem, 120);
    let bodies = [
        (message.body_text(), "txt"),
        (message.body_html_text(), "html"),
    ];
    for (text, ext) in bodies {
        let Some(text) = text else { continue };
        let (path, mut file) = create_unique(&output_dir.join(format!("{stem}.{ext}")))?;
        file.write_all(text.as_bytes())?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bodies() {
        let tmp = tempfile::tempdir().unwrap();
        let message = DecodedMessage {
            body: Some(b"plain\0".to_vec()),
            body_html: Some(b"<p>html</p>".to_vec()),
            ..Default::default()
        };
        let paths = write_bodies(&message, tmp.path(), "winmail.dat").unwrap();
        assert_eq!(
            paths,
            vec![
                tmp.path().join("winmail.dat.txt"),
                tmp.path().join("winmail.dat.html")
            ]
        );
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("winmail.dat.txt")).unwrap(),
            "plain"
        );
    }

    #[test]
    fn test_no_body_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let paths = write_bodies(&DecodedMessage::default(), &out, "x").unwrap();
        assert!(paths.is_empty());
        assert!(!out.exists());
    }
}
