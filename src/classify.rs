// src/classify.rs
//! Text/binary sniffing. A file counts as text when its head decodes as UTF-8.

use std::{
    fs,
    io::Read,
    path::Path
};

/// How many bytes of the head are inspected.
pub const TEXT_SNIFF_BYTES: usize = 1024;

/// True when the first [`TEXT_SNIFF_BYTES`] of `path` are valid UTF-8.
/// Any I/O failure (missing file, permissions, a directory) yields `false`,
/// and so does anything that is not a regular file: opening a FIFO blocks.
pub fn is_text(path: &Path) -> bool {
    head_is_utf8(path).unwrap_or(false)
}

fn head_is_utf8(path: &Path) -> std::io::Result<bool> {
    if !fs::metadata(path)?.is_file() {
        return Ok(false);
    }
    let f = fs::File::open(path)?;
    let mut buf = Vec::with_capacity(TEXT_SNIFF_BYTES);
    f.take(TEXT_SNIFF_BYTES as u64).read_to_end(&mut buf)?;
    Ok(match std::str::from_utf8(&buf) {
        Ok(_) => true,
        // A multi-byte sequence cut by the window is not a decode failure.
        Err(e) => e.error_len().is_none() && buf.len() == TEXT_SNIFF_BYTES,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn utf8_is_text() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("a.txt");
        fs::write(&p, "héllo\n").unwrap();
        assert!(is_text(&p));
    }

    #[test]
    fn empty_file_is_text() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("empty");
        fs::write(&p, b"").unwrap();
        assert!(is_text(&p));
    }

    #[test]
    fn invalid_utf8_is_binary() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("b.bin");
        fs::write(&p, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        assert!(!is_text(&p));
    }

    #[test]
    fn truncated_multibyte_at_window_edge_is_text() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("edge.txt");
        let mut bytes = vec![b'a'; TEXT_SNIFF_BYTES - 1];
        bytes.extend_from_slice("é".as_bytes()); // straddles the window
        fs::write(&p, &bytes).unwrap();
        assert!(is_text(&p));
    }

    #[test]
    fn missing_or_directory_is_not_text() {
        let dir = TempDir::new().unwrap();
        assert!(!is_text(&dir.path().join("nope")));
        assert!(!is_text(dir.path()));
    }

    #[cfg(unix)]
    #[test]
    fn fifo_is_not_opened() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("pipe");
        let made = std::process::Command::new("mkfifo").arg(&p).status();
        if !matches!(made, Ok(s) if s.success()) {
            return;
        }
        assert!(!is_text(&p));
    }
}
