//! Text sniffing and file reading with a Latin-1 fallback.
//!
//! This module provides:
//! - A bounded read of the sniff window used by the binary/text heuristic
//! - The null-byte and UTF-8 validity checks over that window
//! - Whole-file decoding: strict UTF-8 first, then Latin-1 (ISO-8859-1)

use crate::domain::{SkipReason, SNIFF_WINDOW};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Encoding actually used to decode a file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

/// Read at most [`SNIFF_WINDOW`] bytes from the start of the file.
pub fn read_sniff_window(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut sample = Vec::with_capacity(SNIFF_WINDOW);
    file.take(SNIFF_WINDOW as u64).read_to_end(&mut sample)?;
    Ok(sample)
}

/// Classify a sniff window as text.
///
/// Rejects with [`SkipReason::Binary`] when the window holds a null byte and with
/// [`SkipReason::Encoding`] when it is not valid UTF-8. The window is judged as a
/// whole, so a multi-byte character cut off by its end also fails.
pub fn sniff_text(sample: &[u8]) -> Result<(), SkipReason> {
    if sample.contains(&0) {
        return Err(SkipReason::Binary);
    }

    std::str::from_utf8(sample).map(|_| ()).map_err(|_| SkipReason::Encoding)
}

/// Read a whole file as text.
///
/// Strategy:
/// 1. Strict UTF-8 (content returned unchanged, BOM included)
/// 2. Latin-1, which maps every byte to the code point of the same value and
///    therefore cannot fail once the bytes are in memory
///
/// Only I/O failures produce an error.
pub fn read_text_with_fallback(path: &Path) -> Result<(String, TextEncoding)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

    match String::from_utf8(bytes) {
        Ok(content) => Ok((content, TextEncoding::Utf8)),
        Err(err) => {
            let bytes = err.into_bytes();
            let content = encoding_rs::mem::decode_latin1(&bytes).into_owned();
            Ok((content, TextEncoding::Latin1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sniff_window_is_bounded() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![b'a'; SNIFF_WINDOW * 3]).unwrap();
        file.flush().unwrap();

        let sample = read_sniff_window(file.path()).unwrap();
        assert_eq!(sample.len(), SNIFF_WINDOW);
    }

    #[test]
    fn test_sniff_short_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"short").unwrap();
        file.flush().unwrap();

        assert_eq!(read_sniff_window(file.path()).unwrap(), b"short");
    }

    #[test]
    fn test_null_byte_is_binary() {
        assert_eq!(sniff_text(&[0x00, 0x01, 0x02]), Err(SkipReason::Binary));
        assert_eq!(sniff_text(b"text\0more"), Err(SkipReason::Binary));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        assert_eq!(sniff_text(&[b'a', 0xff, b'b']), Err(SkipReason::Encoding));
    }

    #[test]
    fn test_empty_and_plain_text_accepted() {
        assert_eq!(sniff_text(b""), Ok(()));
        assert_eq!(sniff_text("héllo wörld".as_bytes()), Ok(()));
    }

    #[test]
    fn test_sequence_cut_by_full_window_rejected() {
        // 1023 ASCII bytes followed by the first byte of "é" (0xC3 0xA9)
        let mut sample = vec![b'a'; SNIFF_WINDOW - 1];
        sample.push(0xc3);
        assert_eq!(sniff_text(&sample), Err(SkipReason::Encoding));
    }

    #[test]
    fn test_file_with_character_straddling_window_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![b'a'; SNIFF_WINDOW - 1]).unwrap();
        file.write_all("é more text\n".as_bytes()).unwrap();
        file.flush().unwrap();

        let sample = read_sniff_window(file.path()).unwrap();
        assert_eq!(sample.len(), SNIFF_WINDOW);
        assert_eq!(sniff_text(&sample), Err(SkipReason::Encoding));
    }

    #[test]
    fn test_truncated_sequence_in_short_sample_rejected() {
        assert_eq!(sniff_text(&[b'a', b'b', 0xc3]), Err(SkipReason::Encoding));
    }

    #[test]
    fn test_read_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("Test content 🚀".as_bytes()).unwrap();
        file.flush().unwrap();

        let (content, encoding) = read_text_with_fallback(file.path()).unwrap();
        assert_eq!(content, "Test content 🚀");
        assert_eq!(encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_read_latin1_fallback() {
        let mut file = NamedTempFile::new().unwrap();
        // "café" in Latin-1
        file.write_all(&[b'c', b'a', b'f', 0xe9]).unwrap();
        file.flush().unwrap();

        let (content, encoding) = read_text_with_fallback(file.path()).unwrap();
        assert_eq!(content, "café");
        assert_eq!(encoding, TextEncoding::Latin1);
    }

    #[test]
    fn test_read_missing_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(read_text_with_fallback(&dir.path().join("missing.txt")).is_err());
    }
}
