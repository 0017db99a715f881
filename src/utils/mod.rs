//! Utility functions

pub mod content_type;
pub mod encoding;
pub mod paths;

pub use content_type::{guess_content_type, is_text_like};
pub use encoding::{read_sniff_window, read_text_with_fallback, sniff_text, TextEncoding};
pub use paths::{dir_name, normalize_path, relative_path};

/// Format a number with thousands separators (e.g. 1048576 → "1,048,576").
pub fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let bytes = s.as_bytes();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, &b) in bytes.iter().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(b as char);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::format_with_commas;

    #[test]
    fn formats_thousands() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(999), "999");
        assert_eq!(format_with_commas(1_048_576), "1,048,576");
    }
}
