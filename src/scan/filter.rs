//! Inclusion filter: decides which files and directories take part in a merge.

use crate::domain::{SkipReason, DEFAULT_MAX_FILE_BYTES, SKIP_DIRS, SKIP_EXTENSIONS};
use crate::utils::{guess_content_type, is_text_like, read_sniff_window, sniff_text};
use regex::Regex;
use std::path::Path;
use thiserror::Error;

/// An exclude pattern that failed to compile.
#[derive(Debug, Error)]
#[error("invalid exclude pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Ordered set of user exclude patterns, matched against repository-relative paths.
#[derive(Debug, Clone, Default)]
pub struct ExcludePatterns {
    patterns: Vec<Regex>,
}

impl ExcludePatterns {
    /// Compile every pattern, failing on the first invalid one.
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern)
                    .map_err(|source| PatternError { pattern: pattern.to_string(), source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True if any pattern is found anywhere in `rel_path` (unanchored search).
    pub fn matches(&self, rel_path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(rel_path))
    }

    pub fn as_strs(&self) -> Vec<&str> {
        self.patterns.iter().map(Regex::as_str).collect()
    }
}

/// Per-file inclusion rules: extension denylist, size cap, content-type guess and sniffing.
#[derive(Debug, Clone, Copy)]
pub struct InclusionPolicy {
    max_file_bytes: u64,
}

impl Default for InclusionPolicy {
    fn default() -> Self {
        Self { max_file_bytes: DEFAULT_MAX_FILE_BYTES }
    }
}

impl InclusionPolicy {
    pub fn new(max_file_bytes: u64) -> Self {
        Self { max_file_bytes }
    }

    /// Run the file rules in order; the first failing rule decides the reason.
    ///
    /// Any I/O failure is reported as [`SkipReason::Unreadable`].
    pub fn check_file(&self, path: &Path) -> Result<(), SkipReason> {
        if has_skipped_extension(path) {
            return Err(SkipReason::Extension);
        }

        let metadata = path.metadata().map_err(|_| SkipReason::Unreadable)?;
        if metadata.len() > self.max_file_bytes {
            return Err(SkipReason::Size);
        }

        if let Some(content_type) = guess_content_type(path) {
            if !is_text_like(content_type) {
                return Err(SkipReason::ContentType);
            }
        }

        let sample = read_sniff_window(path).map_err(|_| SkipReason::Unreadable)?;
        sniff_text(&sample)
    }

    pub fn should_include_file(&self, path: &Path) -> bool {
        self.check_file(path).is_ok()
    }
}

fn has_skipped_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext_with_dot = format!(".{}", ext.to_lowercase());
    SKIP_EXTENSIONS.contains(ext_with_dot.as_str())
}

/// Whether a directory should be descended into.
///
/// `name` is the directory's base name, `rel_path` its `/`-separated path
/// relative to the walk root.
pub fn should_include_dir(name: &str, rel_path: &str, exclude: &ExcludePatterns) -> bool {
    if SKIP_DIRS.contains(name) {
        return false;
    }
    !exclude.matches(rel_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn denied_extension_rejected_regardless_of_content() {
        let tmp = TempDir::new().unwrap();
        for name in ["photo.PNG", "lib.so", "archive.zip", "Main.class", "doc.pdf"] {
            let path = tmp.path().join(name);
            fs::write(&path, "plain text content\n").unwrap();
            assert_eq!(
                InclusionPolicy::default().check_file(&path),
                Err(SkipReason::Extension),
                "{name}"
            );
        }
    }

    #[test]
    fn oversized_file_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("big.txt");
        fs::write(&path, "a".repeat(101)).unwrap();

        assert_eq!(InclusionPolicy::new(100).check_file(&path), Err(SkipReason::Size));
        assert!(InclusionPolicy::new(101).should_include_file(&path));
    }

    #[test]
    fn non_text_content_type_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("module.wasm");
        fs::write(&path, "looks like text").unwrap();

        assert_eq!(InclusionPolicy::default().check_file(&path), Err(SkipReason::ContentType));
    }

    #[test]
    fn null_byte_in_window_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.custom");
        let mut content = b"header text".to_vec();
        content.push(0);
        fs::write(&path, content).unwrap();

        assert_eq!(InclusionPolicy::default().check_file(&path), Err(SkipReason::Binary));
    }

    #[test]
    fn null_byte_after_window_not_inspected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("late.custom");
        let mut content = vec![b'x'; 2048];
        content.push(0);
        fs::write(&path, content).unwrap();

        assert!(InclusionPolicy::default().should_include_file(&path));
    }

    #[test]
    fn invalid_utf8_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("legacy.custom");
        fs::write(&path, [b'c', b'a', b'f', 0xe9, b'\n']).unwrap();

        assert_eq!(InclusionPolicy::default().check_file(&path), Err(SkipReason::Encoding));
    }

    #[test]
    fn utf8_text_accepted() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("README.md");
        fs::write(&path, "# Test Repository\nThis is a test repository.\n").unwrap();
        let no_ext = tmp.path().join("Makefile");
        fs::write(&no_ext, "all:\n\techo ok\n").unwrap();

        assert!(InclusionPolicy::default().should_include_file(&path));
        assert!(InclusionPolicy::default().should_include_file(&no_ext));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gone.txt");
        assert_eq!(InclusionPolicy::default().check_file(&path), Err(SkipReason::Unreadable));
    }

    #[test]
    fn patterns_keep_order_and_search_unanchored() {
        let patterns = ExcludePatterns::new(["^src/test/", r"\.lock$"]).unwrap();
        assert_eq!(patterns.as_strs(), vec!["^src/test/", r"\.lock$"]);
        assert!(patterns.matches("src/test/test_app.py"));
        assert!(patterns.matches("deep/Cargo.lock"));
        assert!(!patterns.matches("src/main/app.py"));
        assert!(!patterns.matches("a/src/test/x.py"));
    }

    #[test]
    fn invalid_pattern_reports_source() {
        let err = ExcludePatterns::new(["ok", "(unclosed"]).unwrap_err();
        assert_eq!(err.pattern, "(unclosed");
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn dir_rules() {
        let none = ExcludePatterns::default();
        assert!(!should_include_dir(".git", ".git", &none));
        assert!(!should_include_dir("node_modules", "web/node_modules", &none));
        assert!(should_include_dir("src", "src", &none));

        let patterns = ExcludePatterns::new(["^docs$"]).unwrap();
        assert!(!should_include_dir("docs", "docs", &patterns));
        assert!(should_include_dir("docs", "site/docs", &patterns));
    }
}
