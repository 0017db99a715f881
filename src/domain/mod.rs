//! Core domain types and constants
//!
//! Holds the fixed inclusion policy tables, the merge configuration, and the
//! statistics collected during a merge run.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Current report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Number of leading bytes inspected by the binary/text heuristic.
pub const SNIFF_WINDOW: usize = 1024;

/// Width of the `=` delimiter line around each file header.
pub const DELIMITER_WIDTH: usize = 80;

pub const BYTES_PER_MB: u64 = 1024 * 1024;

pub const DEFAULT_MAX_SIZE_MB: u64 = 5;

pub const DEFAULT_MAX_FILE_BYTES: u64 = DEFAULT_MAX_SIZE_MB * BYTES_PER_MB;

pub const DEFAULT_OUTPUT_FILE: &str = "merged_codebase.txt";

/// Binary, archive and media extensions that are never merged (lowercase, with leading dot).
pub static SKIP_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Executables and libraries
        ".exe", ".dll", ".so", ".dylib", ".jar", ".war", ".ear",
        // Archives
        ".zip", ".tar", ".gz", ".rar", ".7z",
        // Media
        ".mp3", ".mp4", ".avi", ".mov", ".mkv", ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".tiff",
        ".ico", ".svg",
        // Office documents
        ".pdf", ".doc", ".docx", ".ppt", ".pptx", ".xls", ".xlsx",
        // Compiled bytecode
        ".pyc", ".pyd", ".pyo", ".class",
    ]
    .into_iter()
    .collect()
});

/// Directory names that are never descended into.
pub static SKIP_DIRS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Version control and editor metadata
        ".git", ".idea", ".vscode", ".DS_Store",
        // Dependency caches and virtualenvs
        "node_modules", "venv", "env", ".env", ".venv", "__pycache__", "vendor", "packages",
        "bower_components",
        // Build output
        "build", "dist", "target", "out", "bin", "obj", ".next", ".nuxt",
    ]
    .into_iter()
    .collect()
});

/// Why the inclusion filter rejected a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Relative path matched a user exclude pattern
    Pattern,
    /// Extension is on the binary/archive/media denylist
    Extension,
    /// File is larger than the configured cap
    Size,
    /// Content-type guess is not text-like
    ContentType,
    /// Null byte inside the sniff window
    Binary,
    /// Sniff window is not valid UTF-8
    Encoding,
    /// Metadata or content could not be read
    Unreadable,
}

/// Statistics from one merge run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Regular files visited (before filtering)
    pub files_scanned: usize,

    /// Files written to the merged output
    pub files_included: usize,

    pub files_skipped_pattern: usize,
    pub files_skipped_extension: usize,
    pub files_skipped_size: usize,
    pub files_skipped_content_type: usize,
    pub files_skipped_binary: usize,
    pub files_skipped_encoding: usize,
    pub files_skipped_unreadable: usize,

    /// Directories pruned by name or exclude pattern
    pub dirs_pruned: usize,

    /// Files whose content was decoded as Latin-1 because it was not valid UTF-8
    pub latin1_fallbacks: usize,

    /// Files replaced by an inline error placeholder
    pub read_errors: usize,

    /// Bytes of file content written (excluding headers)
    pub bytes_written: u64,
}

impl MergeStats {
    pub fn record_skip(&mut self, reason: SkipReason) {
        let counter = match reason {
            SkipReason::Pattern => &mut self.files_skipped_pattern,
            SkipReason::Extension => &mut self.files_skipped_extension,
            SkipReason::Size => &mut self.files_skipped_size,
            SkipReason::ContentType => &mut self.files_skipped_content_type,
            SkipReason::Binary => &mut self.files_skipped_binary,
            SkipReason::Encoding => &mut self.files_skipped_encoding,
            SkipReason::Unreadable => &mut self.files_skipped_unreadable,
        };
        *counter += 1;
    }

    pub fn files_skipped(&self) -> usize {
        self.files_skipped_pattern
            + self.files_skipped_extension
            + self.files_skipped_size
            + self.files_skipped_content_type
            + self.files_skipped_binary
            + self.files_skipped_encoding
            + self.files_skipped_unreadable
    }
}

/// Custom deserializer for exclude patterns: accepts a single pattern string or a list.
///
/// Strings are not split on commas since regular expressions may contain them
/// (e.g. `\d{1,3}`). Order is preserved and blank entries are dropped.
fn deserialize_patterns<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct PatternsVisitor;

    impl<'de> Visitor<'de> for PatternsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a regex pattern string or a list of patterns")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(vec![trimmed.to_string()])
            }
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut result = Vec::new();
            while let Some(pattern) = seq.next_element::<String>()? {
                let trimmed = pattern.trim();
                if !trimmed.is_empty() {
                    result.push(trimmed.to_string());
                }
            }
            Ok(result)
        }
    }

    deserializer.deserialize_any(PatternsVisitor)
}

/// Effective configuration for a merge run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Output file path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Ordered regex patterns matched against repository-relative paths
    #[serde(default, alias = "exclude_patterns", deserialize_with = "deserialize_patterns")]
    pub exclude: Vec<String>,

    /// Maximum file size in megabytes
    #[serde(default = "default_max_size", alias = "max_size_mb")]
    pub max_size: u64,
}

impl Config {
    pub fn max_file_bytes(&self) -> u64 {
        self.max_size.saturating_mul(BYTES_PER_MB)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { output: default_output(), exclude: Vec::new(), max_size: default_max_size() }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

fn default_max_size() -> u64 {
    DEFAULT_MAX_SIZE_MB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cap_is_five_mebibytes() {
        assert_eq!(Config::default().max_file_bytes(), 5 * 1024 * 1024);
        assert_eq!(DEFAULT_MAX_FILE_BYTES, 5_242_880);
    }

    #[test]
    fn skip_tables_are_lowercase_dot_prefixed() {
        assert!(SKIP_EXTENSIONS.iter().all(|ext| ext.starts_with('.')));
        assert!(SKIP_EXTENSIONS.iter().all(|ext| *ext == ext.to_lowercase()));
        assert!(SKIP_DIRS.contains(".git"));
        assert!(SKIP_DIRS.contains("node_modules"));
    }

    #[test]
    fn record_skip_updates_matching_counter() {
        let mut stats = MergeStats::default();
        stats.record_skip(SkipReason::Binary);
        stats.record_skip(SkipReason::Binary);
        stats.record_skip(SkipReason::Pattern);
        assert_eq!(stats.files_skipped_binary, 2);
        assert_eq!(stats.files_skipped_pattern, 1);
        assert_eq!(stats.files_skipped(), 3);
    }
}
