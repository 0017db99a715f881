//! Repository tree scanner applying the inclusion filter during the walk

use crate::domain::{MergeStats, SkipReason, DEFAULT_MAX_FILE_BYTES};
use crate::scan::filter::{should_include_dir, ExcludePatterns, InclusionPolicy};
use crate::utils::relative_path;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A file that passed every inclusion rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Absolute path to the file
    pub path: PathBuf,

    /// `/`-separated path relative to the scan root
    pub relative_path: String,

    /// File size in bytes at scan time
    pub size_bytes: u64,
}

/// Depth-first scanner that prunes denied directories before descending.
pub struct TreeScanner {
    root_path: PathBuf,
    exclude: ExcludePatterns,
    policy: InclusionPolicy,
    stats: MergeStats,
}

impl TreeScanner {
    /// Create a new TreeScanner with the default size cap and no exclude patterns.
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            exclude: ExcludePatterns::default(),
            policy: InclusionPolicy::new(DEFAULT_MAX_FILE_BYTES),
            stats: MergeStats::default(),
        }
    }

    /// Set the user exclude patterns
    pub fn exclude_patterns(mut self, exclude: ExcludePatterns) -> Self {
        self.exclude = exclude;
        self
    }

    /// Set maximum file size in bytes
    pub fn max_file_bytes(mut self, max_bytes: u64) -> Self {
        self.policy = InclusionPolicy::new(max_bytes);
        self
    }

    /// Walk the tree and return the files to merge, in walk order.
    ///
    /// At every level files come before subdirectories and each group is sorted
    /// by name, so the order is stable across runs. Directory links are never
    /// descended; a file link is merged under its own path when its target is
    /// a regular file inside the root. Unreadable entries are skipped.
    pub fn scan(&mut self) -> Vec<ScannedFile> {
        self.stats = MergeStats::default();

        let root = self.root_path.clone();
        let canonical_root = fs::canonicalize(&root).unwrap_or_else(|_| root.clone());
        let exclude = self.exclude.clone();
        let mut dirs_pruned = 0usize;
        let mut files = Vec::new();

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by(files_then_dirs)
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                let rel_path = relative_path(&root, entry.path()).unwrap_or_default();
                let keep = should_include_dir(&name, &rel_path, &exclude);
                if !keep {
                    tracing::debug!("Pruned directory: {}", rel_path);
                    dirs_pruned += 1;
                }
                keep
            });

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                if !is_contained_file_link(entry.path(), &canonical_root) {
                    tracing::debug!("Skipping symlink: {}", entry.path().display());
                    continue;
                }
            } else if !file_type.is_file() {
                continue;
            }

            self.stats.files_scanned += 1;

            let path = entry.path();
            let Some(rel_path) = relative_path(&root, path) else {
                continue;
            };

            if exclude.matches(&rel_path) {
                self.skip(&rel_path, SkipReason::Pattern);
                continue;
            }

            if let Err(reason) = self.policy.check_file(path) {
                self.skip(&rel_path, reason);
                continue;
            }

            let size_bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            files.push(ScannedFile { path: path.to_path_buf(), relative_path: rel_path, size_bytes });
        }

        self.stats.dirs_pruned = dirs_pruned;
        files
    }

    fn skip(&mut self, rel_path: &str, reason: SkipReason) {
        tracing::debug!("Skipped {} ({:?})", rel_path, reason);
        self.stats.record_skip(reason);
    }

    /// Get scanning statistics
    pub fn stats(&self) -> &MergeStats {
        &self.stats
    }
}

/// True when `link` resolves to a regular file under `canonical_root`.
/// Dangling links, links to directories and links escaping the root are false.
fn is_contained_file_link(link: &Path, canonical_root: &Path) -> bool {
    match fs::canonicalize(link) {
        Ok(target) => target.starts_with(canonical_root) && target.is_file(),
        Err(_) => false,
    }
}

fn files_then_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}
