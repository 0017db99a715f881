//! Path normalization

use std::path::Path;

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// Path of `path` relative to `root`, `/`-separated.
///
/// Returns `None` when `path` is not under `root`. Non-UTF-8 components are
/// rendered lossily.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(normalize_path(rel.to_string_lossy().as_ref()))
}

/// Base name of a directory, falling back to "." for roots like `/`.
pub fn dir_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| ".".to_string())
}
