//! Shallow repository cloning

use anyhow::{Context, Result};
use git2::build::RepoBuilder;
use git2::FetchOptions;
use std::path::Path;

/// Clone `url` into `target` at depth 1.
///
/// Returns `false` on any failure; the reason is only logged at debug level.
/// Nothing is retried.
pub fn clone_repo(url: &str, target: &Path) -> bool {
    match try_clone(url, target) {
        Ok(()) => {
            tracing::info!("Cloned {} into {}", url, target.display());
            true
        }
        Err(err) => {
            tracing::debug!("Clone of {} failed: {:#}", url, err);
            false
        }
    }
}

fn try_clone(url: &str, target: &Path) -> Result<()> {
    let normalized = normalize_github_url(url);
    let url = normalized.as_str();

    if is_local_source(url) {
        // Local transports do not negotiate shallow fetches; the checkout is
        // already a snapshot of the working copy's history.
        RepoBuilder::new()
            .clone(url, target)
            .with_context(|| format!("Local clone from {url} failed"))?;
    } else {
        shallow_clone(url, target)?;
    }
    Ok(())
}

/// Shallow clone (depth=1) the default branch.
fn shallow_clone(url: &str, dest: &Path) -> Result<()> {
    let mut fo = FetchOptions::new();
    fo.depth(1);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fo);

    builder.clone(url, dest).with_context(|| format!("Shallow clone from {url} failed"))?;
    Ok(())
}

fn is_local_source(url: &str) -> bool {
    url.starts_with("file://") || (!url.contains("://") && Path::new(url).is_dir())
}

/// Normalize a GitHub URL to the canonical HTTPS `.git` form.
///
/// Examples:
/// - `https://github.com/owner/repo`    → `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo/`   → `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo.git`→ unchanged
/// - non-GitHub URLs                    → trailing slash removed
pub fn normalize_github_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.contains("github.com") && !trimmed.ends_with(".git") {
        format!("{}.git", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Repository name shown in the merged header: the last URL or path segment
/// without a `.git` suffix.
pub fn repo_name_from_url(url: &str) -> String {
    let trimmed = url.trim_end_matches(['/', '\\']);
    let last = trimmed.rsplit(['/', '\\', ':']).next().unwrap_or(trimmed);
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        "repository".to_string()
    } else {
        name.to_string()
    }
}
