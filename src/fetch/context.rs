//! Scoped working directory for a cloned repository

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static SEQUENCE: AtomicUsize = AtomicUsize::new(0);

/// Temporary directory owned by one merge run, removed on drop.
#[derive(Debug)]
pub struct CloneDir {
    root_path: PathBuf,
}

impl CloneDir {
    /// Create a fresh, empty directory under the system temp dir.
    pub fn create() -> Result<Self> {
        let root_path = build_temp_repo_dir();
        std::fs::create_dir_all(&root_path)
            .with_context(|| format!("Failed creating temp directory: {}", root_path.display()))?;
        tracing::debug!("Created clone directory {}", root_path.display());
        Ok(Self { root_path })
    }

    pub fn path(&self) -> &Path {
        &self.root_path
    }
}

impl Drop for CloneDir {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_dir_all(&self.root_path) {
            tracing::warn!("Failed removing {}: {}", self.root_path.display(), err);
        }
    }
}

fn build_temp_repo_dir() -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
    let pid = std::process::id();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    env::temp_dir().join(format!("codebase-merger-{pid}-{nanos}-{seq}"))
}
