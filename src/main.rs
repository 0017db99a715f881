//! codebase-merger: Merge a repository into a single annotated text file
//!
//! Clones the repository shallowly, filters out binary and generated content,
//! and concatenates the remaining text files with per-file headers.

use anyhow::Result;

fn main() -> Result<()> {
    codebase_merger::cli::run()
}
