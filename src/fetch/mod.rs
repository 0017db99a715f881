//! Repository fetching into a scoped temporary directory

pub mod context;
pub mod git;

pub use context::CloneDir;
pub use git::{clone_repo, normalize_github_url, repo_name_from_url};
