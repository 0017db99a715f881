//! Output rendering (merged codebase file and JSON run report)

pub mod merged;
pub mod report;

pub use merged::{merge_repository, MergeOptions, MergeWriter};
pub use report::write_report;
