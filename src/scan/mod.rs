//! Repository scanning: inclusion rules and the pruning tree walk

pub mod filter;
pub mod scanner;

pub use filter::{should_include_dir, ExcludePatterns, InclusionPolicy, PatternError};
pub use scanner::{ScannedFile, TreeScanner};
