//! Codebase-Merger: Flatten a repository into one LLM-friendly text file
//!
//! This library provides the inclusion filter, the pruning tree walk, the
//! merged-output writer, and the clone/worker plumbing shared by the
//! command-line and interactive form front-ends.

pub mod cli;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod form;
pub mod render;
pub mod scan;
pub mod utils;
