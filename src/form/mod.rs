//! Desktop form front-end.
//!
//! Collects the same inputs as the command line (repository URL, output file,
//! size cap, exclusion list) in a native window and hands the run to a
//! background worker. Widgets are only touched on the UI thread.

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use regex::Regex;
use std::path::PathBuf;
use thiserror::Error;

use crate::cli::init_tracing;
use crate::config::load_config;
use crate::domain::{Config, BYTES_PER_MB};
use crate::scan::ExcludePatterns;

pub mod app;
pub mod worker;

pub use app::{Dialog, MergerApp};
pub use worker::{DialogKind, MergeController, MergeJob, RunRejected, WorkerEvent, POLL_INTERVAL};

pub const WINDOW_TITLE: &str = "GitHub Codebase Merger";

pub const MIN_SIZE_MB: u64 = 1;
pub const MAX_SIZE_MB: u64 = 100;

/// Exclusions the form starts with when the config file supplies none.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[r"\.git/.*", "node_modules/.*", "__pycache__/.*"];

/// Desktop form for merging a repository into a single file
#[derive(Parser)]
#[command(name = "codebase-merger-form")]
#[command(author, version, about, long_about = None)]
struct FormArgs {
    /// Path to config file used to pre-fill the form
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter a repository URL.")]
    MissingRepoUrl,
    #[error("Please specify an output file.")]
    MissingOutput,
    #[error("Max file size must be between 1 and 100 MB.")]
    MaxSizeOutOfRange,
    #[error("Exclusion pattern is empty.")]
    EmptyPattern,
    #[error("Pattern '{0}' is already in the list.")]
    DuplicatePattern(String),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Field values of the form. Mutated only by the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeForm {
    pub repo_url: String,
    pub output: String,
    max_size_mb: u64,
    exclusions: Vec<String>,
}

impl Default for MergeForm {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl MergeForm {
    /// Pre-fill the fields from a loaded config.
    ///
    /// Configured exclusions replace [`DEFAULT_EXCLUSIONS`]; invalid ones are
    /// dropped with a warning. The size is clamped into the form's range.
    pub fn from_config(config: &Config) -> Self {
        let mut form = Self {
            repo_url: String::new(),
            output: config.output.display().to_string(),
            max_size_mb: config.max_size.clamp(MIN_SIZE_MB, MAX_SIZE_MB),
            exclusions: Vec::new(),
        };

        if config.exclude.is_empty() {
            form.exclusions = DEFAULT_EXCLUSIONS.iter().map(|p| p.to_string()).collect();
        }
        for pattern in &config.exclude {
            if let Err(err) = form.add_exclusion(pattern) {
                tracing::warn!("Ignoring configured exclusion: {}", err);
            }
        }
        form
    }

    pub fn max_size_mb(&self) -> u64 {
        self.max_size_mb
    }

    pub fn set_max_size_mb(&mut self, size: u64) -> Result<(), FormError> {
        if !(MIN_SIZE_MB..=MAX_SIZE_MB).contains(&size) {
            return Err(FormError::MaxSizeOutOfRange);
        }
        self.max_size_mb = size;
        Ok(())
    }

    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    pub fn add_exclusion(&mut self, pattern: &str) -> Result<(), FormError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(FormError::EmptyPattern);
        }
        if self.exclusions.iter().any(|p| p == pattern) {
            return Err(FormError::DuplicatePattern(pattern.to_string()));
        }
        Regex::new(pattern).map_err(|err| FormError::InvalidPattern(err.to_string()))?;
        self.exclusions.push(pattern.to_string());
        Ok(())
    }

    pub fn remove_exclusion(&mut self, index: usize) -> Option<String> {
        (index < self.exclusions.len()).then(|| self.exclusions.remove(index))
    }

    pub fn clear_exclusions(&mut self) {
        self.exclusions.clear();
    }

    /// Lines written to the status log before the worker starts.
    pub fn run_summary(&self) -> Vec<String> {
        vec![
            "Starting merge process...".to_string(),
            format!("Repository: {}", self.repo_url.trim()),
            format!("Output file: {}", self.output.trim()),
            format!("Exclusions: {}", self.exclusions.join(", ")),
        ]
    }

    /// Validate the fields and build the job handed to the worker.
    pub fn to_job(&self) -> Result<MergeJob, FormError> {
        let repo_url = self.repo_url.trim();
        if repo_url.is_empty() {
            return Err(FormError::MissingRepoUrl);
        }
        let output = self.output.trim();
        if output.is_empty() {
            return Err(FormError::MissingOutput);
        }
        let exclude = ExcludePatterns::new(&self.exclusions)
            .map_err(|err| FormError::InvalidPattern(err.to_string()))?;

        Ok(MergeJob {
            repo_url: repo_url.to_string(),
            output: PathBuf::from(output),
            max_file_bytes: self.max_size_mb * BYTES_PER_MB,
            exclude,
        })
    }
}

pub fn run() -> Result<()> {
    let args = FormArgs::parse();
    init_tracing(args.verbose);

    let config = load_config(&std::env::current_dir()?, args.config.as_deref())?;
    let form = MergeForm::from_config(&config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([640.0, 620.0])
            .with_min_inner_size([480.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(MergerApp::new(form)))),
    )
    .map_err(|err| anyhow::anyhow!("Failed to open the form window: {err}"))
}
