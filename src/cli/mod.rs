//! Command-line interface for codebase-merger
//!
//! Clones a repository into a scoped temporary directory and merges its text
//! files into a single output file.

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::Shell;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::MergeStats;
use crate::fetch::{clone_repo, repo_name_from_url, CloneDir};
use crate::render::{merge_repository, write_report, MergeOptions};
use crate::scan::ExcludePatterns;
use crate::utils::format_with_commas;

/// Merge an entire repository codebase into a single file
#[derive(Parser)]
#[command(name = "codebase-merger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// URL of the repository to clone
    #[arg(value_name = "REPO_URL", required_unless_present = "completions")]
    repo_url: Option<String>,

    /// Output file path [default: merged_codebase.txt]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Regex pattern for paths to exclude (repeatable)
    #[arg(short, long, value_name = "REGEX", action = ArgAction::Append)]
    exclude: Vec<String>,

    /// Maximum file size in MB; 0 keeps only empty files [default: 5]
    #[arg(short, long, value_name = "MB")]
    max_size: Option<u64>,

    /// Path to config file (codebase-merger.toml or .codebase-merger.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a JSON run report to this path
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Omit the generation timestamp from the JSON report
    #[arg(long)]
    no_timestamp: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL", value_enum)]
    completions: Option<Shell>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

/// Install the stderr tracing subscriber.
///
/// RUST_LOG in the environment always takes precedence; `verbose` falls back to DEBUG.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "codebase-merger", &mut std::io::stdout());
        return Ok(());
    }

    let Some(repo_url) = cli.repo_url.as_deref() else {
        anyhow::bail!("A repository URL is required");
    };

    let cwd = std::env::current_dir()?;
    let base_config = load_config(&cwd, cli.config.as_deref())?;
    let overrides = CliOverrides {
        output: cli.output.clone(),
        exclude: (!cli.exclude.is_empty()).then(|| cli.exclude.clone()),
        max_size: cli.max_size,
    };
    let config = merge_cli_with_config(base_config, overrides);

    // Reject bad patterns before spending time on the clone.
    let exclude = ExcludePatterns::new(&config.exclude)?;
    tracing::debug!("Exclude patterns: {:?}", exclude.as_strs());

    let clone_dir = CloneDir::create()?;

    println!("Cloning repository: {}", repo_url);
    let spinner = clone_spinner();
    let cloned = clone_repo(repo_url, clone_dir.path());
    spinner.finish_and_clear();
    if !cloned {
        anyhow::bail!("Failed to clone the repository.");
    }

    println!("Processing repository...");
    let options = MergeOptions {
        max_file_bytes: config.max_file_bytes(),
        exclude,
        repo_name: Some(repo_name_from_url(repo_url)),
    };
    let stats =
        merge_repository(clone_dir.path(), &config.output, options, |msg| println!("  {}", msg))?;

    println!("Done! Processed {} files.", stats.files_included);
    println!("Output written to: {}", config.output.display());

    if cli.verbose {
        print_skip_summary(&stats);
    }

    if let Some(report_path) = &cli.report {
        write_report(report_path, repo_url, &config, &stats, !cli.no_timestamp)?;
        println!("Report written to: {}", report_path.display());
    }

    Ok(())
}

/// Stderr spinner shown while the clone runs; hidden when stderr is not a terminal.
fn clone_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Fetching...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn print_skip_summary(stats: &MergeStats) {
    println!("{}", style("Statistics:").bold());
    println!("  Files scanned: {}", stats.files_scanned);
    println!("  Files included: {}", style(stats.files_included).green());
    println!("  Skipped (pattern): {}", stats.files_skipped_pattern);
    println!("  Skipped (extension): {}", stats.files_skipped_extension);
    println!("  Skipped (size): {}", stats.files_skipped_size);
    println!("  Skipped (content type): {}", stats.files_skipped_content_type);
    println!("  Skipped (binary): {}", stats.files_skipped_binary);
    println!("  Skipped (encoding): {}", stats.files_skipped_encoding);
    println!("  Skipped (unreadable): {}", stats.files_skipped_unreadable);
    println!("  Directories pruned: {}", stats.dirs_pruned);
    println!("  Latin-1 fallbacks: {}", stats.latin1_fallbacks);
    if stats.read_errors > 0 {
        println!("  Read errors: {}", style(stats.read_errors).red());
    }
    println!("  Content bytes: {}", format_with_commas(stats.bytes_written));
}
