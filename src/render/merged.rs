//! Merged codebase rendering: one flat text file with a header block per source file.

use crate::domain::{MergeStats, DELIMITER_WIDTH};
use crate::scan::{ExcludePatterns, ScannedFile, TreeScanner};
use crate::utils::{dir_name, read_text_with_fallback, TextEncoding};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Options for a single merge run.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Maximum size of a merged file in bytes
    pub max_file_bytes: u64,

    /// User exclude patterns
    pub exclude: ExcludePatterns,

    /// Name shown in the `# MERGED CODEBASE:` line; defaults to the root's base name
    pub repo_name: Option<String>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: crate::domain::DEFAULT_MAX_FILE_BYTES,
            exclude: ExcludePatterns::default(),
            repo_name: None,
        }
    }
}

/// Writes the merged output for one repository root.
pub struct MergeWriter {
    root_path: PathBuf,
    options: MergeOptions,
    stats: MergeStats,
}

impl MergeWriter {
    pub fn new(root_path: PathBuf, options: MergeOptions) -> Self {
        Self { root_path, options, stats: MergeStats::default() }
    }

    /// Merge into `output_path` without progress reporting.
    pub fn merge(&mut self, output_path: &Path) -> Result<usize> {
        self.merge_with_progress(output_path, |_| {})
    }

    /// Merge into `output_path`, calling `progress` once per written file with
    /// a `Processing: <relative path>` line. Returns the number of files written.
    pub fn merge_with_progress<F>(&mut self, output_path: &Path, progress: F) -> Result<usize>
    where
        F: FnMut(&str),
    {
        let file = File::create(output_path)
            .with_context(|| format!("Failed creating output file: {}", output_path.display()))?;
        let mut out = BufWriter::new(file);

        let generated_at = output_path.display().to_string();
        let count = self.write_merged(&mut out, &generated_at, progress)?;

        out.flush()
            .with_context(|| format!("Failed writing output file: {}", output_path.display()))?;
        Ok(count)
    }

    /// Write the merged stream to any writer. `generated_at` fills the
    /// `# Generated at:` header line.
    pub fn write_merged<W, F>(
        &mut self,
        out: &mut W,
        generated_at: &str,
        mut progress: F,
    ) -> Result<usize>
    where
        W: Write,
        F: FnMut(&str),
    {
        let mut scanner = TreeScanner::new(self.root_path.clone())
            .max_file_bytes(self.options.max_file_bytes)
            .exclude_patterns(self.options.exclude.clone());
        let files = scanner.scan();
        self.stats = scanner.stats().clone();

        let repo_name =
            self.options.repo_name.clone().unwrap_or_else(|| dir_name(&self.root_path));
        write!(out, "# MERGED CODEBASE: {}\n# Generated at: {}\n\n", repo_name, generated_at)?;

        for file in &files {
            progress(&format!("Processing: {}", file.relative_path));
            self.write_file_block(out, file)?;
            self.stats.files_included += 1;
        }

        tracing::info!(
            "Merged {} of {} scanned files from {}",
            self.stats.files_included,
            self.stats.files_scanned,
            self.root_path.display()
        );
        Ok(self.stats.files_included)
    }

    fn write_file_block<W: Write>(&mut self, out: &mut W, file: &ScannedFile) -> Result<()> {
        let delimiter = "=".repeat(DELIMITER_WIDTH);
        write!(out, "{delimiter}\nFILE: {}\n{delimiter}\n\n", file.relative_path)?;

        match read_text_with_fallback(&file.path) {
            Ok((content, encoding)) => {
                if encoding == TextEncoding::Latin1 {
                    tracing::debug!("Decoded {} as Latin-1", file.relative_path);
                    self.stats.latin1_fallbacks += 1;
                }
                out.write_all(content.as_bytes())?;
                self.stats.bytes_written += content.len() as u64;
            }
            Err(err) => {
                tracing::warn!("Could not read {}: {:#}", file.relative_path, err);
                self.stats.read_errors += 1;
                writeln!(out, "[Error reading file: {:#}]", err)?;
            }
        }

        out.write_all(b"\n\n")?;
        Ok(())
    }

    /// Statistics from the last merge
    pub fn stats(&self) -> &MergeStats {
        &self.stats
    }
}

/// Merge `root` into `output_path`; returns the statistics of the run.
pub fn merge_repository<F>(
    root: &Path,
    output_path: &Path,
    options: MergeOptions,
    progress: F,
) -> Result<MergeStats>
where
    F: FnMut(&str),
{
    let mut writer = MergeWriter::new(root.to_path_buf(), options);
    writer.merge_with_progress(output_path, progress)?;
    Ok(writer.stats().clone())
}
