//! Report JSON generation.

use crate::domain::{Config, MergeStats, REPORT_SCHEMA_VERSION};
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{Map, Value};
use std::path::Path;

pub fn write_report(
    report_path: &Path,
    repo_url: &str,
    config: &Config,
    stats: &MergeStats,
    include_timestamp: bool,
) -> Result<()> {
    let mut report = Map::new();
    report.insert("schema_version".to_string(), Value::String(REPORT_SCHEMA_VERSION.to_string()));
    if include_timestamp {
        report.insert(
            "generated_at".to_string(),
            Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        );
    }
    report.insert("repo_url".to_string(), Value::String(repo_url.to_string()));
    report.insert("output_file".to_string(), Value::String(config.output.display().to_string()));
    report.insert("config".to_string(), serde_json::to_value(config)?);
    report.insert("stats".to_string(), serde_json::to_value(stats)?);

    if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(report_path, serde_json::to_string_pretty(&Value::Object(report))?)
        .with_context(|| format!("Failed writing report: {}", report_path.display()))?;
    Ok(())
}
