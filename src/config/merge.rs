//! CLI argument merging with config

use crate::domain::Config;
use std::path::PathBuf;

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
    pub max_size: Option<u64>,
}

/// Apply CLI values on top of the loaded config. A CLI exclude list replaces
/// the configured one rather than extending it.
pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(output) = cli.output {
        base_config.output = output;
    }
    if let Some(exclude) = cli.exclude {
        base_config.exclude = exclude;
    }
    if let Some(max_size) = cli.max_size {
        base_config.max_size = max_size;
    }
    base_config
}
