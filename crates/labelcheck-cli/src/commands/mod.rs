//! Subcommands.

pub mod compare;
pub mod config;
pub mod extract;
pub mod merge;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use labelcheck_core::LabelCheckConfig;

/// `<config_dir>/labelcheck/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("labelcheck")
        .join("config.json")
}

/// Explicit `--config` path, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LabelCheckConfig> {
    if let Some(path) = config_path {
        return LabelCheckConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to read config {}", path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config at {}", default_path.display());
        return LabelCheckConfig::from_file(&default_path)
            .with_context(|| format!("Failed to read config {}", default_path.display()));
    }

    Ok(LabelCheckConfig::default())
}

/// Read an input file, failing early with its path in the message.
pub fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn spinner(message: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}
