//! Configuration file support for sessview.
//!
//! Loads defaults from `sessview.toml` in the working directory, falling back
//! to `<config dir>/sessview/config.toml`. Command-line flags always win.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use sessview_logging::LogFormat;
use sessview_render::ReportMode;

/// Defaults loaded from a config file
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ReaderConfig {
    /// Report mode used when `--mode` is not given
    pub mode: Option<String>,
    /// Max characters per content block (0 = unlimited)
    pub max_content: Option<usize>,
    /// Max user turns shown (0 = all)
    pub limit: Option<usize>,
    /// Set to false to disable coloured output
    pub color: Option<bool>,
    /// Tracing filter, e.g. `warn` or `sessview_sessions=debug`
    pub log_level: Option<String>,
    /// `pretty`, `json` or `compact`
    pub log_format: Option<String>,
}

/// The per-project config file name
pub const CONFIG_FILE_NAME: &str = "sessview.toml";

impl ReaderConfig {
    /// Load configuration for `working_dir`.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if a config file exists and parses successfully
    /// - `Ok(None)` if no config file exists
    /// - `Err(...)` if a file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let local = working_dir.join(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load_file(&local).map(Some);
        }

        match Self::user_config_path() {
            Some(path) if path.exists() => Self::load_file(&path).map(Some),
            _ => Ok(None),
        }
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sessview").join("config.toml"))
    }

    pub fn mode(&self) -> Result<Option<ReportMode>> {
        self.mode
            .as_deref()
            .map(|m| m.parse().map_err(anyhow::Error::msg))
            .transpose()
            .context("Invalid `mode` in config")
    }

    pub fn log_format(&self) -> Result<Option<LogFormat>> {
        self.log_format
            .as_deref()
            .map(|f| f.parse().map_err(anyhow::Error::msg))
            .transpose()
            .context("Invalid `log_format` in config")
    }

    pub fn color_enabled(&self) -> bool {
        self.color.unwrap_or(true)
    }
}
