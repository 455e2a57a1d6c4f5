//! Application configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use dp_core::ViewStateConfig;

use crate::cli::Cli;

/// Settings for one run of the preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Where the view state is persisted; in memory only when unset
    pub state_file: Option<PathBuf>,

    /// Log filter used when neither `--log-level` nor RUST_LOG is set
    pub log_level: String,

    pub view: ViewStateConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            log_level: "info".to_string(),
            view: ViewStateConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Configuration file (if any) with command line flags layered on top
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(state_file) = &cli.state_file {
            config.state_file = Some(state_file.clone());
        }
        if let Some(log_level) = &cli.log_level {
            config.log_level = log_level.clone();
        }
        Ok(config)
    }
}
