use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pairplot.json";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory searched for `.csv` input files.
    pub data_dir: PathBuf,
    /// Directory receiving the rendered `.png` files.
    pub output_dir: PathBuf,
    /// Categorical column used to stratify observations.
    pub group_column: String,
    pub plot: PlotSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            group_column: "z".to_string(),
            plot: PlotSettings::default(),
        }
    }
}

/// Pixel dimensions of the rendered figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    /// Edge length of one pairplot cell.
    pub cell_size: u32,
    pub scatter_size: (u32, u32),
    pub scatter_box_size: (u32, u32),
    /// Marker radius.
    pub marker_size: u32,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            cell_size: 250,
            scatter_size: (1000, 800),
            scatter_box_size: (1200, 1000),
            marker_size: 4,
        }
    }
}

impl Config {
    /// Defaults, then the JSON file, then command-line flags. Relative
    /// directories are resolved against `cwd`.
    pub fn resolve(cli: &Cli, cwd: &Path) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = cwd.join(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::from_file(&implicit)?
                } else {
                    debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    Self::default()
                }
            }
        };

        if let Some(dir) = &cli.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &cli.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(col) = &cli.group_column {
            config.group_column = col.clone();
        }

        config.data_dir = cwd.join(&config.data_dir);
        config.output_dir = cwd.join(&config.output_dir);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }
}
