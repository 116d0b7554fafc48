//! TOML configuration file support for the plots command.
//!
//! Every key is optional; omitted keys keep the built-in layout:
//!
//! ```toml
//! # plots.toml
//! [plots]
//! width = 1600
//! height = 1200
//! frame_vmax = 4000.0
//! nsigma = 5.0
//!
//! [[plots.zooms]]
//! ticks = [0, 400]
//! channels = [1400, 1600]
//! title = "begin of track, V-plane"
//!
//! [[plots.waveforms]]
//! label = "V-plane start"
//! channels = [1540, 1530]
//! ticks = [100, 350]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use ssss_pdsp::plot::PlotConfig;
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Plot layout settings.
    #[serde(default)]
    pub plots: PlotConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
