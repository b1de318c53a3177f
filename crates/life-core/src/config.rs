//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Engine construction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,
    /// Fill the first generation with random cells
    pub randomize: bool,
    /// Generation cap; `None` runs until the grid settles
    pub max_generations: Option<u64>,
    /// Random seed for reproducibility; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: 24,
            cols: 80,
            randomize: true,
            max_generations: None,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn size(&self) -> Size {
        Size::new(self.rows, self.cols)
    }

    /// Reject shapes and caps the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        validate_size(self.size())?;
        validate_max_generations(self.max_generations)
    }
}

pub fn validate_size(size: Size) -> Result<()> {
    if size.rows == 0 || size.cols == 0 {
        return Err(Error::Configuration(format!(
            "grid dimensions must be positive, got {}",
            size
        )));
    }
    Ok(())
}

pub fn validate_max_generations(max_generations: Option<u64>) -> Result<()> {
    if max_generations == Some(0) {
        return Err(Error::Configuration(
            "max_generations must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Settings for the terminal host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub engine: EngineConfig,
    /// Delay between frames (milliseconds)
    pub tick_ms: u64,
    pub alive_char: char,
    pub dead_char: char,
    /// Draw a frame around the grid
    pub border: bool,
    /// Leave the loop once the grid stops changing
    pub stop_when_settled: bool,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            tick_ms: 100,
            alive_char: '1',
            dead_char: ' ',
            border: true,
            stop_when_settled: true,
            log_filter: "info".to_string(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.engine.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading console configuration from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
