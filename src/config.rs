//! Sweep configuration.
//!
//! Everything a run needs travels in one explicit [`SweepConfig`] value
//! passed into the sweep entry point; there is no process-wide state. The
//! defaults mirror the standard afhq evaluation setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::SweepGrid;

/// Full configuration of a sweep run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Reference dataset directory the engine scores against.
    pub reference_path: PathBuf,
    /// Root directory holding one `steps_{n}_{eta token}` folder per point.
    pub samples_root: PathBuf,
    /// Sampling-step axis, outer loop, in sweep order.
    pub steps: Vec<u32>,
    /// Eta axis, inner loop, in sweep order.
    pub etas: Vec<f64>,
    /// Image resolution passed to the engine.
    pub image_size: u32,
    /// Batch size passed to the engine.
    pub batch_size: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            reference_path: PathBuf::from("./data/afhq/eval"),
            samples_root: PathBuf::from("./samples"),
            steps: vec![10, 20, 50, 100, 1000],
            etas: vec![0.0, 0.2, 0.5, 1.0],
            image_size: 256,
            batch_size: 64,
        }
    }
}

impl SweepConfig {
    /// Load a configuration from a JSON file.
    ///
    /// Missing fields fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Build the sweep grid for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEta`](crate::Error::UnknownEta) for an eta
    /// value without a registered folder token.
    pub fn grid(&self) -> Result<SweepGrid> {
        SweepGrid::new(&self.steps, &self.etas)
    }

    /// Total number of grid points this configuration will sweep.
    #[must_use]
    pub fn total_points(&self) -> usize {
        self.steps.len() * self.etas.len()
    }
}
