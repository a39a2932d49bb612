//! Metric engine boundary.
//!
//! The FID computation itself is an external collaborator: an opaque scoring
//! function over two image-sample directories. The sweep only needs the
//! [`MetricEngine`] trait; per-point failures cross this boundary as
//! [`anyhow::Error`] and are converted into result statuses by the runner.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context};

/// External FID-style scoring engine.
///
/// Implementations compare a generated sample set against the reference set
/// and return a scalar score (lower is better). A blanket impl lets plain
/// closures stand in for the engine in tests.
pub trait MetricEngine {
    /// Score `sample` against `reference` with fixed engine parameters.
    ///
    /// # Errors
    ///
    /// Whatever the underlying engine reports. The sweep runner records the
    /// failure against the grid point being scored and continues.
    fn score(
        &self,
        reference: &Path,
        sample: &Path,
        image_size: u32,
        batch_size: u32,
    ) -> anyhow::Result<f64>;
}

impl<F> MetricEngine for F
where
    F: Fn(&Path, &Path, u32, u32) -> anyhow::Result<f64>,
{
    fn score(
        &self,
        reference: &Path,
        sample: &Path,
        image_size: u32,
        batch_size: u32,
    ) -> anyhow::Result<f64> {
        self(reference, sample, image_size, batch_size)
    }
}

/// Engine that shells out to an external scorer process.
///
/// The command is invoked as
/// `<program> <reference> <sample> --img-size <n> --batch-size <n>` and must
/// print the score as the last non-empty line of stdout.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
}

impl CommandEngine {
    /// Create an engine wrapping the given scorer executable.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the wrapped scorer executable.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl MetricEngine for CommandEngine {
    fn score(
        &self,
        reference: &Path,
        sample: &Path,
        image_size: u32,
        batch_size: u32,
    ) -> anyhow::Result<f64> {
        let output = Command::new(&self.program)
            .arg(reference)
            .arg(sample)
            .arg("--img-size")
            .arg(image_size.to_string())
            .arg("--batch-size")
            .arg(batch_size.to_string())
            .output()
            .with_context(|| format!("failed to launch {}", self.program.display()))?;

        if !output.status.success() {
            bail!(
                "engine exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let last = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .context("engine produced no output")?;

        last.parse::<f64>()
            .with_context(|| format!("engine output is not a number: {last:?}"))
    }
}
