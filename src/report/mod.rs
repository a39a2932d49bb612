//! Report artifacts: workbook, flat CSV, narrative text.
//!
//! All three artifacts render the same [`ResultSet`] + [`Aggregation`] pair;
//! no artifact recomputes a statistic on its own, so their numeric content
//! always agrees. Unlike per-point scoring failures, a failed artifact write
//! is fatal and aborts the run.
//!
//! Absent values (skipped or failed points) render as explicit nulls: a
//! blank workbook cell, an empty CSV field, `NaN` in the text table.

mod pivot_csv;
mod text;
mod workbook;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::aggregate::Aggregation;
use crate::error::Result;
use crate::sweep::{ResultSet, RunInfo};

/// Where the three artifacts are written.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    /// Workbook artifact (`fid_results.xlsx`).
    pub workbook: PathBuf,
    /// Flat pivot CSV (`fid_results.csv`).
    pub pivot_csv: PathBuf,
    /// Narrative text report (`fid_results.txt`).
    pub text: PathBuf,
}

impl ReportPaths {
    /// Standard artifact names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            workbook: dir.join("fid_results.xlsx"),
            pivot_csv: dir.join("fid_results.csv"),
            text: dir.join("fid_results.txt"),
        }
    }
}

/// Renders the sweep output into the three report artifacts.
pub struct ReportExporter<'a> {
    results: &'a ResultSet,
    aggregation: &'a Aggregation,
    run: RunInfo,
}

impl<'a> ReportExporter<'a> {
    /// Create an exporter over one result set and its derived views.
    #[must_use]
    pub const fn new(results: &'a ResultSet, aggregation: &'a Aggregation, run: RunInfo) -> Self {
        Self {
            results,
            aggregation,
            run,
        }
    }

    /// Write the workbook artifact.
    ///
    /// # Errors
    ///
    /// Any workbook or IO failure is fatal.
    pub fn write_workbook(&self, path: &Path) -> Result<()> {
        workbook::write(path, self.results, self.aggregation)?;
        info!("workbook saved: {}", path.display());
        Ok(())
    }

    /// Write the flat CSV rendering of the pivot table.
    ///
    /// # Errors
    ///
    /// Any CSV or IO failure is fatal.
    pub fn write_pivot_csv(&self, path: &Path) -> Result<()> {
        pivot_csv::write(path, self.aggregation.pivot())?;
        info!("CSV saved: {}", path.display());
        Ok(())
    }

    /// Write the narrative text report.
    ///
    /// # Errors
    ///
    /// Any IO failure is fatal.
    pub fn write_text(&self, path: &Path) -> Result<()> {
        text::write(path, self.aggregation, self.run)?;
        info!("text report saved: {}", path.display());
        Ok(())
    }

    /// Write all three artifacts.
    ///
    /// # Errors
    ///
    /// Stops at the first failed write; artifacts already written are left
    /// in place.
    pub fn write_all(&self, paths: &ReportPaths) -> Result<()> {
        self.write_workbook(&paths.workbook)?;
        self.write_pivot_csv(&paths.pivot_csv)?;
        self.write_text(&paths.text)
    }
}

/// FID rendering shared by the text artifacts: 4 decimal places, `NaN` for
/// absent values.
pub(crate) fn fmt_fid(fid: Option<f64>) -> String {
    fid.map_or_else(|| "NaN".to_string(), |value| format!("{value:.4}"))
}
