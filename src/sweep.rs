//! Sweep execution: one engine invocation per grid point.
//!
//! ## Failure isolation
//!
//! Each grid point is a failure boundary. A missing sample folder or a
//! failing engine call is converted into a [`PointStatus`] on that point's
//! record and the sweep moves on; one point can never abort its siblings.
//! Errors outside the boundary (configuration, missing samples root,
//! rejected missing reference) propagate and terminate the run.
//!
//! ## Ordering
//!
//! The result set is append-only and its insertion order is exactly the grid
//! iteration order. The runner produces one record per grid point, always:
//!
//! ```text
//! SweepGrid (N points) ──▶ SweepRunner ──▶ ResultSet (N records)
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SweepConfig;
use crate::engine::MetricEngine;
use crate::error::{Error, Result};
use crate::grid::ConfigPoint;

/// Outcome of scoring a single grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointStatus {
    /// The engine returned a score.
    Scored,
    /// The sample folder does not exist; the point was skipped.
    MissingSample,
    /// The engine was invoked and failed.
    EngineFailed,
}

impl PointStatus {
    /// Short status flag used in report artifacts.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Scored => "ok",
            Self::MissingSample => "missing",
            Self::EngineFailed => "error",
        }
    }
}

impl std::fmt::Display for PointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One grid point's result: a score, a skipped sample, or an engine failure.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    point: ConfigPoint,
    fid: Option<f64>,
    status: PointStatus,
    detail: Option<String>,
}

impl ResultRecord {
    pub(crate) const fn scored(point: ConfigPoint, fid: f64) -> Self {
        Self {
            point,
            fid: Some(fid),
            status: PointStatus::Scored,
            detail: None,
        }
    }

    pub(crate) const fn missing(point: ConfigPoint) -> Self {
        Self {
            point,
            fid: None,
            status: PointStatus::MissingSample,
            detail: None,
        }
    }

    pub(crate) fn failed(point: ConfigPoint, detail: String) -> Self {
        Self {
            point,
            fid: None,
            status: PointStatus::EngineFailed,
            detail: Some(detail),
        }
    }

    /// Get the grid point this record belongs to.
    #[must_use]
    pub const fn point(&self) -> ConfigPoint {
        self.point
    }

    /// Get the FID score; `Some` iff the status is [`PointStatus::Scored`].
    #[must_use]
    pub const fn fid(&self) -> Option<f64> {
        self.fid
    }

    /// Get the point status.
    #[must_use]
    pub const fn status(&self) -> PointStatus {
        self.status
    }

    /// Engine failure text for [`PointStatus::EngineFailed`] records.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Check whether this record carries a score.
    #[must_use]
    pub const fn is_scored(&self) -> bool {
        matches!(self.status, PointStatus::Scored)
    }
}

/// Append-only result set; insertion order is grid iteration order.
///
/// Carries the two input axes so downstream views can preserve input order
/// without re-deriving it from the records.
#[derive(Debug, Clone, Serialize)]
pub struct ResultSet {
    steps_axis: Vec<u32>,
    eta_axis: Vec<f64>,
    records: Vec<ResultRecord>,
}

impl ResultSet {
    pub(crate) fn with_axes(steps_axis: Vec<u32>, eta_axis: Vec<f64>) -> Self {
        let capacity = steps_axis.len() * eta_axis.len();
        Self {
            steps_axis,
            eta_axis,
            records: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    /// Records in sweep order.
    #[must_use]
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the set has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The steps axis, in input order.
    #[must_use]
    pub fn steps_axis(&self) -> &[u32] {
        &self.steps_axis
    }

    /// The eta axis, in input order.
    #[must_use]
    pub fn eta_axis(&self) -> &[f64] {
        &self.eta_axis
    }

    /// Records that carry a score, in sweep order.
    pub fn scored(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter().filter(|r| r.is_scored())
    }
}

/// Decision returned by a [`ReferencePolicy`] for a missing reference path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Run the sweep anyway.
    Proceed,
    /// Abort before any sweep work.
    Abort,
}

/// Policy hook consulted when the reference dataset path does not exist.
///
/// Interactive callers prompt the operator; automated callers pass a fixed
/// [`Decision`] (which implements this trait), or any
/// `Fn(&Path) -> Decision` closure.
pub trait ReferencePolicy {
    /// Decide whether the sweep may run without its reference dataset.
    fn on_missing_reference(&self, reference: &Path) -> Decision;
}

impl ReferencePolicy for Decision {
    fn on_missing_reference(&self, _reference: &Path) -> Decision {
        *self
    }
}

impl<F> ReferencePolicy for F
where
    F: Fn(&Path) -> Decision,
{
    fn on_missing_reference(&self, reference: &Path) -> Decision {
        self(reference)
    }
}

/// Wall-clock bounds of a completed sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunInfo {
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl RunInfo {
    /// When the sweep loop started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the sweep loop finished.
    #[must_use]
    pub const fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }
}

/// A completed sweep: the record set plus run metadata.
#[derive(Debug, Clone, Serialize)]
pub struct SweepRun {
    info: RunInfo,
    results: ResultSet,
}

impl SweepRun {
    /// Get the run metadata.
    #[must_use]
    pub const fn info(&self) -> RunInfo {
        self.info
    }

    /// Get the result set.
    #[must_use]
    pub const fn results(&self) -> &ResultSet {
        &self.results
    }
}

/// Drives the sweep: iterates the grid and scores one point at a time.
///
/// Execution is strictly sequential; each engine call blocks until it
/// returns or fails.
pub struct SweepRunner<'a, E: MetricEngine> {
    config: &'a SweepConfig,
    engine: &'a E,
}

impl<'a, E: MetricEngine> SweepRunner<'a, E> {
    /// Create a runner over the given configuration and engine.
    #[must_use]
    pub const fn new(config: &'a SweepConfig, engine: &'a E) -> Self {
        Self { config, engine }
    }

    /// Run the full sweep.
    ///
    /// Produces exactly one record per grid point regardless of how many
    /// points fail; the sweep is never short-circuited.
    ///
    /// # Errors
    ///
    /// Pre-sweep only:
    /// - [`Error::UnknownEta`] for an unregistered eta value
    /// - [`Error::SamplesRootMissing`] if the samples root does not exist
    /// - [`Error::ReferenceMissing`] if the reference path is absent and
    ///   `policy` decides to abort
    pub fn run(&self, policy: &dyn ReferencePolicy) -> Result<SweepRun> {
        let grid = self.config.grid()?;

        if !self.config.samples_root.is_dir() {
            return Err(Error::SamplesRootMissing(self.config.samples_root.clone()));
        }

        if !self.config.reference_path.exists() {
            warn!(
                "reference dataset not found: {}",
                self.config.reference_path.display()
            );
            if policy.on_missing_reference(&self.config.reference_path) == Decision::Abort {
                return Err(Error::ReferenceMissing(self.config.reference_path.clone()));
            }
            info!("continuing without reference check");
        }

        let started_at = Utc::now();
        let total = grid.len();
        let mut results = ResultSet::with_axes(grid.steps_axis().to_vec(), grid.eta_axis().to_vec());

        for (idx, point) in grid.points().iter().enumerate() {
            let sample_dir = self.config.samples_root.join(point.sample_dir_name());
            info!(
                current = idx + 1,
                total,
                steps = point.steps(),
                eta = point.eta(),
                "scoring {}",
                sample_dir.display()
            );
            results.push(self.score_point(*point, &sample_dir));
        }

        Ok(SweepRun {
            info: RunInfo {
                started_at,
                finished_at: Utc::now(),
            },
            results,
        })
    }

    /// Score one point. This is the per-point failure boundary: every
    /// outcome becomes a record, nothing escapes.
    fn score_point(&self, point: ConfigPoint, sample_dir: &Path) -> ResultRecord {
        if !sample_dir.is_dir() {
            warn!("sample folder not found, skipping: {}", sample_dir.display());
            return ResultRecord::missing(point);
        }

        match self.engine.score(
            &self.config.reference_path,
            sample_dir,
            self.config.image_size,
            self.config.batch_size,
        ) {
            Ok(fid) => {
                info!(fid, "scored steps={} eta={}", point.steps(), point.eta());
                ResultRecord::scored(point, fid)
            }
            Err(err) => {
                warn!(
                    "engine failed on steps={} eta={}: {err:#}",
                    point.steps(),
                    point.eta()
                );
                ResultRecord::failed(point, format!("{err:#}"))
            }
        }
    }
}
