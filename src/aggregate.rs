//! Derived views over a finished [`ResultSet`].
//!
//! Everything in this module is a pure function of the result set: the pivot
//! table, the summary statistics, the per-axis group averages, and the
//! best/worst selection. Consumers recompute these views from the records;
//! nothing here is cached or mutated after construction.
//!
//! Only [`PointStatus::Scored`](crate::sweep::PointStatus::Scored) records
//! contribute values. Skipped and failed points appear as explicit absences
//! (`None`), never as zeros.

// Axis values are exact input literals; identity comparison is intended.
#![allow(clippy::float_cmp)]

use serde::Serialize;

use crate::sweep::{ResultRecord, ResultSet};

/// 2D matrix view of the results: rows keyed by steps (sorted ascending),
/// columns by eta (input order).
#[derive(Debug, Clone, Serialize)]
pub struct PivotTable {
    steps: Vec<u32>,
    etas: Vec<f64>,
    cells: Vec<Option<f64>>,
}

impl PivotTable {
    /// Arrange the result set into the pivot shape.
    #[must_use]
    pub fn from_results(results: &ResultSet) -> Self {
        let mut steps = results.steps_axis().to_vec();
        steps.sort_unstable();
        steps.dedup();

        let mut etas: Vec<f64> = Vec::new();
        for &eta in results.eta_axis() {
            if !etas.iter().any(|&e| e == eta) {
                etas.push(eta);
            }
        }

        let mut cells = vec![None; steps.len() * etas.len()];
        for record in results.records() {
            let Some(row) = steps.iter().position(|&s| s == record.point().steps()) else {
                continue;
            };
            let Some(col) = etas.iter().position(|&e| e == record.point().eta()) else {
                continue;
            };
            let cell = &mut cells[row * etas.len() + col];
            if cell.is_none() {
                *cell = record.fid();
            }
        }

        Self { steps, etas, cells }
    }

    /// Row labels: distinct steps values, sorted ascending.
    #[must_use]
    pub fn steps(&self) -> &[u32] {
        &self.steps
    }

    /// Column labels: distinct eta values, in input order.
    #[must_use]
    pub fn etas(&self) -> &[f64] {
        &self.etas
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.steps.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.etas.len()
    }

    /// Cell value at (row, col); `None` for skipped or failed points.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        assert!(row < self.n_rows() && col < self.n_cols(), "pivot index out of bounds");
        self.cells[row * self.etas.len() + col]
    }
}

/// Min / max / mean / sample standard deviation over scored records.
///
/// All fields are `None` when no record scored; `std` additionally requires
/// at least two scored records (ddof = 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    min: Option<f64>,
    max: Option<f64>,
    mean: Option<f64>,
    std: Option<f64>,
}

impl SummaryStats {
    /// Compute the summary over all scored records of the result set.
    #[must_use]
    pub fn from_results(results: &ResultSet) -> Self {
        let values: Vec<f64> = results.scored().filter_map(ResultRecord::fid).collect();
        if values.is_empty() {
            return Self {
                min: None,
                max: None,
                mean: None,
                std: None,
            };
        }

        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let std = if values.len() < 2 {
            None
        } else {
            let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            Some((ss / (n - 1.0)).sqrt())
        };

        Self {
            min: Some(min),
            max: Some(max),
            mean: Some(mean),
            std,
        }
    }

    /// Minimum scored FID.
    #[must_use]
    pub const fn min(&self) -> Option<f64> {
        self.min
    }

    /// Maximum scored FID.
    #[must_use]
    pub const fn max(&self) -> Option<f64> {
        self.max
    }

    /// Arithmetic mean of scored FIDs.
    #[must_use]
    pub const fn mean(&self) -> Option<f64> {
        self.mean
    }

    /// Sample standard deviation (ddof = 1) of scored FIDs.
    #[must_use]
    pub const fn std(&self) -> Option<f64> {
        self.std
    }
}

/// Per-axis mean FID, axis values in input order.
///
/// A group with no scored records averages to `None`, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct GroupAverages {
    by_eta: Vec<(f64, Option<f64>)>,
    by_steps: Vec<(u32, Option<f64>)>,
}

impl GroupAverages {
    /// Compute both group-average mappings from the result set.
    #[must_use]
    pub fn from_results(results: &ResultSet) -> Self {
        let by_eta = distinct_f64(results.eta_axis())
            .into_iter()
            .map(|eta| {
                let avg = mean(results.scored().filter(|r| r.point().eta() == eta));
                (eta, avg)
            })
            .collect();

        let by_steps = distinct_u32(results.steps_axis())
            .into_iter()
            .map(|steps| {
                let avg = mean(results.scored().filter(|r| r.point().steps() == steps));
                (steps, avg)
            })
            .collect();

        Self { by_eta, by_steps }
    }

    /// (eta, mean FID) pairs in input order.
    #[must_use]
    pub fn by_eta(&self) -> &[(f64, Option<f64>)] {
        &self.by_eta
    }

    /// (steps, mean FID) pairs in input order.
    #[must_use]
    pub fn by_steps(&self) -> &[(u32, Option<f64>)] {
        &self.by_steps
    }
}

fn distinct_f64(axis: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::new();
    for &value in axis {
        if !out.iter().any(|&v| v == value) {
            out.push(value);
        }
    }
    out
}

fn distinct_u32(axis: &[u32]) -> Vec<u32> {
    let mut out: Vec<u32> = Vec::new();
    for &value in axis {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

fn mean<'a>(records: impl Iterator<Item = &'a ResultRecord>) -> Option<f64> {
    let values: Vec<f64> = records.filter_map(ResultRecord::fid).collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// All derived views, computed once and shared by every report artifact.
///
/// This is the exporters' single source of truth: every artifact renders the
/// same pivot, stats, averages, and best/worst records, so their numeric
/// content always agrees.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregation {
    pivot: PivotTable,
    stats: SummaryStats,
    averages: GroupAverages,
    best: Option<ResultRecord>,
    worst: Option<ResultRecord>,
}

impl Aggregation {
    /// Derive every view from the result set.
    #[must_use]
    pub fn from_results(results: &ResultSet) -> Self {
        Self {
            pivot: PivotTable::from_results(results),
            stats: SummaryStats::from_results(results),
            averages: GroupAverages::from_results(results),
            best: best_record(results).cloned(),
            worst: worst_record(results).cloned(),
        }
    }

    /// The pivot table.
    #[must_use]
    pub const fn pivot(&self) -> &PivotTable {
        &self.pivot
    }

    /// The summary statistics.
    #[must_use]
    pub const fn stats(&self) -> SummaryStats {
        self.stats
    }

    /// The per-axis group averages.
    #[must_use]
    pub const fn averages(&self) -> &GroupAverages {
        &self.averages
    }

    /// Scored record with the minimum FID; `None` with no scored records.
    #[must_use]
    pub const fn best(&self) -> Option<&ResultRecord> {
        self.best.as_ref()
    }

    /// Scored record with the maximum FID; `None` with no scored records.
    #[must_use]
    pub const fn worst(&self) -> Option<&ResultRecord> {
        self.worst.as_ref()
    }
}

/// Stable argmin over scored records: ties keep the first in grid order.
fn best_record(results: &ResultSet) -> Option<&ResultRecord> {
    let mut best: Option<&ResultRecord> = None;
    for record in results.scored() {
        match (record.fid(), best.and_then(ResultRecord::fid)) {
            (Some(fid), Some(current)) if fid < current => best = Some(record),
            (Some(_), None) => best = Some(record),
            _ => {}
        }
    }
    best
}

/// Stable argmax over scored records: ties keep the first in grid order.
fn worst_record(results: &ResultSet) -> Option<&ResultRecord> {
    let mut worst: Option<&ResultRecord> = None;
    for record in results.scored() {
        match (record.fid(), worst.and_then(ResultRecord::fid)) {
            (Some(fid), Some(current)) if fid > current => worst = Some(record),
            (Some(_), None) => worst = Some(record),
            _ => {}
        }
    }
    worst
}
