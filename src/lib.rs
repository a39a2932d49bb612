//! # Barrido: FID Grid-Sweep Runner
//!
//! Barrido sweeps a two-dimensional sampler configuration grid (sampling
//! `steps` × `eta`), scores every grid point's sample folder against a fixed
//! reference dataset with an external FID engine, and renders the results as
//! three consistent artifacts: an xlsx workbook, a flat pivot CSV, and a
//! narrative text report.
//!
//! ## Pipeline
//!
//! ```text
//! SweepGrid ──▶ SweepRunner ──▶ ResultSet ──▶ Aggregation ──▶ ReportExporter
//! ```
//!
//! Data flows strictly one way. Per-point failures (missing sample folder,
//! failing engine call) become statuses on the result records; failures
//! outside the point boundary (unknown eta, missing samples root, artifact
//! write errors) terminate the run.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use barrido::aggregate::Aggregation;
//! use barrido::config::SweepConfig;
//! use barrido::engine::CommandEngine;
//! use barrido::report::{ReportExporter, ReportPaths};
//! use barrido::sweep::{Decision, SweepRunner};
//!
//! let config = SweepConfig::default();
//! let engine = CommandEngine::new("fid/measure_fid.py");
//!
//! let run = SweepRunner::new(&config, &engine).run(&Decision::Abort)?;
//! let aggregation = Aggregation::from_results(run.results());
//!
//! ReportExporter::new(run.results(), &aggregation, run.info())
//!     .write_all(&ReportPaths::in_dir(std::path::Path::new(".")))?;
//! # Ok::<(), barrido::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod report;
pub mod sweep;

pub use error::{Error, Result};
