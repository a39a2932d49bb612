//! Error types for barrido
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)
//!
//! Only failures outside the per-point boundary live here. A grid point whose
//! sample folder is absent or whose engine call fails is recorded as a
//! [`PointStatus`](crate::sweep::PointStatus) on its result record and never
//! surfaces as an `Error`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Barrido error types
#[derive(Error, Debug)]
pub enum Error {
    /// Eta value with no registered folder token (fatal, pre-sweep)
    #[error("unknown eta value {0}: no folder token registered\nRegistered values: 0, 0.2, 0.5, 1.0")]
    UnknownEta(f64),

    /// Samples root directory does not exist (fatal, pre-sweep)
    #[error("samples root not found: {0}")]
    SamplesRootMissing(PathBuf),

    /// Reference dataset missing and the reference policy chose to abort
    #[error("reference dataset not found: {0}")]
    ReferenceMissing(PathBuf),

    /// IO error while writing an artifact (fatal, aborts the run)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook serialization error
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed configuration file
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
