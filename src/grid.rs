//! Configuration grid: the ordered (steps × eta) cartesian product.
//!
//! The grid fixes the iteration order for the entire pipeline: `steps` is
//! the outer axis (in the order given), `eta` the inner axis (in the order
//! given). Every eta value must resolve to a folder token when the grid is
//! built, so an unknown value fails before any sweep work starts, never
//! mid-sweep.

use serde::Serialize;

use crate::error::{Error, Result};

/// Fixed eta → folder-token table.
///
/// Tokens are path segments; the mapping is a lookup table rather than a
/// formatting rule because `0.2` must stay `eta_02`, not `eta_0.2`.
const ETA_TOKENS: &[(f64, &str)] = &[
    (0.0, "eta_0"),
    (0.2, "eta_02"),
    (0.5, "eta_05"),
    (1.0, "eta_1"),
];

/// Resolve the canonical folder token for an eta value.
///
/// # Errors
///
/// Returns [`Error::UnknownEta`] if the value has no registered token.
#[allow(clippy::float_cmp)] // table entries are exact literals, not computed values
pub fn eta_token(eta: f64) -> Result<&'static str> {
    ETA_TOKENS
        .iter()
        .find(|(value, _)| *value == eta)
        .map(|(_, token)| *token)
        .ok_or(Error::UnknownEta(eta))
}

/// A single point of the sweep grid.
///
/// Identity is the `(steps, eta)` pair. Construction resolves the eta folder
/// token, so a `ConfigPoint` that exists can always name its sample folder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfigPoint {
    steps: u32,
    eta: f64,
    #[serde(skip)]
    eta_token: &'static str,
}

impl ConfigPoint {
    /// Create a grid point, resolving the eta folder token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEta`] if `eta` has no registered token.
    pub fn new(steps: u32, eta: f64) -> Result<Self> {
        Ok(Self {
            steps,
            eta,
            eta_token: eta_token(eta)?,
        })
    }

    /// Get the sampling-step count.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Get the eta value.
    #[must_use]
    pub const fn eta(&self) -> f64 {
        self.eta
    }

    /// Get the canonical folder token for this point's eta value.
    #[must_use]
    pub const fn eta_token(&self) -> &'static str {
        self.eta_token
    }

    /// Name of the sample folder for this point, e.g. `steps_50_eta_02`.
    #[must_use]
    pub fn sample_dir_name(&self) -> String {
        format!("steps_{}_{}", self.steps, self.eta_token)
    }
}

/// The ordered set of grid points plus the two input axes.
///
/// Building the grid validates every eta value eagerly; the point list is
/// the cartesian product with `steps` as the outer loop.
#[derive(Debug, Clone)]
pub struct SweepGrid {
    steps_axis: Vec<u32>,
    eta_axis: Vec<f64>,
    points: Vec<ConfigPoint>,
}

impl SweepGrid {
    /// Build the grid from the two axes, validating every eta value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEta`] for the first eta value without a
    /// registered folder token. No sweep work happens after this point
    /// fails.
    pub fn new(steps: &[u32], etas: &[f64]) -> Result<Self> {
        let mut points = Vec::with_capacity(steps.len() * etas.len());
        for &s in steps {
            for &eta in etas {
                points.push(ConfigPoint::new(s, eta)?);
            }
        }
        Ok(Self {
            steps_axis: steps.to_vec(),
            eta_axis: etas.to_vec(),
            points,
        })
    }

    /// Grid points in sweep order (steps outer, eta inner).
    #[must_use]
    pub fn points(&self) -> &[ConfigPoint] {
        &self.points
    }

    /// Number of grid points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether the grid has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
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
}
