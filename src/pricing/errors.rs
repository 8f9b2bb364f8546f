//! pricing::errors — error types for the revenue optimizer.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for demand-curve construction,
//! grid building, elasticity draws, and price optimization, plus the
//! conversion to Python exceptions.
//!
//! Conventions
//! -----------
//! - Grid problems are reported before any revenue is evaluated.
//! - Draws that cannot be re-optimized are counted on the result; only a
//!   draw set that yields nothing usable becomes an error.
use crate::inference::errors::InferenceError;
use std::time::Duration;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type PricingResult<T> = Result<T, PricingError>;

/// PricingError — failures of the revenue optimizer.
///
/// Variants
/// --------
/// - `InvalidInput { name, value, reason }`
///   A scalar input is out of range (non-finite elasticity, non-positive
///   scale or reference price, negative grid offsets, ...).
/// - `DegenerateGrid { points, floor, ceiling }`
///   The grid has fewer than two points or `floor ≥ ceiling`.
/// - `NoFeasibleMaximum`
///   Every grid point has undefined revenue at the point elasticity.
/// - `EmptyDraws`
///   The elasticity draw collection is empty.
/// - `NoFeasibleDraws { skipped }`
///   No draw produced an optimal price.
/// - `ComputationTimeout { budget, elapsed, completed }`
///   The wall-clock budget ran out during draw re-optimization.
/// - `Inference(InferenceError)`
///   The percentile reduction failed.
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    InvalidInput { name: &'static str, value: f64, reason: &'static str },
    DegenerateGrid { points: usize, floor: f64, ceiling: f64 },
    NoFeasibleMaximum,
    EmptyDraws,
    NoFeasibleDraws { skipped: usize },
    ComputationTimeout { budget: Duration, elapsed: Duration, completed: usize },
    Inference(InferenceError),
}

impl std::error::Error for PricingError {}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::InvalidInput { name, value, reason } => {
                write!(f, "Invalid input {name} = {value}: {reason}")
            }
            PricingError::DegenerateGrid { points, floor, ceiling } => write!(
                f,
                "Degenerate grid: {points} points between floor {floor} and ceiling {ceiling}"
            ),
            PricingError::NoFeasibleMaximum => {
                write!(f, "No feasible maximum: revenue is undefined at every grid point")
            }
            PricingError::EmptyDraws => write!(f, "Elasticity draw distribution is empty"),
            PricingError::NoFeasibleDraws { skipped } => {
                write!(f, "No elasticity draw produced an optimum ({skipped} skipped)")
            }
            PricingError::ComputationTimeout { budget, elapsed, completed } => write!(
                f,
                "Computation timeout: {elapsed:?} elapsed (budget {budget:?}) after {completed} draws"
            ),
            PricingError::Inference(err) => write!(f, "{err}"),
        }
    }
}

impl From<InferenceError> for PricingError {
    fn from(err: InferenceError) -> Self {
        PricingError::Inference(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<PricingError> for PyErr {
    fn from(err: PricingError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
