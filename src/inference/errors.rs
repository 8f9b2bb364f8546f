//! Unified error handling for inference routines.
//!
//! This module defines `InferenceError`, the central error type used by
//! robust (sandwich) covariance estimation and percentile interval
//! construction. It groups shape mismatches, leverage and
//! degrees-of-freedom failures, and invalid interval requests. An alias
//! `InferenceResult<T>` standardizes the return type across inference code.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type InferenceResult<T> = Result<T, InferenceError>;

/// Unified error type for inference routines.
///
/// Covers sandwich-covariance failures (shape mismatches, observations with
/// unit leverage, exhausted residual degrees of freedom) and percentile
/// interval failures (empty samples, non-finite values, invalid levels).
/// Provides readable diagnostics through `Display`.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Sandwich covariance ----
    /// Design, residual, and bread dimensions disagree.
    DimensionMismatch { design: (usize, usize), residuals: usize, bread: (usize, usize) },

    /// An observation has leverage `h_ii` numerically equal to one, so the
    /// HC2/HC3 residual rescaling `1 / (1 - h_ii)` is undefined.
    LeverageOne { row: usize, leverage: f64 },

    /// The covariance type needs `n > p` residual degrees of freedom.
    NoResidualDegreesOfFreedom { n: usize, p: usize },

    // ---- Percentile intervals ----
    /// Percentiles of an empty sample are undefined.
    EmptySample,

    /// Sample values must be finite.
    NonFiniteValue { index: usize, value: f64 },

    /// Percentile rank must lie in `[0, 100]`.
    InvalidPercentile { q: f64 },

    /// Confidence level must lie in the open interval `(0, 1)`.
    InvalidLevel { level: f64 },
}

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Sandwich covariance ----
            InferenceError::DimensionMismatch { design, residuals, bread } => write!(
                f,
                "Inference Error: dimension mismatch (design {}x{}, residuals {}, bread {}x{})",
                design.0, design.1, residuals, bread.0, bread.1
            ),
            InferenceError::LeverageOne { row, leverage } => {
                write!(f, "Inference Error: observation {row} has leverage {leverage} (≈ 1)")
            }
            InferenceError::NoResidualDegreesOfFreedom { n, p } => write!(
                f,
                "Inference Error: no residual degrees of freedom (n = {n}, p = {p})"
            ),

            // ---- Percentile intervals ----
            InferenceError::EmptySample => {
                write!(f, "Inference Error: percentile of an empty sample")
            }
            InferenceError::NonFiniteValue { index, value } => {
                write!(f, "Inference Error: non-finite value {value} at index {index}")
            }
            InferenceError::InvalidPercentile { q } => {
                write!(f, "Inference Error: percentile {q} outside [0, 100]")
            }
            InferenceError::InvalidLevel { level } => {
                write!(f, "Inference Error: confidence level {level} outside (0, 1)")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<InferenceError> for PyErr {
    fn from(err: InferenceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
