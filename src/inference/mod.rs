//! inference — robust coefficient covariance and percentile intervals.
//!
//! Purpose
//! -------
//! Provide the uncertainty-quantification building blocks shared by the
//! elasticity estimator and the revenue optimizer: sandwich covariance
//! matrices for OLS coefficients and empirical percentile intervals over
//! resampled draws.
//!
//! Key behaviors
//! -------------
//! - Define a unified error and result type, [`InferenceError`] and
//!   [`InferenceResult`], for inference-specific failures (shape mismatches,
//!   unit leverage, empty samples, invalid levels).
//! - Select the coefficient covariance estimator with [`CovarianceType`]
//!   (classical or HC0–HC3) and compute it with [`coefficient_covariance`].
//! - Reduce an unordered collection of draws to a [`ConfidenceInterval`]
//!   via [`percentile_interval`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Design matrices are `n×p` with full column rank; the caller supplies
//!   the matching bread `(XᵀX)⁻¹`.
//! - Percentile reductions sort a private copy of their input, so results
//!   are independent of the order in which draws were produced.
//! - All numerical routines return [`InferenceError`] on failure rather
//!   than panicking.
//!
//! Conventions
//! -----------
//! - Rows index observations, columns index regressors.
//! - Percentile ranks are on the `[0, 100]` scale; confidence levels on
//!   `(0, 1)`.
//! - All functions are pure with respect to I/O: no logging, no global
//!   state, and no `unsafe` code paths.
//!
//! Downstream usage
//! ----------------
//! - `elasticity::estimator` computes HC3 standard errors for the point fit
//!   and percentile intervals over bootstrap coefficients.
//! - `pricing::optimizer` computes percentile intervals over per-draw
//!   optimal prices.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`robust`] cover the estimator formulas and failure
//!   paths; unit tests in [`interval`] cover interpolation, order
//!   independence, and error branches.

pub mod errors;
pub mod interval;
pub mod robust;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::interval::{ConfidenceInterval, percentile, percentile_interval};
pub use self::robust::{CovarianceType, coefficient_covariance, standard_errors};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::interval::{ConfidenceInterval, percentile_interval};
    pub use super::robust::{CovarianceType, coefficient_covariance};
}
