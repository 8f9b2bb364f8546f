//! elasticity::errors — error types for the elasticity estimator.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for preprocessing, regression
//! fitting, bootstrap inference, and option validation, together with a
//! conversion layer to Python exceptions for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - [`ElasticityError`] separates whole-computation failures
//!   (insufficient data, a failed point fit, an undefined interval, a blown
//!   time budget) from configuration mistakes.
//! - [`FitFailure`] describes why a single least-squares fit failed. The
//!   point fit surfaces it as [`ElasticityError::FitFailure`]; bootstrap
//!   iterations only count it.
//!
//! Conventions
//! -----------
//! - Messages are phrased in terms of domain constraints ("need at least
//!   10 usable observations") rather than low-level details.
//! - PyO3 conversion maps every variant to `ValueError` with the `Display`
//!   message preserved verbatim.
use crate::inference::errors::InferenceError;
use std::time::Duration;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type ElasticityResult<T> = Result<T, ElasticityError>;

/// FitFailure — why a single least-squares fit could not be computed.
///
/// Variants
/// --------
/// - `Underdetermined { rows, columns }`
///   Fewer observations than regressors.
/// - `RankDeficient { rank, columns }`
///   The design matrix does not have full column rank.
/// - `ConstantPrice`
///   Log-price has no variation in the sample, so elasticity is not
///   identified.
/// - `NonFiniteCoefficient { index, value }`
///   The solver produced a NaN/±∞ coefficient.
/// - `Solver { reason }`
///   The SVD back-substitution reported an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FitFailure {
    Underdetermined { rows: usize, columns: usize },
    RankDeficient { rank: usize, columns: usize },
    ConstantPrice,
    NonFiniteCoefficient { index: usize, value: f64 },
    Solver { reason: &'static str },
}

impl std::fmt::Display for FitFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitFailure::Underdetermined { rows, columns } => {
                write!(f, "underdetermined design: {rows} rows for {columns} columns")
            }
            FitFailure::RankDeficient { rank, columns } => {
                write!(f, "singular design: rank {rank} < {columns} columns")
            }
            FitFailure::ConstantPrice => write!(f, "log price is constant in the sample"),
            FitFailure::NonFiniteCoefficient { index, value } => {
                write!(f, "non-finite coefficient {value} at index {index}")
            }
            FitFailure::Solver { reason } => write!(f, "least-squares solver failed: {reason}"),
        }
    }
}

/// ElasticityError — failures of the elasticity estimator.
///
/// Variants
/// --------
/// - `InsufficientData { available, required }`
///   Fewer usable observations than `min_observations` after filtering.
/// - `NoPriceVariation`
///   Every usable observation has the same price. This is the
///   insufficient-data case where the row count is fine but the elasticity
///   is not identified; it is a separate variant so callers can tell the
///   two apart, and its message keeps the "Insufficient data" prefix.
/// - `FitFailure(FitFailure)`
///   The point-estimate regression failed; fatal.
/// - `UndefinedInterval { attempted }`
///   No bootstrap iteration succeeded, so no interval exists.
/// - `MixedControlTypes { name }`
///   A control column mixes numeric and categorical values.
/// - `InvalidOption { name, value, reason }`
///   An estimator or bootstrap option is out of range.
/// - `ComputationTimeout { budget, elapsed, completed }`
///   The wall-clock budget ran out after `completed` bootstrap iterations.
/// - `Inference(InferenceError)`
///   A covariance or percentile computation failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ElasticityError {
    // ---- Data ----
    InsufficientData { available: usize, required: usize },
    NoPriceVariation,
    MixedControlTypes { name: String },

    // ---- Fitting ----
    FitFailure(FitFailure),
    UndefinedInterval { attempted: usize },

    // ---- Options ----
    InvalidOption { name: &'static str, value: f64, reason: &'static str },

    // ---- Resources ----
    ComputationTimeout { budget: Duration, elapsed: Duration, completed: usize },

    // ---- Inference passthrough ----
    Inference(InferenceError),
}

impl std::error::Error for ElasticityError {}

impl std::fmt::Display for ElasticityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElasticityError::InsufficientData { available, required } => write!(
                f,
                "Insufficient data: {available} usable observations, need at least {required}"
            ),
            ElasticityError::NoPriceVariation => {
                write!(f, "Insufficient data: price does not vary across observations")
            }
            ElasticityError::MixedControlTypes { name } => {
                write!(f, "Control '{name}' mixes numeric and categorical values")
            }
            ElasticityError::FitFailure(reason) => write!(f, "Fit failure: {reason}"),
            ElasticityError::UndefinedInterval { attempted } => write!(
                f,
                "Undefined interval: none of {attempted} bootstrap iterations succeeded"
            ),
            ElasticityError::InvalidOption { name, value, reason } => {
                write!(f, "Invalid option {name} = {value}: {reason}")
            }
            ElasticityError::ComputationTimeout { budget, elapsed, completed } => write!(
                f,
                "Computation timeout: {elapsed:?} elapsed (budget {budget:?}) after {completed} iterations"
            ),
            ElasticityError::Inference(err) => write!(f, "{err}"),
        }
    }
}

impl From<FitFailure> for ElasticityError {
    fn from(failure: FitFailure) -> Self {
        ElasticityError::FitFailure(failure)
    }
}

impl From<InferenceError> for ElasticityError {
    fn from(err: InferenceError) -> Self {
        ElasticityError::Inference(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<ElasticityError> for PyErr {
    fn from(err: ElasticityError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` payload embedding for data, fit, and interval variants.
    // - `From` conversions into `ElasticityError`.
    //
    // They intentionally DO NOT cover:
    // - The `From<ElasticityError> for PyErr` conversion, which needs the
    //   Python C API and belongs to Python-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `InsufficientData` reports both counts.
    //
    // Given
    // -----
    // - available = 4, required = 10.
    //
    // Expect
    // ------
    // - The message contains "4" and "10".
    fn insufficient_data_display_includes_counts() {
        // Arrange
        let err = ElasticityError::InsufficientData { available: 4, required: 10 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('4') && msg.contains("10"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Constant prices read as an insufficient-data failure while staying
    // distinguishable from a short sample.
    //
    // Given
    // -----
    // - `NoPriceVariation` and `InsufficientData { 4, 10 }`.
    //
    // Expect
    // ------
    // - Both messages start with "Insufficient data"; the variants differ.
    fn no_price_variation_is_reported_as_insufficient_data() {
        let flat = ElasticityError::NoPriceVariation;
        let short = ElasticityError::InsufficientData { available: 4, required: 10 };

        assert!(flat.to_string().starts_with("Insufficient data"));
        assert!(short.to_string().starts_with("Insufficient data"));
        assert_ne!(flat, short);
    }

    #[test]
    // Purpose
    // -------
    // A `FitFailure` converts into `ElasticityError::FitFailure` and keeps
    // its payload in the message.
    //
    // Given
    // -----
    // - `FitFailure::RankDeficient { rank: 3, columns: 5 }`.
    //
    // Expect
    // ------
    // - Variant preserved; message mentions "rank 3".
    fn fit_failure_converts_and_displays() {
        // Arrange
        let failure = FitFailure::RankDeficient { rank: 3, columns: 5 };

        // Act
        let err: ElasticityError = failure.clone().into();

        // Assert
        assert_eq!(err, ElasticityError::FitFailure(failure));
        assert!(err.to_string().contains("rank 3"));
    }

    #[test]
    // Purpose
    // -------
    // `UndefinedInterval` is a distinct, explicit outcome with a readable
    // message.
    //
    // Given
    // -----
    // - attempted = 500.
    //
    // Expect
    // ------
    // - Message mentions "500".
    fn undefined_interval_display_mentions_attempts() {
        let msg = ElasticityError::UndefinedInterval { attempted: 500 }.to_string();
        assert!(msg.contains("500"), "Got: {msg}");
    }
}
