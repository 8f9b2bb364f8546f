//! elasticity — price elasticity of demand from weekly sales.
//!
//! Purpose
//! -------
//! Turn a weekly `(price, quantity)` series for one product into a point
//! elasticity, a demand scale, and a bootstrap confidence interval.
//!
//! Key behaviors
//! -------------
//! - [`data`] filters observations and derives log features, the promo flag
//!   and the calendar month.
//! - [`design`] builds the regression matrix with intercept and log-price
//!   first, one-hot months and controls after.
//! - [`ols`] solves least squares through an SVD and rejects unidentified
//!   designs.
//! - [`bootstrap`] refits on seeded resamples and reduces the draws to a
//!   percentile interval, possibly undefined.
//! - [`estimator`] ties the steps together behind [`estimate_elasticity`].
//!
//! Conventions
//! -----------
//! - Failures of a single bootstrap refit are counted, never surfaced;
//!   whole-computation failures are [`ElasticityError`] values.
//! - No global RNG: every random draw descends from an explicit seed or a
//!   caller-supplied generator.

pub mod bootstrap;
pub mod data;
pub mod design;
pub mod errors;
pub mod estimator;
pub mod ols;
pub mod validation;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::bootstrap::{BootstrapInterval, BootstrapOptions, BootstrapSummary};
pub use self::data::{ControlValue, Observation};
pub use self::errors::{ElasticityError, ElasticityResult, FitFailure};
pub use self::estimator::{
    CoefficientEstimate, EstimationResult, EstimatorOptions, estimate_elasticity,
    estimate_elasticity_with_rng,
};

pub mod prelude {
    pub use super::data::{ControlValue, Observation};
    pub use super::errors::{ElasticityError, ElasticityResult};
    pub use super::estimator::{EstimationResult, EstimatorOptions, estimate_elasticity};
}
