//! elasticity::validation — option guards for the estimator.
//!
//! Purpose
//! -------
//! Centralize range checks on estimator and bootstrap options so that the
//! constructors, the estimator entry point, and the Python layer report the
//! same [`ElasticityError::InvalidOption`] for the same mistake.
//!
//! Invariants & assumptions
//! ------------------------
//! - `iterations ≥ 1`.
//! - `confidence_level ∈ (0, 1)`.
//! - `promo_threshold ∈ (0, 1]`.
//! - `min_observations ≥ 3`, the smallest sample that can identify an
//!   intercept and a slope with residual degrees of freedom left over.
//! - A time budget, when given, is non-zero.
use crate::elasticity::errors::{ElasticityError, ElasticityResult};
use std::time::Duration;

/// Smallest accepted `min_observations`.
pub const MIN_OBSERVATIONS_FLOOR: usize = 3;

pub fn validate_iterations(iterations: usize) -> ElasticityResult<()> {
    if iterations == 0 {
        return Err(ElasticityError::InvalidOption {
            name: "iterations",
            value: 0.0,
            reason: "must be at least 1",
        });
    }
    Ok(())
}

pub fn validate_confidence_level(level: f64) -> ElasticityResult<()> {
    if !(level.is_finite() && level > 0.0 && level < 1.0) {
        return Err(ElasticityError::InvalidOption {
            name: "confidence_level",
            value: level,
            reason: "must lie strictly between 0 and 1",
        });
    }
    Ok(())
}

pub fn validate_promo_threshold(threshold: f64) -> ElasticityResult<()> {
    if !(threshold.is_finite() && threshold > 0.0 && threshold <= 1.0) {
        return Err(ElasticityError::InvalidOption {
            name: "promo_threshold",
            value: threshold,
            reason: "must lie in (0, 1]",
        });
    }
    Ok(())
}

pub fn validate_min_observations(min_observations: usize) -> ElasticityResult<()> {
    if min_observations < MIN_OBSERVATIONS_FLOOR {
        return Err(ElasticityError::InvalidOption {
            name: "min_observations",
            value: min_observations as f64,
            reason: "must be at least 3",
        });
    }
    Ok(())
}

pub fn validate_time_budget(budget: Option<Duration>) -> ElasticityResult<()> {
    match budget {
        Some(b) if b.is_zero() => Err(ElasticityError::InvalidOption {
            name: "time_budget",
            value: 0.0,
            reason: "must be positive when set",
        }),
        _ => Ok(()),
    }
}
