//! inference::interval — empirical percentiles and percentile intervals.
//!
//! Purpose
//! -------
//! Turn an unordered collection of draws (bootstrap coefficients, per-draw
//! optimal prices) into percentiles and two-sided percentile confidence
//! intervals.
//!
//! Key behaviors
//! -------------
//! - [`percentile`] computes the `q`-th percentile with linear
//!   interpolation between order statistics (the "linear" / type-7 rule).
//! - [`percentile_interval`] returns the central `level` interval
//!   `[P_{(1-level)/2}, P_{(1+level)/2}]` as a [`ConfidenceInterval`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are copied and sorted internally, so the result does not depend
//!   on the order in which draws were collected. Parallel producers can
//!   therefore hand over their results in any order.
//! - Every returned interval satisfies `lower <= upper`.
//!
//! Testing notes
//! -------------
//! - Unit tests check interpolation against hand-computed values, order
//!   independence, collapsed intervals for constant samples, and each error
//!   branch.
use crate::inference::errors::{InferenceError, InferenceResult};
use serde::{Deserialize, Serialize};

/// ConfidenceInterval — a two-sided interval `[lower, upper]` at `level`.
///
/// Invariants
/// ----------
/// - `lower <= upper` and both bounds are finite.
/// - `level ∈ (0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    lower: f64,
    upper: f64,
    level: f64,
}

impl ConfidenceInterval {
    /// Lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Nominal coverage level, e.g. `0.95`.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// `upper - lower`.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `value` lies in the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Compute the `q`-th percentile of `values` with linear interpolation.
///
/// Parameters
/// ----------
/// - `values`: `&[f64]`
///   Sample of finite values in any order. Must be non-empty.
/// - `q`: `f64`
///   Percentile rank in `[0, 100]`.
///
/// Returns
/// -------
/// `InferenceResult<f64>`
///   With sorted values `x_(0) ≤ … ≤ x_(n−1)` and `h = (n − 1)·q/100`,
///   returns `x_(⌊h⌋) + (h − ⌊h⌋)·(x_(⌊h⌋+1) − x_(⌊h⌋))`.
///
/// Errors
/// ------
/// - `InferenceError::EmptySample` when `values` is empty.
/// - `InferenceError::NonFiniteValue` when any value is NaN or ±∞.
/// - `InferenceError::InvalidPercentile` when `q ∉ [0, 100]`.
///
/// Examples
/// --------
/// ```rust
/// # use price_elasticity::inference::interval::percentile;
/// let p = percentile(&[4.0, 1.0, 3.0, 2.0], 50.0).unwrap();
/// assert!((p - 2.5).abs() < 1e-12);
/// ```
pub fn percentile(values: &[f64], q: f64) -> InferenceResult<f64> {
    if !(0.0..=100.0).contains(&q) {
        return Err(InferenceError::InvalidPercentile { q });
    }
    let sorted = sorted_finite(values)?;
    Ok(interpolate(&sorted, q))
}

/// Central percentile interval of `values` at coverage `level`.
///
/// For `level = 0.95` this is `[P_2.5, P_97.5]`.
///
/// Errors
/// ------
/// - `InferenceError::InvalidLevel` when `level ∉ (0, 1)`.
/// - Any error from the percentile computation (empty or non-finite input).
pub fn percentile_interval(values: &[f64], level: f64) -> InferenceResult<ConfidenceInterval> {
    if !(level > 0.0 && level < 1.0) {
        return Err(InferenceError::InvalidLevel { level });
    }
    let sorted = sorted_finite(values)?;
    let tail = 50.0 * (1.0 - level);
    let lower = interpolate(&sorted, tail);
    let upper = interpolate(&sorted, 100.0 - tail);
    // Interpolation on a sorted sample is monotone in q; the max guards the
    // last ulp when both ranks land in the same cell.
    Ok(ConfidenceInterval { lower, upper: upper.max(lower), level })
}

// ---- Helper methods ----

fn sorted_finite(values: &[f64]) -> InferenceResult<Vec<f64>> {
    if values.is_empty() {
        return Err(InferenceError::EmptySample);
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(InferenceError::NonFiniteValue { index, value });
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

fn interpolate(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * q / 100.0;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}
