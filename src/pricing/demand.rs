//! pricing::demand — constant-elasticity demand and revenue curves.
//!
//! Purpose
//! -------
//! Evaluate the demand curve implied by a log-log fit,
//!
//! ```text
//! d(p) = s · p^e,        R(p) = p · d(p) = s · p^(e+1),
//! ```
//!
//! over a price grid and locate the revenue-maximizing grid point.
//!
//! Key behaviors
//! -------------
//! - Non-finite model values (overflow, `0^e` for `e < 0`, negative bases)
//!   are `None`, never NaN placeholders.
//! - `R(0) = 0` for every elasticity.
//! - [`RevenueCurve::argmax`] skips undefined points and breaks ties toward
//!   the lowest price.
//!
//! Invariants & assumptions
//! ------------------------
//! - `scale` is finite and strictly positive; `elasticity` is finite.
//! - Curves inherit the ascending order of their grid.
use crate::pricing::{
    errors::{PricingError, PricingResult},
    grid::PriceGrid,
};
use serde::{Deserialize, Serialize};

/// Demand `scale · price^elasticity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantElasticityDemand {
    elasticity: f64,
    scale: f64,
}

impl ConstantElasticityDemand {
    /// Errors
    /// ------
    /// - `PricingError::InvalidInput` when `elasticity` is not finite or
    ///   `scale` is not finite and positive.
    pub fn new(elasticity: f64, scale: f64) -> PricingResult<Self> {
        if !elasticity.is_finite() {
            return Err(PricingError::InvalidInput {
                name: "elasticity",
                value: elasticity,
                reason: "must be finite",
            });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(PricingError::InvalidInput {
                name: "scale",
                value: scale,
                reason: "must be finite and positive",
            });
        }
        Ok(ConstantElasticityDemand { elasticity, scale })
    }

    /// Curve from a regression intercept, `scale = exp(intercept)`.
    pub fn from_intercept(elasticity: f64, intercept: f64) -> PricingResult<Self> {
        Self::new(elasticity, intercept.exp())
    }

    pub fn elasticity(&self) -> f64 {
        self.elasticity
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn demand(&self, price: f64) -> Option<f64> {
        finite(self.scale * price.powf(self.elasticity))
    }

    pub fn revenue(&self, price: f64) -> Option<f64> {
        if price == 0.0 {
            return Some(0.0);
        }
        self.demand(price).and_then(|d| finite(price * d))
    }

    /// Evaluate demand and revenue at every grid price.
    pub fn curve(&self, grid: &PriceGrid) -> RevenueCurve {
        RevenueCurve {
            points: grid
                .prices()
                .iter()
                .map(|&price| RevenuePoint {
                    price,
                    demand: self.demand(price),
                    revenue: self.revenue(price),
                })
                .collect(),
        }
    }

    /// Index of the revenue-maximizing grid price without building a curve.
    pub fn best_index(&self, grid: &PriceGrid) -> Option<usize> {
        first_argmax(grid.prices().iter().map(|&p| self.revenue(p)))
    }
}

/// One `(price, demand, revenue)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub price: f64,
    pub demand: Option<f64>,
    pub revenue: Option<f64>,
}

/// Revenue curve over an ascending price grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueCurve {
    points: Vec<RevenuePoint>,
}

impl RevenueCurve {
    pub fn points(&self) -> &[RevenuePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First index of the largest defined revenue; `None` if no revenue is
    /// defined.
    pub fn argmax(&self) -> Option<usize> {
        first_argmax(self.points.iter().map(|pt| pt.revenue))
    }

    /// Whether `index` is the first or last grid point.
    pub fn is_boundary(&self, index: usize) -> bool {
        index == 0 || index + 1 == self.points.len()
    }
}

// ---- Helper methods ----

#[inline]
fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn first_argmax(values: impl Iterator<Item = Option<f64>>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, value) in values.enumerate() {
        let Some(v) = value else { continue };
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}
