//! pricing::grid — candidate price grids around a reference price.
//!
//! Purpose
//! -------
//! Build the ascending set of candidate prices searched by the optimizer.
//!
//! Key behaviors
//! -------------
//! - `floor = floor_price` or `reference · (1 − down_pct)`.
//! - `ceiling = ceil_price` or `reference · (1 + up_pct)`.
//! - `step = step` or `max(0.01, 0.01 · reference)`.
//! - Points are `floor + i·step` for every `i` with
//!   `floor + i·step ≤ ceiling + 1e-9`; each point is computed from `i`, so
//!   rounding does not accumulate.
//! - Fewer than two points, or `floor ≥ ceiling`, is a
//!   [`PricingError::DegenerateGrid`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Grid prices are finite, non-negative and strictly increasing.
//! - A grid never exceeds [`MAX_GRID_POINTS`] points.
use crate::{
    elasticity::data::Observation,
    pricing::errors::{PricingError, PricingResult},
};
use serde::{Deserialize, Serialize};

/// Smallest default step in currency units.
pub const MIN_STEP: f64 = 0.01;
/// Default step as a fraction of the reference price.
pub const RELATIVE_STEP: f64 = 0.01;
/// Slack allowing the ceiling itself onto the grid despite rounding.
pub const GRID_EPS: f64 = 1e-9;
/// Upper bound on the number of grid points.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// GridConfig — how to span prices around a reference.
///
/// Fields
/// ------
/// - `down_pct`: `f64`
///   Fraction below the reference for the default floor (default `0.30`).
/// - `up_pct`: `f64`
///   Fraction above the reference for the default ceiling (default `0.20`).
/// - `step`: `Option<f64>`
///   Spacing; defaults to `max(0.01, 0.01 · reference)`.
/// - `floor_price`, `ceil_price`: `Option<f64>`
///   Explicit bounds overriding the percentage offsets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub down_pct: f64,
    pub up_pct: f64,
    pub step: Option<f64>,
    pub floor_price: Option<f64>,
    pub ceil_price: Option<f64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig { down_pct: 0.30, up_pct: 0.20, step: None, floor_price: None, ceil_price: None }
    }
}

/// Ascending candidate prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceGrid {
    prices: Vec<f64>,
}

impl PriceGrid {
    /// Build the grid for `reference_price` under `config`.
    ///
    /// Errors
    /// ------
    /// - `PricingError::InvalidInput` for a non-positive reference, an
    ///   offset outside its range (checked only when its bound is derived
    ///   from it), a non-positive step, negative bounds, or a grid larger
    ///   than [`MAX_GRID_POINTS`].
    /// - `PricingError::DegenerateGrid` when `floor ≥ ceiling` or fewer than
    ///   two points fit.
    pub fn build(reference_price: f64, config: &GridConfig) -> PricingResult<PriceGrid> {
        require(
            reference_price.is_finite() && reference_price > 0.0,
            "reference_price",
            reference_price,
            "must be finite and positive",
        )?;
        // Offsets only matter for the bounds they derive.
        let floor = match config.floor_price {
            Some(floor) => floor,
            None => {
                require(
                    config.down_pct.is_finite() && (0.0..=1.0).contains(&config.down_pct),
                    "down_pct",
                    config.down_pct,
                    "must lie in [0, 1]",
                )?;
                reference_price * (1.0 - config.down_pct)
            }
        };
        let ceiling = match config.ceil_price {
            Some(ceiling) => ceiling,
            None => {
                require(
                    config.up_pct.is_finite() && config.up_pct >= 0.0,
                    "up_pct",
                    config.up_pct,
                    "must be finite and non-negative",
                )?;
                reference_price * (1.0 + config.up_pct)
            }
        };
        let step = config.step.unwrap_or((RELATIVE_STEP * reference_price).max(MIN_STEP));
        let non_negative = "must be finite and non-negative";
        require(floor.is_finite() && floor >= 0.0, "floor_price", floor, non_negative)?;
        require(ceiling.is_finite() && ceiling >= 0.0, "ceil_price", ceiling, non_negative)?;
        require(step.is_finite() && step > 0.0, "step", step, "must be finite and positive")?;

        if floor >= ceiling {
            return Err(PricingError::DegenerateGrid { points: 0, floor, ceiling });
        }
        let span = ((ceiling - floor + GRID_EPS) / step).floor();
        if span >= MAX_GRID_POINTS as f64 {
            return Err(PricingError::InvalidInput {
                name: "step",
                value: step,
                reason: "yields more than 1e6 grid points",
            });
        }

        let limit = ceiling + GRID_EPS;
        let prices: Vec<f64> = (0..=span as usize + 1)
            .map(|i| floor + i as f64 * step)
            .take_while(|&p| p <= limit)
            .collect();
        if prices.len() < 2 {
            return Err(PricingError::DegenerateGrid { points: prices.len(), floor, ceiling });
        }

        log::debug!("price grid: {} points in [{floor}, {ceiling}] step {step}", prices.len());
        Ok(PriceGrid { prices })
    }

    /// Use an explicit list of prices.
    ///
    /// Errors
    /// ------
    /// - `PricingError::DegenerateGrid` for fewer than two prices.
    /// - `PricingError::InvalidInput` for negative, non-finite, or
    ///   non-increasing prices.
    pub fn from_prices(prices: Vec<f64>) -> PricingResult<PriceGrid> {
        if prices.len() < 2 {
            let bound = prices.first().copied().unwrap_or(f64::NAN);
            return Err(PricingError::DegenerateGrid {
                points: prices.len(),
                floor: bound,
                ceiling: bound,
            });
        }
        if let Some(&bad) = prices.iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
            return Err(PricingError::InvalidInput {
                name: "prices",
                value: bad,
                reason: "must be finite and non-negative",
            });
        }
        if let Some(w) = prices.windows(2).find(|w| w[1] <= w[0]) {
            return Err(PricingError::InvalidInput {
                name: "prices",
                value: w[1],
                reason: "must be strictly increasing",
            });
        }
        Ok(PriceGrid { prices })
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn floor(&self) -> f64 {
        self.prices[0]
    }

    pub fn ceiling(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }
}

/// Most recent usable price in `observations`, by week.
///
/// The natural reference for [`PriceGrid::build`]: the price currently
/// charged. Rows with a missing or non-positive price are ignored.
pub fn latest_price(observations: &[Observation]) -> Option<f64> {
    observations
        .iter()
        .filter_map(|o| o.price.filter(|p| p.is_finite() && *p > 0.0).map(|p| (o.week, p)))
        .max_by_key(|(week, _)| *week)
        .map(|(_, p)| p)
}

// ---- Helper methods ----

fn require(ok: bool, name: &'static str, value: f64, reason: &'static str) -> PricingResult<()> {
    if ok { Ok(()) } else { Err(PricingError::InvalidInput { name, value, reason }) }
}
