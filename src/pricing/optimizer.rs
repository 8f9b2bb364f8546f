//! pricing::optimizer — revenue-maximizing price with a plug-in bootstrap CI.
//!
//! Purpose
//! -------
//! Search a price grid for the price maximizing `R(p) = s · p^(e+1)` at the
//! point elasticity, then re-optimize on the same grid for every
//! elasticity draw and report the percentile interval of the per-draw
//! optimal prices.
//!
//! Key behaviors
//! -------------
//! - The grid is built and checked before any revenue is evaluated.
//! - Undefined revenues never win the argmax; ties go to the lowest price.
//! - Draws that are non-finite or have no feasible optimum are skipped and
//!   counted. If none remain the call fails with
//!   [`PricingError::NoFeasibleDraws`].
//! - The draw loop runs on the rayon pool when `parallel` is set. Each draw
//!   is independent and the percentile reduction sorts its input, so the
//!   result is the same either way.
//! - `is_boundary_solution` flags an optimum on the first or last grid
//!   point, which is what monotone revenue curves (`e ≤ −1` or
//!   `−1 < e < 0`) always produce.
//!
//! Invariants & assumptions
//! ------------------------
//! - `draws_used + draws_skipped == draws.len()` on success.
//! - `price_interval.lower() ≤ price_interval.upper()`, both on the grid.
use crate::{
    elasticity::estimator::EstimationResult,
    inference::interval::{ConfidenceInterval, percentile_interval},
    pricing::{
        demand::{ConstantElasticityDemand, RevenueCurve},
        draws::{DrawSource, ElasticityDraws},
        errors::{PricingError, PricingResult},
        grid::{GridConfig, PriceGrid},
    },
    utils::Deadline,
};
use rayon::prelude::*;
use std::time::Duration;

/// OptimizerOptions — settings for the draw re-optimization loop.
///
/// Fields
/// ------
/// - `confidence_level`: `f64`
///   Coverage of the price interval (default `0.95`).
/// - `parallel`: `bool`
///   Re-optimize draws on the rayon pool.
/// - `time_budget`: `Option<Duration>`
///   Wall-clock limit for the call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerOptions {
    pub confidence_level: f64,
    pub parallel: bool,
    pub time_budget: Option<Duration>,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        OptimizerOptions { confidence_level: 0.95, parallel: false, time_budget: None }
    }
}

impl OptimizerOptions {
    pub fn validate(&self) -> PricingResult<()> {
        let level = self.confidence_level;
        if !(level.is_finite() && level > 0.0 && level < 1.0) {
            return Err(PricingError::InvalidInput {
                name: "confidence_level",
                value: level,
                reason: "must lie strictly between 0 and 1",
            });
        }
        if self.time_budget.is_some_and(|b| b.is_zero()) {
            return Err(PricingError::InvalidInput {
                name: "time_budget",
                value: 0.0,
                reason: "must be positive when set",
            });
        }
        Ok(())
    }
}

/// OptimizationResult — recommended price and its uncertainty.
///
/// Fields
/// ------
/// - `best_price`, `best_revenue`, `best_index`: grid optimum at the point
///   elasticity.
/// - `price_interval`: percentile interval of per-draw optimal prices.
/// - `curve`: revenue curve at the point elasticity.
/// - `is_boundary_solution`: the optimum is the first or last grid point.
/// - `draws_used`, `draws_skipped`: draw accounting.
/// - `boundary_draw_share`: fraction of used draws whose optimum is on the
///   grid boundary.
/// - `draw_source`: where the draws came from.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    best_price: f64,
    best_revenue: f64,
    best_index: usize,
    price_interval: ConfidenceInterval,
    curve: RevenueCurve,
    is_boundary_solution: bool,
    draws_used: usize,
    draws_skipped: usize,
    boundary_draw_share: f64,
    draw_source: DrawSource,
}

impl OptimizationResult {
    pub fn best_price(&self) -> f64 {
        self.best_price
    }

    pub fn best_revenue(&self) -> f64 {
        self.best_revenue
    }

    pub fn best_index(&self) -> usize {
        self.best_index
    }

    pub fn price_interval(&self) -> &ConfidenceInterval {
        &self.price_interval
    }

    pub fn curve(&self) -> &RevenueCurve {
        &self.curve
    }

    pub fn is_boundary_solution(&self) -> bool {
        self.is_boundary_solution
    }

    pub fn draws_used(&self) -> usize {
        self.draws_used
    }

    pub fn draws_skipped(&self) -> usize {
        self.draws_skipped
    }

    pub fn boundary_draw_share(&self) -> f64 {
        self.boundary_draw_share
    }

    pub fn draw_source(&self) -> DrawSource {
        self.draw_source
    }
}

/// Optimize price around `reference_price`.
///
/// Parameters
/// ----------
/// - `point_elasticity`: `f64`
///   Elasticity used for the recommended price and the reported curve.
/// - `draws`: `&ElasticityDraws`
///   Elasticity uncertainty; see [`DrawSource`].
/// - `scale`: `f64`
///   Demand scale `exp(intercept)`, strictly positive.
/// - `reference_price`: `f64`
///   Current price the grid is centred on.
/// - `grid_config`: `&GridConfig`
///   Bounds and step.
/// - `options`: `&OptimizerOptions`
///
/// Errors
/// ------
/// - `PricingError::InvalidInput` for invalid scalars or options.
/// - `PricingError::DegenerateGrid` before any optimization work.
/// - `PricingError::NoFeasibleMaximum` if the point curve is undefined
///   everywhere.
/// - `PricingError::NoFeasibleDraws` if no draw yields an optimum.
/// - `PricingError::ComputationTimeout` if `time_budget` runs out.
///
/// Examples
/// --------
/// ```rust
/// use price_elasticity::pricing::{
///     ElasticityDraws, GridConfig, OptimizerOptions, optimize_price,
/// };
///
/// let draws = ElasticityDraws::from_values(vec![-2.0; 10]).unwrap();
/// let cfg = GridConfig {
///     step: Some(1.0),
///     floor_price: Some(1.0),
///     ceil_price: Some(10.0),
///     ..GridConfig::default()
/// };
/// let result =
///     optimize_price(-2.0, &draws, 100.0, 5.0, &cfg, &OptimizerOptions::default()).unwrap();
/// assert_eq!(result.best_price(), 1.0);
/// assert!(result.is_boundary_solution());
/// ```
pub fn optimize_price(
    point_elasticity: f64, draws: &ElasticityDraws, scale: f64, reference_price: f64,
    grid_config: &GridConfig, options: &OptimizerOptions,
) -> PricingResult<OptimizationResult> {
    options.validate()?;
    let grid = PriceGrid::build(reference_price, grid_config)?;
    optimize_on_grid(point_elasticity, draws, scale, &grid, options)
}

/// [`optimize_price`] with the elasticity and scale of `estimate`.
pub fn optimize_for_estimate(
    estimate: &EstimationResult, draws: &ElasticityDraws, reference_price: f64,
    grid_config: &GridConfig, options: &OptimizerOptions,
) -> PricingResult<OptimizationResult> {
    optimize_price(
        estimate.point_elasticity(),
        draws,
        estimate.scale_parameter(),
        reference_price,
        grid_config,
        options,
    )
}

/// Optimize on a prebuilt grid.
pub fn optimize_on_grid(
    point_elasticity: f64, draws: &ElasticityDraws, scale: f64, grid: &PriceGrid,
    options: &OptimizerOptions,
) -> PricingResult<OptimizationResult> {
    options.validate()?;
    let model = ConstantElasticityDemand::new(point_elasticity, scale)?;
    let curve = model.curve(grid);
    let best_index = curve.argmax().ok_or(PricingError::NoFeasibleMaximum)?;
    let best = curve.points()[best_index];
    let best_revenue = best.revenue.ok_or(PricingError::NoFeasibleMaximum)?;

    let deadline = Deadline::start(options.time_budget);
    let reoptimize = |&elasticity: &f64| -> DrawOutcome {
        if deadline.as_ref().is_some_and(Deadline::expired) {
            return DrawOutcome::Expired;
        }
        match ConstantElasticityDemand::new(elasticity, scale) {
            Ok(m) => m.best_index(grid).map_or(DrawOutcome::Skipped, DrawOutcome::Optimum),
            Err(_) => DrawOutcome::Skipped,
        }
    };
    let outcomes: Vec<DrawOutcome> = if options.parallel {
        draws.values().par_iter().map(reoptimize).collect()
    } else {
        draws.values().iter().map(reoptimize).collect()
    };

    let last = grid.len() - 1;
    let mut prices = Vec::with_capacity(outcomes.len());
    let mut skipped = 0usize;
    let mut on_boundary = 0usize;
    let mut expired = false;
    for outcome in outcomes {
        match outcome {
            DrawOutcome::Optimum(idx) => {
                if idx == 0 || idx == last {
                    on_boundary += 1;
                }
                prices.push(grid.prices()[idx]);
            }
            DrawOutcome::Skipped => skipped += 1,
            DrawOutcome::Expired => expired = true,
        }
    }

    if let (true, Some(deadline)) = (expired, deadline) {
        return Err(PricingError::ComputationTimeout {
            budget: deadline.budget(),
            elapsed: deadline.elapsed(),
            completed: prices.len() + skipped,
        });
    }
    if skipped > 0 {
        log::warn!("price optimization: skipped {skipped} of {} elasticity draws", draws.len());
    }
    if prices.is_empty() {
        return Err(PricingError::NoFeasibleDraws { skipped });
    }

    let price_interval = percentile_interval(&prices, options.confidence_level)?;
    let is_boundary_solution = curve.is_boundary(best_index);
    log::debug!(
        "best price {} (boundary: {is_boundary_solution}), interval [{}, {}] from {} draws",
        best.price,
        price_interval.lower(),
        price_interval.upper(),
        prices.len()
    );

    Ok(OptimizationResult {
        best_price: best.price,
        best_revenue,
        best_index,
        price_interval,
        curve,
        is_boundary_solution,
        draws_used: prices.len(),
        draws_skipped: skipped,
        boundary_draw_share: on_boundary as f64 / prices.len() as f64,
        draw_source: draws.source(),
    })
}

enum DrawOutcome {
    Optimum(usize),
    Skipped,
    Expired,
}
