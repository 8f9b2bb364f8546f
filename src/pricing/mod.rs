//! pricing — revenue-maximizing price recommendation.
//!
//! Purpose
//! -------
//! Turn an elasticity estimate into a recommended price on a grid around
//! the current price, with a confidence interval obtained by re-optimizing
//! under each elasticity draw.
//!
//! Key behaviors
//! -------------
//! - [`grid`] spans the candidate prices and rejects degenerate grids.
//! - [`demand`] evaluates the constant-elasticity demand and revenue curve.
//! - [`draws`] labels the elasticity uncertainty with its source
//!   (bootstrap or normal approximation).
//! - [`optimizer`] runs the point and per-draw argmax.
//! - [`export`] flattens a result into the exported recommendation row.

pub mod demand;
pub mod draws;
pub mod errors;
pub mod export;
pub mod grid;
pub mod optimizer;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::demand::{ConstantElasticityDemand, RevenueCurve, RevenuePoint};
pub use self::draws::{DrawSource, ElasticityDraws};
pub use self::errors::{PricingError, PricingResult};
pub use self::export::RecommendationRecord;
pub use self::grid::{GridConfig, PriceGrid, latest_price};
pub use self::optimizer::{
    OptimizationResult, OptimizerOptions, optimize_for_estimate, optimize_on_grid, optimize_price,
};

pub mod prelude {
    pub use super::draws::{DrawSource, ElasticityDraws};
    pub use super::errors::{PricingError, PricingResult};
    pub use super::grid::GridConfig;
    pub use super::optimizer::{OptimizationResult, OptimizerOptions, optimize_price};
}
