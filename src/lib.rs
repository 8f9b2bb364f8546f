//! price_elasticity — price elasticity estimation and revenue-maximizing
//! price recommendation, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the estimator and the optimizer to a Python presentation layer
//! via the `_price_elasticity` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules: [`elasticity`] (log-log regression
//!   with bootstrap inference), [`pricing`] (grid search under propagated
//!   elasticity uncertainty), and the shared [`inference`] helpers.
//! - Behind `python-bindings`, define `#[pyclass]` wrappers and the
//!   `#[pymodule]` initializer, with `elasticity` and `pricing` submodules.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion, and error mapping.
//! - Results are immutable values; nothing is shared between calls.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are typed enums internally and become
//!   `ValueError` at the PyO3 boundary.
//! - Missing prices and quantities arrive from Python as `NaN`.
//!
//! Downstream usage
//! ----------------
//! - Rust callers: [`elasticity::estimate_elasticity`], then
//!   [`pricing::ElasticityDraws`] and [`pricing::optimize_price`].
//! - Python callers import `_price_elasticity.elasticity.ElasticityEstimate`
//!   and `_price_elasticity.pricing.PriceRecommendation`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   end-to-end pipeline test under `tests/`.

pub mod elasticity;
pub mod inference;
pub mod pricing;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray1;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyValueError,
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use rand::{SeedableRng, rngs::StdRng};

#[cfg(feature = "python-bindings")]
use crate::{
    elasticity::{EstimationResult, estimate_elasticity},
    pricing::{
        DrawSource, ElasticityDraws, OptimizationResult, OptimizerOptions, RecommendationRecord,
        optimize_for_estimate, optimize_price,
    },
    utils::{build_observations, extract_estimator_opts, extract_f64_array, extract_grid_config},
};

#[cfg(feature = "python-bindings")]
fn f64_vec<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let arr: PyReadonlyArray1<f64> = extract_f64_array(py, raw)?;
    let slice = arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("expected a contiguous 1-D float64 array"))?;
    Ok(slice.to_vec())
}

/// ElasticityEstimate — Python-facing wrapper for [`EstimationResult`].
///
/// Constructed from Python as
/// `ElasticityEstimate(weeks, prices, quantities, iterations=500,
/// confidence_level=0.95, seed=None, min_observations=10, parallel=False)`,
/// where `weeks` are `YYYY-MM-DD` strings and missing values are `NaN`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "price_elasticity.elasticity")]
pub struct ElasticityEstimate {
    inner: EstimationResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl ElasticityEstimate {
    #[new]
    #[pyo3(
        text_signature = "(weeks, prices, quantities, /, iterations=500, confidence_level=0.95, seed=None, min_observations=10, parallel=False)",
        signature = (weeks, prices, quantities, iterations = None, confidence_level = None, seed = None, min_observations = None, parallel = None)
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, weeks: Vec<String>, prices: &Bound<'py, PyAny>,
        quantities: &Bound<'py, PyAny>, iterations: Option<usize>, confidence_level: Option<f64>,
        seed: Option<u64>, min_observations: Option<usize>, parallel: Option<bool>,
    ) -> PyResult<ElasticityEstimate> {
        let prices = f64_vec(py, prices)?;
        let quantities = f64_vec(py, quantities)?;
        let observations = build_observations(&weeks, &prices, &quantities)?;
        let opts =
            extract_estimator_opts(iterations, confidence_level, seed, min_observations, parallel)?;
        let inner = py.allow_threads(|| estimate_elasticity(&observations, &opts))?;
        Ok(ElasticityEstimate { inner })
    }

    #[getter]
    pub fn point_elasticity(&self) -> f64 {
        self.inner.point_elasticity()
    }

    /// `(lower, upper)`; raises `ValueError` when the interval is undefined.
    #[getter]
    pub fn ci(&self) -> PyResult<(f64, f64)> {
        let ci = self.inner.interval()?;
        Ok((ci.lower(), ci.upper()))
    }

    #[getter]
    pub fn has_interval(&self) -> bool {
        self.inner.confidence_interval().is_defined()
    }

    #[getter]
    pub fn scale_parameter(&self) -> f64 {
        self.inner.scale_parameter()
    }

    #[getter]
    pub fn std_error(&self) -> Option<f64> {
        self.inner.elasticity_std_error()
    }

    #[getter]
    pub fn sample_size(&self) -> usize {
        self.inner.sample_size()
    }

    #[getter]
    pub fn discarded(&self) -> usize {
        self.inner.discarded()
    }

    #[getter]
    pub fn attempted_iterations(&self) -> usize {
        self.inner.bootstrap().attempted
    }

    #[getter]
    pub fn successful_iterations(&self) -> usize {
        self.inner.bootstrap().successful()
    }

    #[getter]
    pub fn draws(&self) -> Vec<f64> {
        self.inner.bootstrap_draws().to_vec()
    }

    #[getter]
    pub fn seed(&self) -> Option<u64> {
        self.inner.seed()
    }
}

/// PriceRecommendation — Python-facing wrapper for [`OptimizationResult`].
///
/// Either built from raw inputs,
/// `PriceRecommendation(point_elasticity, draws, scale, reference_price, ...)`,
/// or from an estimate with `PriceRecommendation.from_estimate(estimate,
/// reference_price, draw_source="bootstrap", ...)`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "price_elasticity.pricing")]
pub struct PriceRecommendation {
    inner: OptimizationResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PriceRecommendation {
    #[new]
    #[pyo3(
        text_signature = "(point_elasticity, draws, scale, reference_price, /, down_pct=0.3, up_pct=0.2, step=None, floor_price=None, ceil_price=None, confidence_level=0.95, parallel=False)",
        signature = (point_elasticity, draws, scale, reference_price, down_pct = None, up_pct = None, step = None, floor_price = None, ceil_price = None, confidence_level = None, parallel = None)
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, point_elasticity: f64, draws: &Bound<'py, PyAny>, scale: f64,
        reference_price: f64, down_pct: Option<f64>, up_pct: Option<f64>, step: Option<f64>,
        floor_price: Option<f64>, ceil_price: Option<f64>, confidence_level: Option<f64>,
        parallel: Option<bool>,
    ) -> PyResult<PriceRecommendation> {
        let draws = ElasticityDraws::from_values(f64_vec(py, draws)?)?;
        let cfg = extract_grid_config(down_pct, up_pct, step, floor_price, ceil_price);
        let opts = optimizer_opts(confidence_level, parallel);
        let inner = py.allow_threads(|| {
            optimize_price(point_elasticity, &draws, scale, reference_price, &cfg, &opts)
        })?;
        Ok(PriceRecommendation { inner })
    }

    /// Recommend from an estimate. `draw_source` is `"bootstrap"` (the
    /// estimate's own draws) or `"normal"` (`normal_draws` values from the
    /// normal approximation, seeded by `seed`).
    #[staticmethod]
    #[pyo3(
        signature = (estimate, reference_price, draw_source = "bootstrap", normal_draws = 500, seed = 0, down_pct = None, up_pct = None, step = None, confidence_level = None)
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn from_estimate(
        py: Python<'_>, estimate: PyRef<'_, ElasticityEstimate>, reference_price: f64,
        draw_source: &str, normal_draws: usize, seed: u64, down_pct: Option<f64>,
        up_pct: Option<f64>, step: Option<f64>, confidence_level: Option<f64>,
    ) -> PyResult<PriceRecommendation> {
        let est = &estimate.inner;
        let draws = match draw_source {
            "bootstrap" => ElasticityDraws::from_bootstrap(est)?,
            "normal" => {
                let ci = est.interval()?;
                let mut rng = StdRng::seed_from_u64(seed);
                ElasticityDraws::normal_approximation(
                    est.point_elasticity(),
                    &ci,
                    normal_draws,
                    &mut rng,
                )?
            }
            other => {
                return Err(PyValueError::new_err(format!(
                    "draw_source must be 'bootstrap' or 'normal', got '{other}'"
                )));
            }
        };
        let cfg = extract_grid_config(down_pct, up_pct, step, None, None);
        let opts = optimizer_opts(confidence_level, None);
        let inner =
            py.allow_threads(|| optimize_for_estimate(est, &draws, reference_price, &cfg, &opts))?;
        Ok(PriceRecommendation { inner })
    }

    #[getter]
    pub fn best_price(&self) -> f64 {
        self.inner.best_price()
    }

    #[getter]
    pub fn best_revenue(&self) -> f64 {
        self.inner.best_revenue()
    }

    #[getter]
    pub fn price_ci(&self) -> (f64, f64) {
        let ci = self.inner.price_interval();
        (ci.lower(), ci.upper())
    }

    #[getter]
    pub fn is_boundary_solution(&self) -> bool {
        self.inner.is_boundary_solution()
    }

    #[getter]
    pub fn prices(&self) -> Vec<f64> {
        self.inner.curve().points().iter().map(|pt| pt.price).collect()
    }

    /// Revenue per grid price; `None` where undefined.
    #[getter]
    pub fn revenues(&self) -> Vec<Option<f64>> {
        self.inner.curve().points().iter().map(|pt| pt.revenue).collect()
    }

    #[getter]
    pub fn draws_used(&self) -> usize {
        self.inner.draws_used()
    }

    #[getter]
    pub fn draws_skipped(&self) -> usize {
        self.inner.draws_skipped()
    }

    #[getter]
    pub fn draw_source(&self) -> &'static str {
        match self.inner.draw_source() {
            DrawSource::Bootstrap => "bootstrap",
            DrawSource::NormalApproximation { .. } => "normal",
            DrawSource::Supplied => "supplied",
        }
    }

    /// Flat export row `{product_id, recommended_price, ci_lower, ci_upper}`.
    pub fn record<'py>(&self, py: Python<'py>, product_id: &str) -> PyResult<Bound<'py, PyDict>> {
        let record = RecommendationRecord::from_result(product_id, &self.inner);
        let dict = PyDict::new(py);
        dict.set_item("product_id", record.product_id)?;
        dict.set_item("recommended_price", record.recommended_price)?;
        dict.set_item("ci_lower", record.ci_lower)?;
        dict.set_item("ci_upper", record.ci_upper)?;
        Ok(dict)
    }
}

#[cfg(feature = "python-bindings")]
fn optimizer_opts(confidence_level: Option<f64>, parallel: Option<bool>) -> OptimizerOptions {
    let defaults = OptimizerOptions::default();
    OptimizerOptions {
        confidence_level: confidence_level.unwrap_or(defaults.confidence_level),
        parallel: parallel.unwrap_or(defaults.parallel),
        ..defaults
    }
}

/// _price_elasticity — PyO3 module initializer for the Python extension.
///
/// Creates the `elasticity` and `pricing` submodules, attaches them to the
/// parent module, and registers them in `sys.modules` so dotted imports
/// work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _price_elasticity<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let elasticity_mod = PyModule::new(_py, "elasticity")?;
    let pricing_mod = PyModule::new(_py, "pricing")?;
    elasticity_mod.add_class::<ElasticityEstimate>()?;
    pricing_mod.add_class::<PriceRecommendation>()?;
    m.add_submodule(&elasticity_mod)?;
    m.add_submodule(&pricing_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    let modules = _py.import("sys")?.getattr("modules")?;
    modules.set_item("price_elasticity.elasticity", elasticity_mod)?;
    modules.set_item("price_elasticity.pricing", pricing_mod)?;
    Ok(())
}
