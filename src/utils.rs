//! utils — wall-clock budgets and Python conversion helpers.
//!
//! - [`Deadline`] tracks an optional per-call time budget shared by the
//!   bootstrap and draw re-optimization loops.
//! - Behind `python-bindings`, helpers convert NumPy/pandas inputs into
//!   Rust slices and build option structs from keyword arguments.
use std::time::{Duration, Instant};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    elasticity::{BootstrapOptions, EstimatorOptions, Observation},
    pricing::GridConfig,
};

/// Wall-clock budget started at construction.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start the clock for `budget`; `None` means unbounded.
    pub fn start(budget: Option<Duration>) -> Option<Deadline> {
        budget.map(|budget| Deadline { start: Instant::now(), budget })
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn expired(&self) -> bool {
        self.elapsed() > self.budget
    }
}

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Zip ISO-8601 week dates with price and quantity columns; NaN marks a
/// missing value.
#[cfg(feature = "python-bindings")]
pub fn build_observations(
    weeks: &[String], prices: &[f64], quantities: &[f64],
) -> PyResult<Vec<Observation>> {
    if weeks.len() != prices.len() || weeks.len() != quantities.len() {
        return Err(PyValueError::new_err("weeks, prices and quantities must have equal length"));
    }
    weeks
        .iter()
        .zip(prices.iter().zip(quantities.iter()))
        .map(|(week, (&price, &quantity))| {
            let date = chrono::NaiveDate::parse_from_str(week, "%Y-%m-%d").map_err(|_| {
                PyValueError::new_err(format!("week '{week}' is not a YYYY-MM-DD date"))
            })?;
            let present = |v: f64| if v.is_nan() { None } else { Some(v) };
            Ok(Observation::new(date, present(price), present(quantity)))
        })
        .collect()
}

#[cfg(feature = "python-bindings")]
pub fn extract_estimator_opts(
    iterations: Option<usize>, confidence_level: Option<f64>, seed: Option<u64>,
    min_observations: Option<usize>, parallel: Option<bool>,
) -> PyResult<EstimatorOptions> {
    let defaults = EstimatorOptions::default();
    let bootstrap = BootstrapOptions::new(
        iterations.unwrap_or(defaults.bootstrap.iterations),
        confidence_level.unwrap_or(defaults.bootstrap.confidence_level),
        seed,
        parallel.unwrap_or(defaults.bootstrap.parallel),
    )?;
    let opts = EstimatorOptions {
        min_observations: min_observations.unwrap_or(defaults.min_observations),
        bootstrap,
        ..defaults
    };
    opts.validate()?;
    Ok(opts)
}

#[cfg(feature = "python-bindings")]
pub fn extract_grid_config(
    down_pct: Option<f64>, up_pct: Option<f64>, step: Option<f64>, floor_price: Option<f64>,
    ceil_price: Option<f64>,
) -> GridConfig {
    let defaults = GridConfig::default();
    GridConfig {
        down_pct: down_pct.unwrap_or(defaults.down_pct),
        up_pct: up_pct.unwrap_or(defaults.up_pct),
        step,
        floor_price,
        ceil_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // A missing budget means no deadline; a zero budget expires at once.
    //
    // Given
    // -----
    // - `Deadline::start(None)` and `Deadline::start(Some(0))`.
    //
    // Expect
    // ------
    // - `None`, and an expired deadline after a short sleep.
    fn deadline_tracks_budget() {
        assert!(Deadline::start(None).is_none());

        let deadline = Deadline::start(Some(Duration::ZERO)).unwrap();
        std::thread::sleep(Duration::from_millis(2));
        assert!(deadline.expired());
        assert_eq!(deadline.budget(), Duration::ZERO);
    }
}
