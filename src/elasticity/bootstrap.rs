//! elasticity::bootstrap — nonparametric bootstrap of the price elasticity.
//!
//! Purpose
//! -------
//! Resample feature rows with replacement, refit the demand regression on
//! each resample, and summarize the log-price coefficients as a percentile
//! confidence interval.
//!
//! Key behaviors
//! -------------
//! - One `u64` seed per iteration is drawn up front from the caller's RNG.
//!   Each iteration then owns a `StdRng` seeded from it, so serial and
//!   parallel (`rayon`) runs produce identical draws in identical order.
//! - A failed resample fit is counted and skipped, never retried.
//! - When no iteration succeeds the interval is
//!   [`BootstrapInterval::Undefined`], not an error at this layer.
//! - An optional [`Deadline`] is checked before every iteration; running
//!   out of time aborts the whole bootstrap with
//!   `ElasticityError::ComputationTimeout`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `successful + failed == attempted == options.iterations` on success.
//! - Each resample has the size of the original sample.
//! - Design reference levels are taken from the rows of each resample.
use crate::{
    elasticity::{
        data::{FeatureRow, PreparedSample},
        design::{PRICE_COLUMN, build_design},
        errors::{ElasticityError, ElasticityResult, FitFailure},
        ols::fit_ols,
    },
    inference::interval::{ConfidenceInterval, percentile_interval},
    utils::Deadline,
};
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// BootstrapOptions — resampling configuration.
///
/// Fields
/// ------
/// - `iterations`: `usize`
///   Number of resamples (`500` by default, at least 1).
/// - `confidence_level`: `f64`
///   Two-sided level in `(0, 1)` (`0.95` by default).
/// - `seed`: `Option<u64>`
///   Master seed. `None` draws one from OS entropy; the seed actually used
///   is reported on the estimation result.
/// - `parallel`: `bool`
///   Run iterations on the rayon pool. Results do not depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapOptions {
    pub iterations: usize,
    pub confidence_level: f64,
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        BootstrapOptions { iterations: 500, confidence_level: 0.95, seed: None, parallel: false }
    }
}

impl BootstrapOptions {
    /// Construct validated options.
    ///
    /// Errors
    /// ------
    /// - `ElasticityError::InvalidOption` if `iterations == 0` or
    ///   `confidence_level ∉ (0, 1)`.
    pub fn new(
        iterations: usize, confidence_level: f64, seed: Option<u64>, parallel: bool,
    ) -> ElasticityResult<Self> {
        let opts = BootstrapOptions { iterations, confidence_level, seed, parallel };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> ElasticityResult<()> {
        crate::elasticity::validation::validate_iterations(self.iterations)?;
        crate::elasticity::validation::validate_confidence_level(self.confidence_level)
    }
}

/// Percentile interval, or the explicit absence of one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BootstrapInterval {
    Defined(ConfidenceInterval),
    /// Every iteration failed.
    Undefined,
}

impl BootstrapInterval {
    pub fn is_defined(&self) -> bool {
        matches!(self, BootstrapInterval::Defined(_))
    }

    pub fn as_option(&self) -> Option<&ConfidenceInterval> {
        match self {
            BootstrapInterval::Defined(ci) => Some(ci),
            BootstrapInterval::Undefined => None,
        }
    }
}

/// BootstrapSummary — outcome of a completed bootstrap run.
///
/// Fields
/// ------
/// - `attempted`: iterations run.
/// - `failed`: iterations whose fit failed.
/// - `draws`: successful elasticity estimates, in iteration order.
/// - `interval`: percentile interval over `draws`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSummary {
    pub attempted: usize,
    pub failed: usize,
    pub draws: Vec<f64>,
    pub interval: BootstrapInterval,
}

impl BootstrapSummary {
    pub fn successful(&self) -> usize {
        self.draws.len()
    }
}

enum Iteration {
    Draw(f64),
    Failed(FitFailure),
    Expired,
}

/// Run the bootstrap over `sample`.
///
/// Parameters
/// ----------
/// - `sample`: the prepared, non-empty sample the point fit used.
/// - `options`: iteration count, level, and parallelism. `options.seed` is
///   ignored here; the caller seeds `rng`.
/// - `rng`: source of the per-iteration seeds.
/// - `deadline`: optional wall-clock budget.
///
/// Errors
/// ------
/// - `ElasticityError::ComputationTimeout` when `deadline` expires.
/// - `ElasticityError::Inference` if the percentile computation fails.
pub fn run_bootstrap<R: RngCore + ?Sized>(
    sample: &PreparedSample, options: &BootstrapOptions, rng: &mut R, deadline: Option<&Deadline>,
) -> ElasticityResult<BootstrapSummary> {
    let rows = sample.rows();
    let control_names = sample.control_names();
    let seeds: Vec<u64> = (0..options.iterations).map(|_| rng.next_u64()).collect();

    let run = |&seed: &u64| -> Iteration {
        if deadline.is_some_and(Deadline::expired) {
            return Iteration::Expired;
        }
        match resample_elasticity(rows, control_names, seed) {
            Ok(value) => Iteration::Draw(value),
            Err(failure) => Iteration::Failed(failure),
        }
    };
    let outcomes: Vec<Iteration> = if options.parallel {
        seeds.par_iter().map(run).collect()
    } else {
        seeds.iter().map(run).collect()
    };

    let mut draws = Vec::with_capacity(outcomes.len());
    let mut failed = 0usize;
    let mut expired = false;
    for outcome in outcomes {
        match outcome {
            Iteration::Draw(value) => draws.push(value),
            Iteration::Failed(failure) => {
                if failed == 0 {
                    log::debug!("bootstrap: first failed resample: {failure}");
                }
                failed += 1;
            }
            Iteration::Expired => expired = true,
        }
    }

    if let (true, Some(deadline)) = (expired, deadline) {
        return Err(ElasticityError::ComputationTimeout {
            budget: deadline.budget(),
            elapsed: deadline.elapsed(),
            completed: draws.len() + failed,
        });
    }

    let attempted = options.iterations;
    log::debug!("bootstrap: {} of {attempted} iterations succeeded", draws.len());
    let interval = if draws.is_empty() {
        log::warn!("bootstrap: all {attempted} iterations failed; interval undefined");
        BootstrapInterval::Undefined
    } else {
        BootstrapInterval::Defined(percentile_interval(&draws, options.confidence_level)?)
    };

    Ok(BootstrapSummary { attempted, failed, draws, interval })
}

/// Refit the regression on one resample drawn with `seed`.
fn resample_elasticity(
    rows: &[FeatureRow], control_names: &[String], seed: u64,
) -> Result<f64, FitFailure> {
    let n = rows.len();
    if n == 0 {
        return Err(FitFailure::Underdetermined { rows: 0, columns: 2 });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let resample: Vec<&FeatureRow> = (0..n).map(|_| &rows[rng.gen_range(0..n)]).collect();

    let first = resample[0].log_price;
    if resample.iter().all(|r| r.log_price == first) {
        return Err(FitFailure::ConstantPrice);
    }

    let design = build_design(&resample, control_names);
    let fit = fit_ols(&design.matrix, &design.response)?;
    Ok(fit.coefficients[PRICE_COLUMN])
}
