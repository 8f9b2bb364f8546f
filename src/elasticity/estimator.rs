//! elasticity::estimator — log-log demand regression with bootstrap CI.
//!
//! Purpose
//! -------
//! Estimate the price elasticity of demand for one product from a weekly
//! `(price, quantity)` series. The point estimate is the `log_price`
//! coefficient of an OLS fit with robust standard errors; its uncertainty
//! is a percentile interval over bootstrap refits.
//!
//! Key behaviors
//! -------------
//! - [`estimate_elasticity`] runs the full pipeline: validate options,
//!   prepare the sample, fit the point regression, compute the robust
//!   coefficient table, then bootstrap.
//! - Randomness is explicit: either `options.bootstrap.seed` (or a seed
//!   drawn once from OS entropy and reported back), or a caller-supplied
//!   RNG via [`estimate_elasticity_with_rng`].
//! - A failed point fit is fatal. A robust covariance that cannot be formed
//!   (an observation with unit leverage) leaves the standard errors empty
//!   and logs a warning; the point estimate is still reported.
//!
//! Invariants & assumptions
//! ------------------------
//! - `sample_size ≥ options.min_observations` and price varies on success.
//! - `scale_parameter = exp(intercept)` and is strictly positive.
//! - The result is an immutable value; nothing is cached between calls.
use crate::{
    elasticity::{
        bootstrap::{BootstrapInterval, BootstrapOptions, BootstrapSummary, run_bootstrap},
        data::{FeatureRow, Observation, prepare_sample},
        design::{INTERCEPT_COLUMN, PRICE_COLUMN, build_design},
        errors::{ElasticityError, ElasticityResult},
        ols::fit_ols,
        validation::{validate_min_observations, validate_promo_threshold, validate_time_budget},
    },
    inference::{
        errors::InferenceError,
        interval::ConfidenceInterval,
        robust::{CovarianceType, coefficient_covariance, standard_errors},
    },
    utils::Deadline,
};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
use std::time::Duration;

/// EstimatorOptions — configuration for [`estimate_elasticity`].
///
/// Fields
/// ------
/// - `min_observations`: `usize`
///   Usable rows required after filtering (default `10`, at least `3`).
/// - `controls`: `Vec<String>`
///   Extra covariates read from `Observation::controls`.
/// - `promo_threshold`: `f64`
///   Promo cutoff as a fraction of the median price (default `0.95`).
/// - `covariance`: `CovarianceType`
///   Standard errors for the point fit (default `HC3`).
/// - `bootstrap`: `BootstrapOptions`
///   Resampling settings.
/// - `time_budget`: `Option<Duration>`
///   Wall-clock limit for the whole call; `None` is unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorOptions {
    pub min_observations: usize,
    pub controls: Vec<String>,
    pub promo_threshold: f64,
    pub covariance: CovarianceType,
    pub bootstrap: BootstrapOptions,
    pub time_budget: Option<Duration>,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        EstimatorOptions {
            min_observations: 10,
            controls: Vec::new(),
            promo_threshold: 0.95,
            covariance: CovarianceType::default(),
            bootstrap: BootstrapOptions::default(),
            time_budget: None,
        }
    }
}

impl EstimatorOptions {
    /// Check every option range.
    ///
    /// Errors
    /// ------
    /// - `ElasticityError::InvalidOption` naming the first offending option.
    pub fn validate(&self) -> ElasticityResult<()> {
        validate_min_observations(self.min_observations)?;
        validate_promo_threshold(self.promo_threshold)?;
        validate_time_budget(self.time_budget)?;
        self.bootstrap.validate()
    }
}

/// One row of the coefficient table.
///
/// `std_error`, `t_stat` and `p_value` are `None` when the covariance
/// could not be formed. `p_value` is two-sided: under the standard normal
/// for the robust (HC0–HC3) covariances, under Student-t with `n − p`
/// degrees of freedom for the classical one.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientEstimate {
    pub name: String,
    pub estimate: f64,
    pub std_error: Option<f64>,
    pub t_stat: Option<f64>,
    pub p_value: Option<f64>,
}

/// EstimationResult — outcome of [`estimate_elasticity`].
///
/// Fields
/// ------
/// - `point_elasticity`: `log_price` coefficient of the point fit.
/// - `intercept`: fitted intercept; `scale_parameter = exp(intercept)`.
/// - `sample_size`: usable rows entering the fit.
/// - `discarded`: input rows dropped by filtering.
/// - `coefficients`: full coefficient table in design order.
/// - `dropped_columns`: regressors removed for having no variation.
/// - `r_squared`: centered R² of the point fit, if defined.
/// - `covariance_type`: estimator behind the standard errors.
/// - `seed`: master seed of the bootstrap, when one was used.
/// - `bootstrap`: attempted/failed counts, draws, and the interval.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationResult {
    point_elasticity: f64,
    intercept: f64,
    scale_parameter: f64,
    sample_size: usize,
    discarded: usize,
    coefficients: Vec<CoefficientEstimate>,
    dropped_columns: Vec<String>,
    r_squared: Option<f64>,
    covariance_type: CovarianceType,
    seed: Option<u64>,
    bootstrap: BootstrapSummary,
}

impl EstimationResult {
    pub fn point_elasticity(&self) -> f64 {
        self.point_elasticity
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Demand scale `exp(intercept)` of the constant-elasticity curve.
    pub fn scale_parameter(&self) -> f64 {
        self.scale_parameter
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn coefficients(&self) -> &[CoefficientEstimate] {
        &self.coefficients
    }

    /// Coefficient row by design column name, e.g. `"promo_flag"`.
    pub fn coefficient(&self, name: &str) -> Option<&CoefficientEstimate> {
        self.coefficients.iter().find(|c| c.name == name)
    }

    /// Robust standard error of the elasticity, when available.
    pub fn elasticity_std_error(&self) -> Option<f64> {
        self.coefficients.get(PRICE_COLUMN).and_then(|c| c.std_error)
    }

    pub fn dropped_columns(&self) -> &[String] {
        &self.dropped_columns
    }

    pub fn r_squared(&self) -> Option<f64> {
        self.r_squared
    }

    pub fn covariance_type(&self) -> CovarianceType {
        self.covariance_type
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn bootstrap(&self) -> &BootstrapSummary {
        &self.bootstrap
    }

    /// Bootstrap interval, defined or not.
    pub fn confidence_interval(&self) -> &BootstrapInterval {
        &self.bootstrap.interval
    }

    /// Bootstrap interval as a value.
    ///
    /// Errors
    /// ------
    /// - `ElasticityError::UndefinedInterval` when no iteration succeeded.
    pub fn interval(&self) -> ElasticityResult<ConfidenceInterval> {
        match self.bootstrap.interval {
            BootstrapInterval::Defined(ci) => Ok(ci),
            BootstrapInterval::Undefined => {
                Err(ElasticityError::UndefinedInterval { attempted: self.bootstrap.attempted })
            }
        }
    }

    /// Successful bootstrap elasticities.
    pub fn bootstrap_draws(&self) -> &[f64] {
        &self.bootstrap.draws
    }
}

/// Estimate the price elasticity of `observations`.
///
/// Parameters
/// ----------
/// - `observations`: `&[Observation]`
///   Weekly series for one product.
/// - `options`: `&EstimatorOptions`
///   Validated before any work is done.
///
/// Returns
/// -------
/// `ElasticityResult<EstimationResult>`
///
/// Errors
/// ------
/// - `ElasticityError::InvalidOption` for out-of-range options.
/// - `ElasticityError::InsufficientData` when fewer than
///   `min_observations` rows survive filtering.
/// - `ElasticityError::NoPriceVariation` when every usable price is equal.
/// - `ElasticityError::MixedControlTypes` from preprocessing.
/// - `ElasticityError::FitFailure` when the point regression fails.
/// - `ElasticityError::ComputationTimeout` when `time_budget` runs out.
///
/// Examples
/// --------
/// ```rust
/// use chrono::NaiveDate;
/// use price_elasticity::elasticity::{EstimatorOptions, Observation, estimate_elasticity};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let obs: Vec<Observation> = (0..20)
///     .map(|i| {
///         let price = 9.0 + (i % 5) as f64 * 0.5;
///         let week = start + chrono::Duration::weeks(i);
///         Observation::new(week, Some(price), Some(200.0 * price.powf(-1.2)))
///     })
///     .collect();
///
/// let mut opts = EstimatorOptions::default();
/// opts.bootstrap.seed = Some(42);
/// opts.bootstrap.iterations = 50;
/// let result = estimate_elasticity(&obs, &opts).unwrap();
/// assert!((result.point_elasticity() + 1.2).abs() < 1e-8);
/// ```
pub fn estimate_elasticity(
    observations: &[Observation], options: &EstimatorOptions,
) -> ElasticityResult<EstimationResult> {
    let seed = options.bootstrap.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);
    let mut result = estimate_elasticity_with_rng(observations, options, &mut rng)?;
    result.seed = Some(seed);
    Ok(result)
}

/// Same as [`estimate_elasticity`], drawing bootstrap seeds from `rng`.
///
/// `options.bootstrap.seed` is ignored and the result's `seed` is `None`.
pub fn estimate_elasticity_with_rng<R: RngCore + ?Sized>(
    observations: &[Observation], options: &EstimatorOptions, rng: &mut R,
) -> ElasticityResult<EstimationResult> {
    options.validate()?;
    let deadline = Deadline::start(options.time_budget);

    let sample = prepare_sample(observations, &options.controls, options.promo_threshold)?;
    if sample.len() < options.min_observations {
        return Err(ElasticityError::InsufficientData {
            available: sample.len(),
            required: options.min_observations,
        });
    }
    if !sample.has_price_variation() {
        return Err(ElasticityError::NoPriceVariation);
    }

    let rows: Vec<&FeatureRow> = sample.rows().iter().collect();
    let design = build_design(&rows, sample.control_names());
    let fit = fit_ols(&design.matrix, &design.response)?;

    let std_errors = match coefficient_covariance(
        options.covariance,
        &design.matrix,
        &fit.residuals,
        &fit.bread,
    ) {
        Ok(cov) => Some(standard_errors(&cov)),
        Err(err @ (InferenceError::LeverageOne { .. }
        | InferenceError::NoResidualDegreesOfFreedom { .. })) => {
            log::warn!("{} standard errors unavailable: {err}", options.covariance.label());
            None
        }
        Err(err) => return Err(err.into()),
    };

    let reference = ReferenceDistribution::for_fit(options.covariance, fit.residual_dof());
    let coefficients: Vec<CoefficientEstimate> = design
        .columns
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let estimate = fit.coefficients[j];
            let std_error = std_errors.as_ref().map(|se| se[j]);
            let t_stat = std_error.filter(|se| *se > 0.0).map(|se| estimate / se);
            let p_value = t_stat.and_then(|t| reference.as_ref().map(|dist| dist.two_sided(t)));
            CoefficientEstimate { name: name.clone(), estimate, std_error, t_stat, p_value }
        })
        .collect();

    let bootstrap = run_bootstrap(&sample, &options.bootstrap, rng, deadline.as_ref())?;

    let point_elasticity = fit.coefficients[PRICE_COLUMN];
    let intercept = fit.coefficients[INTERCEPT_COLUMN];
    log::debug!(
        "elasticity {point_elasticity:.4} from {} rows ({} discarded), {}/{} bootstrap fits",
        sample.len(),
        sample.discarded(),
        bootstrap.successful(),
        bootstrap.attempted
    );

    Ok(EstimationResult {
        point_elasticity,
        intercept,
        scale_parameter: intercept.exp(),
        sample_size: sample.len(),
        discarded: sample.discarded(),
        coefficients,
        dropped_columns: design.dropped,
        r_squared: fit.r_squared,
        covariance_type: options.covariance,
        seed: None,
        bootstrap,
    })
}

// ---- Helper methods ----

/// Null distribution of the coefficient t-statistics.
enum ReferenceDistribution {
    Normal(Normal),
    StudentsT(StudentsT),
}

impl ReferenceDistribution {
    /// Standard normal for sandwich covariances, Student-t with the residual
    /// degrees of freedom for the classical one. `None` when no valid
    /// distribution exists (zero residual degrees of freedom).
    fn for_fit(covariance: CovarianceType, residual_dof: usize) -> Option<Self> {
        if covariance.is_robust() {
            Normal::new(0.0, 1.0).ok().map(ReferenceDistribution::Normal)
        } else {
            StudentsT::new(0.0, 1.0, residual_dof as f64).ok().map(ReferenceDistribution::StudentsT)
        }
    }

    fn two_sided(&self, t: f64) -> f64 {
        let upper = match self {
            ReferenceDistribution::Normal(dist) => dist.cdf(t.abs()),
            ReferenceDistribution::StudentsT(dist) => dist.cdf(t.abs()),
        };
        2.0 * (1.0 - upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elasticity::errors::FitFailure;
    use approx::assert_relative_eq;
    use chrono::{Datelike, NaiveDate};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact recovery of elasticity and scale on noiseless data.
    // - Data-level errors (insufficient rows, constant price).
    // - Seeded reproducibility and the reported seed.
    // - The Undefined interval surfaced as `UndefinedInterval`.
    // - Option validation at the entry point.
    // - Redundant nuisance dummies dropped instead of failing the fit.
    // - Normal vs Student-t p-values by covariance type.
    // - The time budget enforced through the full call.
    //
    // They intentionally DO NOT cover:
    // - Statistical coverage on noisy data, which lives in the integration
    //   tests.
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-8;

    /// 20 weeks from January 2024 (five months, four or more rows each),
    /// prices cycling over five levels, demand `scale · p^elasticity`
    /// times an optional deterministic wobble.
    fn series(scale: f64, elasticity: f64, wobble: f64) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..20)
            .map(|i| {
                let price = 9.0 + (i % 5) as f64 * 0.5;
                let noise = 1.0 + wobble * (((i * 7) % 11) as f64 - 5.0) / 5.0;
                let week = start + chrono::Duration::weeks(i);
                Observation::new(week, Some(price), Some(scale * price.powf(elasticity) * noise))
            })
            .collect()
    }

    fn seeded(seed: u64, iterations: usize) -> EstimatorOptions {
        let mut opts = EstimatorOptions::default();
        opts.bootstrap.seed = Some(seed);
        opts.bootstrap.iterations = iterations;
        opts
    }

    #[test]
    // Purpose
    // -------
    // Noiseless constant-elasticity demand is recovered exactly, and every
    // bootstrap refit agrees with it.
    //
    // Given
    // -----
    // - q = 150 · p^(−1.8) with no noise.
    //
    // Expect
    // ------
    // - Elasticity −1.8, scale 150, a collapsed interval at −1.8.
    fn estimate_elasticity_recovers_noiseless_curve() {
        // Arrange
        let obs = series(150.0, -1.8, 0.0);

        // Act
        let result = estimate_elasticity(&obs, &seeded(11, 60)).unwrap();

        // Assert
        assert_relative_eq!(result.point_elasticity(), -1.8, epsilon = TOL);
        assert_relative_eq!(result.scale_parameter(), 150.0, epsilon = 1e-6);
        assert_eq!(result.sample_size(), 20);
        assert_eq!(result.discarded(), 0);
        assert_eq!(result.coefficients()[PRICE_COLUMN].name, "log_price");
        let ci = result.interval().unwrap();
        assert_relative_eq!(ci.lower(), -1.8, epsilon = 1e-6);
        assert_relative_eq!(ci.upper(), -1.8, epsilon = 1e-6);
        assert_eq!(result.seed(), Some(11));
    }

    #[test]
    // Purpose
    // -------
    // Noisy data give finite robust standard errors and a proper interval.
    //
    // Given
    // -----
    // - q = 80 · p^(−1.2) with a ±10% deterministic wobble.
    //
    // Expect
    // ------
    // - Finite positive SE, p-value in [0, 1], lower ≤ upper, and the
    //   bootstrap counts add up.
    fn estimate_elasticity_reports_robust_table_and_interval() {
        // Arrange
        let obs = series(80.0, -1.2, 0.1);

        // Act
        let result = estimate_elasticity(&obs, &seeded(5, 100)).unwrap();

        // Assert
        let se = result.elasticity_std_error().unwrap();
        assert!(se.is_finite() && se > 0.0);
        let p = result.coefficient("log_price").unwrap().p_value.unwrap();
        assert!((0.0..=1.0).contains(&p));
        let ci = result.interval().unwrap();
        assert!(ci.lower() <= ci.upper());
        let boot = result.bootstrap();
        assert_eq!(boot.successful() + boot.failed, boot.attempted);
        assert_eq!(result.covariance_type(), CovarianceType::HC3);
    }

    #[test]
    // Purpose
    // -------
    // A fixed seed gives bit-identical results, serial or parallel.
    //
    // Given
    // -----
    // - The same noisy series estimated three times with seed 99, the last
    //   run in parallel.
    //
    // Expect
    // ------
    // - All three results are equal.
    fn estimate_elasticity_is_reproducible_under_seed() {
        let obs = series(80.0, -1.2, 0.1);
        let opts = seeded(99, 80);
        let mut parallel = opts.clone();
        parallel.bootstrap.parallel = true;

        let a = estimate_elasticity(&obs, &opts).unwrap();
        let b = estimate_elasticity(&obs, &opts).unwrap();
        let c = estimate_elasticity(&obs, &parallel).unwrap();

        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    // Purpose
    // -------
    // Too few usable rows and constant prices are data errors.
    //
    // Given
    // -----
    // - Five valid rows with the default minimum of 10.
    // - Twelve rows at one price.
    //
    // Expect
    // ------
    // - `InsufficientData { available: 5, required: 10 }` and
    //   `NoPriceVariation`.
    fn estimate_elasticity_rejects_unusable_samples() {
        let short: Vec<Observation> = series(50.0, -1.0, 0.0).into_iter().take(5).collect();
        assert_eq!(
            estimate_elasticity(&short, &seeded(1, 10)),
            Err(ElasticityError::InsufficientData { available: 5, required: 10 })
        );

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let flat: Vec<Observation> = (0..12)
            .map(|i| {
                Observation::new(start + chrono::Duration::weeks(i), Some(4.0), Some(10.0 + i as f64))
            })
            .collect();
        assert_eq!(estimate_elasticity(&flat, &seeded(1, 10)), Err(ElasticityError::NoPriceVariation));
    }

    #[test]
    // Purpose
    // -------
    // An undefined bootstrap interval is never returned as a number.
    //
    // Given
    // -----
    // - A valid result whose bootstrap summary is replaced by one with no
    //   successful draws.
    //
    // Expect
    // ------
    // - `interval()` fails with `UndefinedInterval { attempted }`.
    fn interval_reports_undefined_explicitly() {
        let mut result = estimate_elasticity(&series(80.0, -1.2, 0.1), &seeded(2, 10)).unwrap();
        result.bootstrap =
            BootstrapSummary { attempted: 10, failed: 10, draws: vec![], interval: BootstrapInterval::Undefined };

        assert_eq!(result.interval(), Err(ElasticityError::UndefinedInterval { attempted: 10 }));
        assert!(!result.confidence_interval().is_defined());
    }

    #[test]
    // Purpose
    // -------
    // Options are validated before any fitting.
    //
    // Given
    // -----
    // - A confidence level of 1.5.
    //
    // Expect
    // ------
    // - `InvalidOption` naming "confidence_level".
    fn estimate_elasticity_validates_options() {
        let mut opts = seeded(1, 10);
        opts.bootstrap.confidence_level = 1.5;
        match estimate_elasticity(&series(80.0, -1.2, 0.1), &opts) {
            Err(ElasticityError::InvalidOption { name, .. }) => assert_eq!(name, "confidence_level"),
            other => panic!("expected InvalidOption, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // A point fit whose design is singular is fatal.
    //
    // Given
    // -----
    // - A numeric control equal to log-price.
    //
    // Expect
    // ------
    // - `FitFailure(RankDeficient { .. })`.
    fn estimate_elasticity_surfaces_point_fit_failure() {
        use crate::elasticity::data::ControlValue;
        let obs: Vec<Observation> = series(80.0, -1.2, 0.1)
            .into_iter()
            .map(|o| {
                let lp = o.price.unwrap().ln();
                o.with_control("shadow", ControlValue::Numeric(lp))
            })
            .collect();
        let mut opts = seeded(1, 10);
        opts.controls = vec!["shadow".to_string()];

        match estimate_elasticity(&obs, &opts) {
            Err(ElasticityError::FitFailure(FitFailure::RankDeficient { .. })) => {}
            other => panic!("expected RankDeficient, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // A promo flag confined to the weeks of one month does not block the
    // fit: the redundant month dummy is dropped and log-price is still
    // identified from within-month price variation.
    //
    // Given
    // -----
    // - 26 weeks from January to June 2024; January to May cycle over
    //   11.0, 11.5 and 12.0 with no promo, every June week is priced at 8.5
    //   or 8.6 (below 95% of the median, so promo == June).
    // - Noiseless demand q = 300 · p^(−1.5).
    //
    // Expect
    // ------
    // - Elasticity −1.5 exactly, `month[T.6]` among the dropped columns,
    //   and a defined bootstrap interval.
    fn estimate_elasticity_drops_dummy_collinear_with_promo() {
        // Arrange
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let obs: Vec<Observation> = (0..26)
            .map(|i| {
                let week = start + chrono::Duration::weeks(i);
                let price = if week.month() == 6 {
                    8.5 + 0.1 * (i % 2) as f64
                } else {
                    11.0 + 0.5 * (i % 3) as f64
                };
                Observation::new(week, Some(price), Some(300.0 * price.powf(-1.5)))
            })
            .collect();

        // Act
        let result = estimate_elasticity(&obs, &seeded(4, 50)).unwrap();

        // Assert
        assert_relative_eq!(result.point_elasticity(), -1.5, epsilon = TOL);
        assert!(result.coefficient("promo_flag").is_some());
        assert!(result.dropped_columns().iter().any(|c| c == "month[T.6]"));
        assert!(result.coefficient("month[T.6]").is_none());
        assert!(result.bootstrap().successful() > 0);
        assert!(result.interval().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // p-values use the standard normal under robust covariances and
    // Student-t with `n − p` degrees of freedom under the classical one.
    //
    // Given
    // -----
    // - The noisy series fitted with HC3 and with `Classical`.
    //
    // Expect
    // ------
    // - Each log-price p-value equals `2·(1 − F(|t|))` for its reference
    //   distribution.
    fn estimate_elasticity_p_values_follow_covariance_type() {
        // Arrange
        let obs = series(80.0, -1.2, 0.1);
        let robust_opts = seeded(6, 10);
        let mut classical_opts = seeded(6, 10);
        classical_opts.covariance = CovarianceType::Classical;

        // Act
        let robust = estimate_elasticity(&obs, &robust_opts).unwrap();
        let classical = estimate_elasticity(&obs, &classical_opts).unwrap();

        // Assert
        let row = robust.coefficient("log_price").unwrap();
        let z = Normal::new(0.0, 1.0).unwrap();
        let expected = 2.0 * (1.0 - z.cdf(row.t_stat.unwrap().abs()));
        assert_relative_eq!(row.p_value.unwrap(), expected, epsilon = 1e-12);

        let row = classical.coefficient("log_price").unwrap();
        let dof = (classical.sample_size() - classical.coefficients().len()) as f64;
        let t = StudentsT::new(0.0, 1.0, dof).unwrap();
        let expected = 2.0 * (1.0 - t.cdf(row.t_stat.unwrap().abs()));
        assert_relative_eq!(row.p_value.unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The time budget covers the whole call, bootstrap included.
    //
    // Given
    // -----
    // - A 1 ns budget, spent long before the first bootstrap iteration.
    //
    // Expect
    // ------
    // - `ComputationTimeout` with no completed iterations.
    fn estimate_elasticity_honors_time_budget() {
        let mut opts = seeded(7, 100);
        opts.time_budget = Some(Duration::from_nanos(1));

        match estimate_elasticity(&series(80.0, -1.2, 0.1), &opts) {
            Err(ElasticityError::ComputationTimeout { completed, budget, .. }) => {
                assert_eq!(completed, 0);
                assert_eq!(budget, Duration::from_nanos(1));
            }
            other => panic!("expected ComputationTimeout, got {other:?}"),
        }
    }
}
