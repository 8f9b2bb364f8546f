//! elasticity::data — observations and derived regression features.
//!
//! Purpose
//! -------
//! Define the weekly observation record consumed by the estimator and the
//! preprocessing that turns a raw series into regression-ready feature rows.
//!
//! Key behaviors
//! -------------
//! - [`Observation`] holds one week of `(price, quantity)` for a single
//!   product plus optional named controls. Missing values are `None`.
//! - [`prepare_sample`] filters unusable rows and derives
//!   `(log_quantity, log_price, promo_flag, month)` for the rest, in this
//!   order:
//!   1. drop rows with missing/non-finite price or quantity, `quantity ≤ 0`
//!      or `price ≤ 0`;
//!   2. drop rows missing any requested control;
//!   3. take logs;
//!   4. flag promotions as `price < promo_threshold · median(price)` over
//!      the kept rows (median of price, not of log-price);
//!   5. read the calendar month of `week`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every [`FeatureRow`] in a [`PreparedSample`] has finite logs and one
//!   control value per requested control, in request order.
//! - A control is either numeric in every kept row or categorical in every
//!   kept row.
//! - Row order follows the input order; nothing here depends on it.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each filtering rule, the even-length median used for
//!   the promo threshold, month extraction, and mixed control types.
use crate::elasticity::errors::{ElasticityError, ElasticityResult};
use chrono::{Datelike, NaiveDate};
use statrs::statistics::{Data, Median};
use std::collections::BTreeMap;

/// Value of a named control variable for one observation.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    /// Numeric control entering the regression as a single column.
    Numeric(f64),
    /// Categorical control entering the regression as one-hot dummies.
    Category(String),
}

impl ControlValue {
    fn is_usable(&self) -> bool {
        match self {
            ControlValue::Numeric(v) => v.is_finite(),
            ControlValue::Category(_) => true,
        }
    }
}

/// One weekly observation for a single product.
///
/// Fields
/// ------
/// - `week`: `NaiveDate`
///   Start date of the aggregation week; only its calendar month is used.
/// - `price`: `Option<f64>`
///   Average selling price for the week; `None` when missing.
/// - `quantity`: `Option<f64>`
///   Units sold in the week; `None` when missing.
/// - `controls`: `BTreeMap<String, ControlValue>`
///   Additional named covariates. Only the ones requested in the estimator
///   options are used.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub week: NaiveDate,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
    pub controls: BTreeMap<String, ControlValue>,
}

impl Observation {
    /// Observation without controls.
    pub fn new(week: NaiveDate, price: Option<f64>, quantity: Option<f64>) -> Observation {
        Observation { week, price, quantity, controls: BTreeMap::new() }
    }

    /// Attach a named control value.
    pub fn with_control(mut self, name: impl Into<String>, value: ControlValue) -> Observation {
        self.controls.insert(name.into(), value);
        self
    }

    fn valid_price_quantity(&self) -> Option<(f64, f64)> {
        match (self.price, self.quantity) {
            (Some(p), Some(q)) if p.is_finite() && q.is_finite() && p > 0.0 && q > 0.0 => {
                Some((p, q))
            }
            _ => None,
        }
    }
}

/// Regression-ready features derived from one usable observation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub week: NaiveDate,
    pub price: f64,
    pub log_quantity: f64,
    pub log_price: f64,
    pub promo_flag: bool,
    /// Calendar month, 1–12.
    pub month: u32,
    /// One value per requested control, in request order.
    pub controls: Vec<ControlValue>,
}

/// PreparedSample — the filtered, feature-engineered series.
///
/// Fields
/// ------
/// - `rows`: usable observations as [`FeatureRow`]s.
/// - `control_names`: requested controls, matching `FeatureRow::controls`.
/// - `discarded`: number of input observations dropped by filtering.
/// - `median_price`: median of price over `rows`, the promo reference.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSample {
    rows: Vec<FeatureRow>,
    control_names: Vec<String>,
    discarded: usize,
    median_price: f64,
}

impl PreparedSample {
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn control_names(&self) -> &[String] {
        &self.control_names
    }

    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn median_price(&self) -> f64 {
        self.median_price
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether log-price takes at least two distinct values.
    pub fn has_price_variation(&self) -> bool {
        match self.rows.first() {
            Some(first) => self.rows.iter().any(|r| r.log_price != first.log_price),
            None => false,
        }
    }
}

/// Filter a raw series and derive regression features.
///
/// Parameters
/// ----------
/// - `observations`: `&[Observation]`
///   Weekly series for one product, in time order.
/// - `control_names`: `&[String]`
///   Controls to carry into the feature rows. Rows missing any of them (or
///   holding a non-finite numeric value) are discarded.
/// - `promo_threshold`: `f64`
///   Fraction of the median price below which a week counts as a promotion
///   (`0.95` by default in the estimator options).
///
/// Returns
/// -------
/// `ElasticityResult<PreparedSample>`
///   The usable rows with their features and the discarded-row count. An
///   empty sample is returned as-is; the estimator decides whether it is
///   large enough.
///
/// Errors
/// ------
/// - `ElasticityError::MixedControlTypes`
///   A requested control is numeric in some kept rows and categorical in
///   others.
pub fn prepare_sample(
    observations: &[Observation], control_names: &[String], promo_threshold: f64,
) -> ElasticityResult<PreparedSample> {
    let mut kept: Vec<(&Observation, f64, f64, Vec<ControlValue>)> =
        Vec::with_capacity(observations.len());

    for obs in observations {
        let Some((price, quantity)) = obs.valid_price_quantity() else {
            continue;
        };
        let controls: Option<Vec<ControlValue>> = control_names
            .iter()
            .map(|name| obs.controls.get(name).filter(|v| v.is_usable()).cloned())
            .collect();
        if let Some(controls) = controls {
            kept.push((obs, price, quantity, controls));
        }
    }

    for (j, name) in control_names.iter().enumerate() {
        let numeric = kept.iter().filter(|k| matches!(k.3[j], ControlValue::Numeric(_))).count();
        if numeric != 0 && numeric != kept.len() {
            return Err(ElasticityError::MixedControlTypes { name: name.clone() });
        }
    }

    let discarded = observations.len() - kept.len();
    let median_price = if kept.is_empty() {
        f64::NAN
    } else {
        Data::new(kept.iter().map(|k| k.1).collect::<Vec<f64>>()).median()
    };
    let promo_cutoff = promo_threshold * median_price;

    let rows = kept
        .into_iter()
        .map(|(obs, price, quantity, controls)| FeatureRow {
            week: obs.week,
            price,
            log_quantity: quantity.ln(),
            log_price: price.ln(),
            promo_flag: price < promo_cutoff,
            month: obs.week.month(),
            controls,
        })
        .collect();

    Ok(PreparedSample { rows, control_names: control_names.to_vec(), discarded, median_price })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Each filtering rule (missing, non-positive, non-finite, missing
    //   control) and the discarded count.
    // - Log features, the even-length median, and the strict promo cutoff.
    // - Month extraction and mixed control types.
    // -------------------------------------------------------------------------

    fn week(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Rows with unusable price or quantity are dropped and counted.
    //
    // Given
    // -----
    // - Six observations: one valid pair of rows plus missing price,
    //   zero quantity, negative price, and NaN quantity.
    //
    // Expect
    // ------
    // - Two rows kept, four discarded.
    fn prepare_sample_filters_invalid_rows() {
        // Arrange
        let obs = vec![
            Observation::new(week(2024, 1, 1), Some(10.0), Some(5.0)),
            Observation::new(week(2024, 1, 8), None, Some(5.0)),
            Observation::new(week(2024, 1, 15), Some(10.0), Some(0.0)),
            Observation::new(week(2024, 1, 22), Some(-1.0), Some(5.0)),
            Observation::new(week(2024, 1, 29), Some(9.0), Some(f64::NAN)),
            Observation::new(week(2024, 2, 5), Some(8.0), Some(7.0)),
        ];

        // Act
        let sample = prepare_sample(&obs, &[], 0.95).unwrap();

        // Assert
        assert_eq!(sample.len(), 2);
        assert_eq!(sample.discarded(), 4);
        assert_relative_eq!(sample.rows()[0].log_price, 10.0_f64.ln());
        assert_relative_eq!(sample.rows()[1].log_quantity, 7.0_f64.ln());
        assert_eq!(sample.rows()[1].month, 2);
    }

    #[test]
    // Purpose
    // -------
    // The promo flag uses the median of price with the even-length
    // convention and a strict comparison.
    //
    // Given
    // -----
    // - Prices [10, 10, 9, 8] → median 9.5, cutoff 9.025.
    //
    // Expect
    // ------
    // - Only the prices 9 and 8 are flagged; price exactly at the cutoff
    //   would not be.
    fn prepare_sample_flags_promotions_against_median_price() {
        // Arrange
        let obs: Vec<Observation> = [10.0, 10.0, 9.0, 8.0]
            .iter()
            .enumerate()
            .map(|(i, &p)| Observation::new(week(2024, 3, 1 + i as u32), Some(p), Some(3.0)))
            .collect();

        // Act
        let sample = prepare_sample(&obs, &[], 0.95).unwrap();

        // Assert
        assert_relative_eq!(sample.median_price(), 9.5, epsilon = 1e-12);
        let flags: Vec<bool> = sample.rows().iter().map(|r| r.promo_flag).collect();
        assert_eq!(flags, vec![false, false, true, true]);
    }

    #[test]
    // Purpose
    // -------
    // Requested controls must be present and usable.
    //
    // Given
    // -----
    // - Three observations; one lacks the control, one has a NaN value.
    //
    // Expect
    // ------
    // - One row kept with its control value; two discarded.
    fn prepare_sample_drops_rows_missing_controls() {
        // Arrange
        let name = "holiday_share".to_string();
        let obs = vec![
            Observation::new(week(2024, 5, 6), Some(4.0), Some(2.0))
                .with_control(name.clone(), ControlValue::Numeric(0.2)),
            Observation::new(week(2024, 5, 13), Some(4.5), Some(2.0)),
            Observation::new(week(2024, 5, 20), Some(4.5), Some(2.0))
                .with_control(name.clone(), ControlValue::Numeric(f64::NAN)),
        ];

        // Act
        let sample = prepare_sample(&obs, &[name], 0.95).unwrap();

        // Assert
        assert_eq!(sample.len(), 1);
        assert_eq!(sample.discarded(), 2);
        assert_eq!(sample.rows()[0].controls, vec![ControlValue::Numeric(0.2)]);
    }

    #[test]
    // Purpose
    // -------
    // A control may not mix numeric and categorical values.
    //
    // Given
    // -----
    // - Control "channel" numeric in one row and categorical in another.
    //
    // Expect
    // ------
    // - `ElasticityError::MixedControlTypes { name: "channel" }`.
    fn prepare_sample_rejects_mixed_control_types() {
        // Arrange
        let name = "channel".to_string();
        let obs = vec![
            Observation::new(week(2024, 6, 3), Some(4.0), Some(2.0))
                .with_control(name.clone(), ControlValue::Numeric(1.0)),
            Observation::new(week(2024, 6, 10), Some(4.5), Some(2.0))
                .with_control(name.clone(), ControlValue::Category("web".into())),
        ];

        // Act
        let result = prepare_sample(&obs, &[name], 0.95);

        // Assert
        assert_eq!(result, Err(ElasticityError::MixedControlTypes { name: "channel".into() }));
    }

    #[test]
    // Purpose
    // -------
    // Price variation detection.
    //
    // Given
    // -----
    // - A series with a single price level.
    //
    // Expect
    // ------
    // - `has_price_variation()` is false.
    fn prepare_sample_detects_constant_price() {
        let obs: Vec<Observation> = (0..5)
            .map(|i| Observation::new(week(2024, 7, 1 + i), Some(3.0), Some(1.0 + i as f64)))
            .collect();
        let sample = prepare_sample(&obs, &[], 0.95).unwrap();
        assert!(!sample.has_price_variation());
    }
}
