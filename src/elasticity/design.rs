//! elasticity::design — design matrix for the log-log demand regression.
//!
//! Purpose
//! -------
//! Assemble the response vector and regressor matrix for
//!
//! ```text
//! log_q = β₀ + β₁·log_p + β₂·promo + Σ_m γ_m·1[month = m] + controls + ε
//! ```
//!
//! from a slice of feature rows. The same builder serves the point fit
//! (all rows) and every bootstrap resample (rows drawn with replacement).
//!
//! Key behaviors
//! -------------
//! - Column 0 is the intercept and column 1 is `log_price`; their positions
//!   never change, so callers read the elasticity at [`PRICE_COLUMN`].
//! - Months and categorical controls are one-hot encoded against a
//!   reference level: the smallest level observed in *these* rows. Levels
//!   absent from a resample therefore never produce all-zero columns.
//! - Non-price regressors that are constant across the rows (for example a
//!   promo flag that is never set) are dropped and their names recorded.
//! - A non-price regressor that is a linear combination of the intercept
//!   and the non-price regressors kept before it (for example a promo flag
//!   set in exactly the weeks of one month) is dropped the same way. The
//!   check never looks at `log_price`, so a regressor collinear with price
//!   stays and the fit reports the design as singular.
//!
//! Conventions
//! -----------
//! - Column names follow `name[T.level]` for dummies, e.g. `month[T.7]`.
//! - Rows index observations in the order given.
use crate::elasticity::{
    data::{ControlValue, FeatureRow},
    ols::RANK_RTOL,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use std::collections::BTreeSet;

/// Column index of the intercept.
pub const INTERCEPT_COLUMN: usize = 0;
/// Column index of the log-price regressor.
pub const PRICE_COLUMN: usize = 1;

/// Response, regressors, and column bookkeeping for one fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    pub response: Array1<f64>,
    pub matrix: Array2<f64>,
    pub columns: Vec<String>,
    pub dropped: Vec<String>,
}

/// Build the design for `rows`.
///
/// Parameters
/// ----------
/// - `rows`: `&[&FeatureRow]`
///   Observations entering the fit; may contain repeated rows.
/// - `control_names`: `&[String]`
///   Names of the controls carried in each row, in order.
///
/// Returns
/// -------
/// `Design`
///   `n×p` matrix whose first two columns are intercept and log-price,
///   followed by the promo flag, month dummies, and controls that vary in
///   `rows`.
pub fn build_design(rows: &[&FeatureRow], control_names: &[String]) -> Design {
    let n = rows.len();
    let mut columns: Vec<(String, Vec<f64>)> = vec![
        ("intercept".to_string(), vec![1.0; n]),
        ("log_price".to_string(), rows.iter().map(|r| r.log_price).collect()),
        ("promo_flag".to_string(), rows.iter().map(|r| f64::from(u8::from(r.promo_flag))).collect()),
    ];

    let months: BTreeSet<u32> = rows.iter().map(|r| r.month).collect();
    for &month in months.iter().skip(1) {
        columns.push((
            format!("month[T.{month}]"),
            rows.iter().map(|r| indicator(r.month == month)).collect(),
        ));
    }

    for (j, name) in control_names.iter().enumerate() {
        push_control_columns(&mut columns, rows, j, name);
    }

    let mut dropped = Vec::new();
    let mut kept: Vec<(String, Vec<f64>)> = Vec::with_capacity(columns.len());
    // Intercept plus the non-price columns kept so far, and their rank.
    let mut nuisance: Vec<usize> = vec![INTERCEPT_COLUMN];
    let mut nuisance_rank = usize::from(n > 0);
    for (idx, (name, values)) in columns.into_iter().enumerate() {
        if idx <= PRICE_COLUMN {
            kept.push((name, values));
            continue;
        }
        if is_constant(&values) {
            dropped.push(name);
            continue;
        }
        let candidate = nuisance.iter().map(|&k| kept[k].1.as_slice());
        let rank = numerical_rank(candidate.chain(std::iter::once(values.as_slice())), n);
        if rank > nuisance_rank {
            nuisance_rank = rank;
            nuisance.push(kept.len());
            kept.push((name, values));
        } else {
            log::debug!("design: dropping {name}, collinear with earlier regressors");
            dropped.push(name);
        }
    }

    let p = kept.len();
    let mut matrix = Array2::<f64>::zeros((n, p));
    for (col, (_, values)) in kept.iter().enumerate() {
        for (row, &v) in values.iter().enumerate() {
            matrix[[row, col]] = v;
        }
    }

    Design {
        response: rows.iter().map(|r| r.log_quantity).collect(),
        matrix,
        columns: kept.into_iter().map(|(name, _)| name).collect(),
        dropped,
    }
}

// ---- Helper methods ----

fn push_control_columns(
    columns: &mut Vec<(String, Vec<f64>)>, rows: &[&FeatureRow], j: usize, name: &str,
) {
    let numeric: Option<Vec<f64>> = rows
        .iter()
        .map(|r| match &r.controls[j] {
            ControlValue::Numeric(v) => Some(*v),
            ControlValue::Category(_) => None,
        })
        .collect();
    if let Some(values) = numeric {
        columns.push((name.to_string(), values));
        return;
    }

    let levels: BTreeSet<&str> = rows
        .iter()
        .filter_map(|r| match &r.controls[j] {
            ControlValue::Category(level) => Some(level.as_str()),
            ControlValue::Numeric(_) => None,
        })
        .collect();
    for level in levels.iter().skip(1) {
        columns.push((
            format!("{name}[T.{level}]"),
            rows.iter()
                .map(|r| indicator(matches!(&r.controls[j], ControlValue::Category(l) if l == level)))
                .collect(),
        ));
    }
}

#[inline]
fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

fn is_constant(values: &[f64]) -> bool {
    values.first().is_none_or(|first| values.iter().all(|v| v == first))
}

/// Numerical rank of the `n`-row matrix whose columns are `columns`.
fn numerical_rank<'a>(columns: impl Iterator<Item = &'a [f64]>, n: usize) -> usize {
    let columns: Vec<&[f64]> = columns.collect();
    if n == 0 || columns.is_empty() {
        return 0;
    }
    let x = DMatrix::<f64>::from_fn(n, columns.len(), |i, j| columns[j][i]);
    let singular_values = x.svd(false, false).singular_values;
    let tol = RANK_RTOL * singular_values.max();
    singular_values.iter().filter(|&&s| s > tol).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Column layout (intercept, log_price first) and dummy naming.
    // - Reference levels taken from the rows actually present.
    // - Dropping of constant non-price regressors.
    // - Dropping of non-price regressors collinear with earlier ones, while
    //   a regressor collinear with log-price is kept.
    // - Numeric and categorical control encoding.
    // -------------------------------------------------------------------------

    fn row(month: u32, price: f64, promo: bool, controls: Vec<ControlValue>) -> FeatureRow {
        FeatureRow {
            week: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
            price,
            log_quantity: 1.0 / price,
            log_price: price.ln(),
            promo_flag: promo,
            month,
            controls,
        }
    }

    #[test]
    // Purpose
    // -------
    // Months are one-hot encoded against the smallest month present and
    // the intercept/log-price columns stay in front.
    //
    // Given
    // -----
    // - Rows in months 3, 5, 5, 9 with a varying promo flag.
    //
    // Expect
    // ------
    // - Columns: intercept, log_price, promo_flag, month[T.5], month[T.9].
    fn build_design_encodes_months_against_observed_reference() {
        // Arrange
        let data = vec![
            row(3, 10.0, false, vec![]),
            row(5, 9.0, true, vec![]),
            row(5, 11.0, false, vec![]),
            row(9, 10.5, false, vec![]),
        ];
        let rows: Vec<&FeatureRow> = data.iter().collect();

        // Act
        let design = build_design(&rows, &[]);

        // Assert
        assert_eq!(
            design.columns,
            vec!["intercept", "log_price", "promo_flag", "month[T.5]", "month[T.9]"]
        );
        assert!(design.dropped.is_empty());
        assert_eq!(design.matrix.dim(), (4, 5));
        assert_eq!(design.matrix[[1, 3]], 1.0);
        assert_eq!(design.matrix[[3, 4]], 1.0);
        assert_eq!(design.matrix[[0, 3]] + design.matrix[[0, 4]], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // A promo flag that never varies is dropped rather than left to make
    // the design singular.
    //
    // Given
    // -----
    // - Three rows in one month, none flagged as promo.
    //
    // Expect
    // ------
    // - Columns: intercept, log_price; dropped: promo_flag.
    fn build_design_drops_constant_promo_flag() {
        // Arrange
        let data = vec![row(1, 10.0, false, vec![]), row(1, 9.0, false, vec![]), row(1, 8.0, false, vec![])];
        let rows: Vec<&FeatureRow> = data.iter().collect();

        // Act
        let design = build_design(&rows, &[]);

        // Assert
        assert_eq!(design.columns, vec!["intercept", "log_price"]);
        assert_eq!(design.dropped, vec!["promo_flag"]);
    }

    #[test]
    // Purpose
    // -------
    // Numeric controls become one column; categorical controls become
    // dummies against their smallest level.
    //
    // Given
    // -----
    // - Four rows with a numeric control "temp" and a categorical control
    //   "channel" with levels {retail, web}.
    //
    // Expect
    // ------
    // - Columns end with "temp", "channel[T.web]".
    fn build_design_encodes_controls() {
        // Arrange
        let data = vec![
            row(1, 10.0, true, vec![ControlValue::Numeric(20.0), ControlValue::Category("web".into())]),
            row(1, 9.0, false, vec![ControlValue::Numeric(22.0), ControlValue::Category("retail".into())]),
            row(1, 8.0, false, vec![ControlValue::Numeric(19.0), ControlValue::Category("web".into())]),
            row(1, 8.5, false, vec![ControlValue::Numeric(21.0), ControlValue::Category("retail".into())]),
        ];
        let rows: Vec<&FeatureRow> = data.iter().collect();
        let names = vec!["temp".to_string(), "channel".to_string()];

        // Act
        let design = build_design(&rows, &names);

        // Assert
        assert_eq!(
            design.columns,
            vec!["intercept", "log_price", "promo_flag", "temp", "channel[T.web]"]
        );
        assert_eq!(design.matrix[[0, 4]], 1.0);
        assert_eq!(design.matrix[[1, 4]], 0.0);
        assert_eq!(design.matrix[[1, 3]], 22.0);
    }

    #[test]
    // Purpose
    // -------
    // A promo flag set in exactly the weeks of one month duplicates that
    // month's dummy; the later, redundant column is dropped instead of
    // making the design singular.
    //
    // Given
    // -----
    // - Rows in months 1 and 2, promo only (and always) in month 2, with
    //   price varying inside each month.
    //
    // Expect
    // ------
    // - Columns: intercept, log_price, promo_flag; dropped: month[T.2].
    fn build_design_drops_dummy_collinear_with_promo() {
        // Arrange
        let data = vec![
            row(1, 10.0, false, vec![]),
            row(1, 11.0, false, vec![]),
            row(2, 8.0, true, vec![]),
            row(2, 8.5, true, vec![]),
        ];
        let rows: Vec<&FeatureRow> = data.iter().collect();

        // Act
        let design = build_design(&rows, &[]);

        // Assert
        assert_eq!(design.columns, vec!["intercept", "log_price", "promo_flag"]);
        assert_eq!(design.dropped, vec!["month[T.2]"]);
        assert_eq!(design.matrix.dim(), (4, 3));
    }

    #[test]
    // Purpose
    // -------
    // A regressor collinear with log-price is not dropped, so the loss of
    // identification is left for the fit to report.
    //
    // Given
    // -----
    // - A numeric control equal to 2·log_price in one month.
    //
    // Expect
    // ------
    // - The control stays in the design.
    fn build_design_keeps_control_collinear_with_price() {
        // Arrange
        let data: Vec<FeatureRow> = [10.0, 9.0, 8.0]
            .iter()
            .map(|&p: &f64| row(1, p, false, vec![ControlValue::Numeric(2.0 * p.ln())]))
            .collect();
        let rows: Vec<&FeatureRow> = data.iter().collect();
        let names = vec!["shadow".to_string()];

        // Act
        let design = build_design(&rows, &names);

        // Assert
        assert_eq!(design.columns, vec!["intercept", "log_price", "shadow"]);
        assert_eq!(design.dropped, vec!["promo_flag"]);
    }
}
