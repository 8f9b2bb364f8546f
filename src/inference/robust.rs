//! inference::robust — classical and heteroskedasticity-robust OLS covariance.
//!
//! Purpose
//! -------
//! Build the `p×p` covariance matrix of OLS coefficients from the design
//! matrix, the fitted residuals, and the "bread" `(XᵀX)⁻¹`. The robust
//! estimators have the sandwich form
//!
//! ```text
//! V  =  (XᵀX)⁻¹ · ( Σ_i ω_i x_i x_iᵀ ) · (XᵀX)⁻¹,
//! ```
//!
//! with per-observation weights `ω_i` determined by [`CovarianceType`]:
//!
//! - `HC0`: `ω_i = e_i²`
//! - `HC1`: `ω_i = e_i² · n/(n − p)`
//! - `HC2`: `ω_i = e_i² / (1 − h_ii)`
//! - `HC3`: `ω_i = e_i² / (1 − h_ii)²`
//!
//! where `h_ii = x_iᵀ (XᵀX)⁻¹ x_i` is the leverage of observation `i`.
//! `Classical` returns `σ̂² (XᵀX)⁻¹` with `σ̂² = eᵀe / (n − p)`.
//!
//! Key behaviors
//! -------------
//! - [`coefficient_covariance`] returns a symmetric covariance matrix for the
//!   requested estimator.
//! - [`standard_errors`] extracts `sqrt(diag(V))`.
//! - [`leverages`] exposes the hat-matrix diagonal used by HC2/HC3.
//!
//! Invariants & assumptions
//! ------------------------
//! - `design` is `n×p`, `residuals` has length `n`, `bread` is `p×p`; any
//!   mismatch is reported as [`InferenceError::DimensionMismatch`].
//! - `bread` is the (pseudo-)inverse of `XᵀX` for the same design, i.e. the
//!   design has full column rank.
//! - HC2/HC3 fail with [`InferenceError::LeverageOne`] when some
//!   `1 − h_ii` is below [`LEVERAGE_TOL`] instead of returning infinities.
//!
//! Conventions
//! -----------
//! - Rows index observations, columns index regressors in design order.
//! - All functions are pure: no logging and no global state.
//!
//! Testing notes
//! -------------
//! - Unit tests check symmetry, the HC0 ≤ HC2 ≤ HC3 ordering on the diagonal,
//!   the classical formula on a hand-computable regression, the HC1 scaling,
//!   and the leverage-one failure path.
use crate::inference::errors::{InferenceError, InferenceResult};
use ndarray::{Array1, Array2, Axis};

/// Observations with `1 − h_ii` below this threshold are treated as having
/// unit leverage.
pub const LEVERAGE_TOL: f64 = 1e-10;

/// Coefficient covariance estimator.
///
/// - `Classical`: homoskedastic `σ̂² (XᵀX)⁻¹`.
/// - `HC0`: White's heteroskedasticity-consistent estimator.
/// - `HC1`: HC0 with the `n/(n − p)` degrees-of-freedom correction.
/// - `HC2`: residuals rescaled by `1/(1 − h_ii)`.
/// - `HC3`: residuals rescaled by `1/(1 − h_ii)²` (jackknife-like; the default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CovarianceType {
    Classical,
    HC0,
    HC1,
    HC2,
    #[default]
    HC3,
}

impl CovarianceType {
    /// Short label, e.g. `"HC3"`.
    pub fn label(&self) -> &'static str {
        match self {
            CovarianceType::Classical => "nonrobust",
            CovarianceType::HC0 => "HC0",
            CovarianceType::HC1 => "HC1",
            CovarianceType::HC2 => "HC2",
            CovarianceType::HC3 => "HC3",
        }
    }

    /// Whether this is a heteroskedasticity-consistent (sandwich) estimator.
    pub fn is_robust(&self) -> bool {
        !matches!(self, CovarianceType::Classical)
    }
}

/// Build the `p×p` covariance matrix of OLS coefficients.
///
/// Parameters
/// ----------
/// - `cov_type`: [`CovarianceType`]
///   Estimator to use.
/// - `design`: `&Array2<f64>`
///   `n×p` design matrix `X` (rows = observations).
/// - `residuals`: `&Array1<f64>`
///   Length-`n` OLS residuals `e = y − Xβ̂`.
/// - `bread`: `&Array2<f64>`
///   `p×p` matrix `(XᵀX)⁻¹`.
///
/// Returns
/// -------
/// `InferenceResult<Array2<f64>>`
///   Symmetric `p×p` covariance matrix.
///
/// Errors
/// ------
/// - `InferenceError::DimensionMismatch` when shapes are inconsistent.
/// - `InferenceError::NoResidualDegreesOfFreedom` for `Classical`/`HC1`
///   when `n <= p`.
/// - `InferenceError::LeverageOne` for `HC2`/`HC3` when an observation has
///   leverage numerically equal to one.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use price_elasticity::inference::robust::{CovarianceType, coefficient_covariance};
/// // Intercept-only model: bread = 1/n.
/// let x = array![[1.0], [1.0], [1.0], [1.0]];
/// let e = array![1.0, -1.0, 2.0, -2.0];
/// let bread = array![[0.25]];
/// let v = coefficient_covariance(CovarianceType::HC0, &x, &e, &bread).unwrap();
/// assert!((v[[0, 0]] - 10.0 / 16.0).abs() < 1e-12);
/// ```
pub fn coefficient_covariance(
    cov_type: CovarianceType, design: &Array2<f64>, residuals: &Array1<f64>,
    bread: &Array2<f64>,
) -> InferenceResult<Array2<f64>> {
    check_dimensions(design, residuals, bread)?;
    let (n, p) = design.dim();

    let weights: Array1<f64> = match cov_type {
        CovarianceType::Classical => {
            let dof = residual_dof(n, p)?;
            let sigma2 = residuals.dot(residuals) / dof;
            return Ok(symmetrize(bread * sigma2));
        }
        CovarianceType::HC0 => residuals.mapv(|e| e * e),
        CovarianceType::HC1 => {
            let dof = residual_dof(n, p)?;
            let scale = n as f64 / dof;
            residuals.mapv(|e| e * e * scale)
        }
        CovarianceType::HC2 | CovarianceType::HC3 => {
            let power = if cov_type == CovarianceType::HC2 { 1 } else { 2 };
            let h = leverages(design, bread);
            let mut w = Array1::<f64>::zeros(n);
            for (row, (&e, &h_ii)) in residuals.iter().zip(h.iter()).enumerate() {
                let one_minus_h = 1.0 - h_ii;
                if one_minus_h < LEVERAGE_TOL {
                    return Err(InferenceError::LeverageOne { row, leverage: h_ii });
                }
                w[row] = e * e / one_minus_h.powi(power);
            }
            w
        }
    };

    // meat = Xᵀ diag(ω) X, formed without materializing diag(ω)
    let weighted = design * &weights.insert_axis(Axis(1));
    let meat = design.t().dot(&weighted);
    Ok(symmetrize(bread.dot(&meat).dot(bread)))
}

/// Leverages `h_ii = x_iᵀ (XᵀX)⁻¹ x_i` for each row of `design`.
pub fn leverages(design: &Array2<f64>, bread: &Array2<f64>) -> Array1<f64> {
    let projected = design.dot(bread);
    (&projected * design).sum_axis(Axis(1))
}

/// Standard errors `sqrt(diag(V))`.
///
/// Tiny negative diagonal entries produced by round-off are clamped to zero.
pub fn standard_errors(covariance: &Array2<f64>) -> Array1<f64> {
    covariance.diag().mapv(|v| v.max(0.0).sqrt())
}

// ---- Helper methods ----

fn check_dimensions(
    design: &Array2<f64>, residuals: &Array1<f64>, bread: &Array2<f64>,
) -> InferenceResult<()> {
    let (n, p) = design.dim();
    if residuals.len() != n || bread.dim() != (p, p) {
        return Err(InferenceError::DimensionMismatch {
            design: (n, p),
            residuals: residuals.len(),
            bread: bread.dim(),
        });
    }
    Ok(())
}

fn residual_dof(n: usize, p: usize) -> InferenceResult<f64> {
    if n <= p {
        return Err(InferenceError::NoResidualDegreesOfFreedom { n, p });
    }
    Ok((n - p) as f64)
}

fn symmetrize(m: Array2<f64>) -> Array2<f64> {
    let mt = m.t().to_owned();
    (m + mt) * 0.5
}
