//! elasticity::ols — ordinary least squares via SVD.
//!
//! Purpose
//! -------
//! Fit `y = Xβ + ε` by least squares for the demand regression and expose
//! the pieces needed downstream: coefficients, residuals, the bread
//! `(XᵀX)⁻¹` for sandwich covariance, and R².
//!
//! Key behaviors
//! -------------
//! - Copy the `ndarray` design into a `nalgebra::DMatrix`, take its thin
//!   SVD, and check the numerical rank before solving.
//! - Rank-deficient or underdetermined designs fail with a [`FitFailure`]
//!   instead of returning a minimum-norm solution, so an unidentified
//!   elasticity is never reported as a number. Redundant non-price columns
//!   are removed earlier, when the design is built, so a rank deficiency
//!   here means log-price itself is not identified.
//! - `β̂ = X⁺y` and `(XᵀX)⁻¹ = X⁺(X⁺)ᵀ` come from the same pseudoinverse.
//!
//! Invariants & assumptions
//! ------------------------
//! - Singular values below `RANK_RTOL · σ_max` count as zero.
//! - On success every coefficient is finite.
use crate::elasticity::errors::FitFailure;
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Relative singular-value cutoff for the numerical rank.
pub const RANK_RTOL: f64 = 1e-10;

/// Result of a successful least-squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    pub coefficients: Array1<f64>,
    pub residuals: Array1<f64>,
    /// `(XᵀX)⁻¹`, `p×p`.
    pub bread: Array2<f64>,
    /// Centered R²; `None` when the response has no variation.
    pub r_squared: Option<f64>,
}

impl OlsFit {
    /// Residual degrees of freedom `n − p`.
    pub fn residual_dof(&self) -> usize {
        self.residuals.len().saturating_sub(self.coefficients.len())
    }
}

/// Fit OLS of `response` on `design`.
///
/// Errors
/// ------
/// - `FitFailure::Underdetermined` when `n < p`.
/// - `FitFailure::RankDeficient` when the numerical rank is below `p`.
/// - `FitFailure::Solver` when the pseudoinverse cannot be formed.
/// - `FitFailure::NonFiniteCoefficient` when the solution is not finite.
pub fn fit_ols(design: &Array2<f64>, response: &Array1<f64>) -> Result<OlsFit, FitFailure> {
    let (n, p) = design.dim();
    if n < p || p == 0 {
        return Err(FitFailure::Underdetermined { rows: n, columns: p });
    }

    let x = DMatrix::<f64>::from_fn(n, p, |i, j| design[[i, j]]);
    let svd = x.svd(true, true);
    let sigma_max = svd.singular_values.max();
    let tol = RANK_RTOL * sigma_max;
    let rank = svd.rank(tol);
    if rank < p {
        return Err(FitFailure::RankDeficient { rank, columns: p });
    }

    let pinv = svd.pseudo_inverse(tol).map_err(|reason| FitFailure::Solver { reason })?;
    let bread_nalg = &pinv * pinv.transpose();

    let coefficients: Array1<f64> =
        (0..p).map(|i| (0..n).map(|k| pinv[(i, k)] * response[k]).sum()).collect();
    if let Some((index, &value)) = coefficients.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(FitFailure::NonFiniteCoefficient { index, value });
    }

    let fitted = design.dot(&coefficients);
    let residuals = response - &fitted;
    let mean = response.sum() / n as f64;
    let sst: f64 = response.iter().map(|y| (y - mean).powi(2)).sum();
    let ssr = residuals.dot(&residuals);
    let r_squared = if sst > 0.0 { Some(1.0 - ssr / sst) } else { None };

    Ok(OlsFit {
        coefficients,
        residuals,
        bread: Array2::from_shape_fn((p, p), |(i, j)| bread_nalg[(i, j)]),
        r_squared,
    })
}
