//! Polynomials and least-squares polynomial regression.

use serde::Serialize;

use crate::error::{ForecastError, Result};

/// A real polynomial with coefficients stored highest degree first.
///
/// `[a, b, c]` represents `a*x^2 + b*x + c`.
///
/// # Examples
///
/// ```
/// use nb_power_forecast::model::polynomial::Polynomial;
///
/// let p = Polynomial::new(vec![2.0, 0.0, 1.0]);
/// assert_eq!(p.evaluate(3.0), 19.0);
/// assert_eq!(p.degree(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Creates a polynomial from coefficients, highest degree first.
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Evaluates the polynomial at `x` using Horner's scheme.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .fold(0.0, |acc, &c| acc.mul_add(x, c))
    }

    /// Nominal degree (number of coefficients minus one).
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

/// Fit-quality diagnostics reported alongside every least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitDiagnostics {
    /// Root-mean-square residual over the fitted observations.
    pub residual_rms: f64,
    /// Ratio of the largest to smallest `|R_jj|` of the column-normalised QR factor.
    pub condition_estimate: f64,
}

/// Result of a least-squares polynomial fit.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit {
    pub polynomial: Polynomial,
    pub diagnostics: FitDiagnostics,
}

/// Fits a polynomial of `degree` to `(xs, ys)` by ordinary least squares.
///
/// Solves the Vandermonde system with Householder QR after normalising each
/// column to unit length, then rescales the solution back to the original
/// basis.
///
/// # Arguments
///
/// * `xs` - Independent variable values
/// * `ys` - Observations, same length as `xs`
/// * `degree` - Polynomial degree (`degree + 1` coefficients)
///
/// # Errors
///
/// Returns `FitFailure` if the inputs differ in length or contain non-finite
/// values, if there are fewer observations than coefficients, if the design
/// matrix is numerically rank-deficient, or if the solution is not finite.
pub fn fit_polynomial(xs: &[f64], ys: &[f64], degree: usize) -> Result<PolynomialFit> {
    let n = xs.len();
    let k = degree + 1;

    if ys.len() != n {
        return Err(ForecastError::FitFailure(format!(
            "{n} x values but {} y values",
            ys.len()
        )));
    }
    if n < k {
        return Err(ForecastError::FitFailure(format!(
            "degree {degree} needs at least {k} observations, got {n}"
        )));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(ForecastError::FitFailure(
            "non-finite value in fit input".to_string(),
        ));
    }

    // Row-major n x k Vandermonde matrix, highest power in column 0.
    let mut a: Vec<Vec<f64>> = xs
        .iter()
        .map(|&x| (0..k).map(|j| x.powi((degree - j) as i32)).collect())
        .collect();

    let mut scales = vec![1.0; k];
    for (j, scale) in scales.iter_mut().enumerate() {
        let norm = a.iter().map(|row| row[j] * row[j]).sum::<f64>().sqrt();
        if norm > 0.0 {
            *scale = norm;
            for row in &mut a {
                row[j] /= norm;
            }
        }
    }

    let mut b = ys.to_vec();
    householder_qr_in_place(&mut a, &mut b, k);

    let diag: Vec<f64> = (0..k).map(|j| a[j][j].abs()).collect();
    let max_diag = diag.iter().copied().fold(0.0, f64::max);
    let min_diag = diag.iter().copied().fold(f64::INFINITY, f64::min);
    let rcond = n as f64 * f64::EPSILON;
    if max_diag == 0.0 || min_diag <= rcond * max_diag {
        return Err(ForecastError::FitFailure(format!(
            "design matrix is rank-deficient for degree {degree} on {n} points"
        )));
    }

    // Back substitution on the upper-triangular R.
    let mut solution = vec![0.0; k];
    for j in (0..k).rev() {
        let tail: f64 = ((j + 1)..k).map(|l| a[j][l] * solution[l]).sum();
        solution[j] = (b[j] - tail) / a[j][j];
    }

    let coefficients: Vec<f64> = solution
        .iter()
        .zip(&scales)
        .map(|(c, s)| c / s)
        .collect();
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(ForecastError::FitFailure(
            "solve produced non-finite coefficients".to_string(),
        ));
    }

    let residual_ss: f64 = b[k..].iter().map(|r| r * r).sum();
    Ok(PolynomialFit {
        polynomial: Polynomial::new(coefficients),
        diagnostics: FitDiagnostics {
            residual_rms: (residual_ss / n as f64).sqrt(),
            condition_estimate: max_diag / min_diag,
        },
    })
}

/// Reduces the first `k` columns of `a` to upper-triangular form, applying
/// the same reflections to `b` (which then holds `Q^T b`).
fn householder_qr_in_place(a: &mut [Vec<f64>], b: &mut [f64], k: usize) {
    let n = a.len();
    let mut v = vec![0.0; n];

    for j in 0..k {
        let norm = (j..n).map(|i| a[i][j] * a[i][j]).sum::<f64>().sqrt();
        if norm == 0.0 {
            continue;
        }
        let alpha = if a[j][j] > 0.0 { -norm } else { norm };

        for i in j..n {
            v[i] = a[i][j];
        }
        v[j] -= alpha;
        let v_norm_sq: f64 = (j..n).map(|i| v[i] * v[i]).sum();
        if v_norm_sq == 0.0 {
            continue;
        }

        for col in j..k {
            let dot: f64 = (j..n).map(|i| v[i] * a[i][col]).sum();
            let factor = 2.0 * dot / v_norm_sq;
            for i in j..n {
                a[i][col] -= factor * v[i];
            }
        }

        let dot: f64 = (j..n).map(|i| v[i] * b[i]).sum();
        let factor = 2.0 * dot / v_norm_sq;
        for i in j..n {
            b[i] -= factor * v[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn evaluate_uses_highest_degree_first() {
        let p = Polynomial::new(vec![1.0, -2.0, 3.0]);
        assert_relative_eq!(p.evaluate(2.0), 3.0, epsilon = 1e-12);
        assert_relative_eq!(p.evaluate(0.0), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_polynomial_is_zero() {
        let p = Polynomial::new(Vec::new());
        assert_eq!(p.evaluate(5.0), 0.0);
        assert_eq!(p.degree(), 0);
    }

    #[test]
    fn linear_fit_recovers_exact_line() {
        let fit = fit_polynomial(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0], 1);
        let fit = fit.ok();
        let coeffs = fit
            .as_ref()
            .map(|f| f.polynomial.coefficients().to_vec())
            .unwrap_or_default();
        assert_eq!(coeffs.len(), 2);
        assert_relative_eq!(coeffs[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(coeffs[1], 1.0, epsilon = 1e-10);
        let rms = fit.map_or(f64::NAN, |f| f.diagnostics.residual_rms);
        assert!(rms < 1e-10);
    }

    #[test]
    fn degree_ten_fit_reproduces_quadratic() {
        let xs: Vec<f64> = (0..12).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 50.0 + 3.0 * x - 0.5 * x * x).collect();
        let fit = fit_polynomial(&xs, &ys, 10);
        assert!(fit.is_ok(), "fit should succeed: {:?}", fit.err());
        if let Ok(fit) = fit {
            for (x, y) in xs.iter().zip(&ys) {
                assert_relative_eq!(fit.polynomial.evaluate(*x), *y, epsilon = 1e-6);
            }
            assert!(fit.diagnostics.condition_estimate.is_finite());
            assert!(fit.diagnostics.condition_estimate >= 1.0);
        }
    }

    #[test]
    fn least_squares_line_through_noisy_points() {
        // Sxy = 4, Sxx = 5 around the mean (1.5, 1.5).
        let fit = fit_polynomial(&[0.0, 1.0, 2.0, 3.0], &[0.5, 0.5, 2.5, 2.5], 1);
        let coeffs = fit
            .map(|f| f.polynomial.coefficients().to_vec())
            .unwrap_or_default();
        assert_relative_eq!(coeffs[0], 0.8, epsilon = 1e-10);
        assert_relative_eq!(coeffs[1], 0.3, epsilon = 1e-10);
    }

    #[test]
    fn too_few_points_is_fit_failure() {
        let err = fit_polynomial(&[0.0], &[1.0], 1);
        assert!(matches!(err, Err(ForecastError::FitFailure(_))));
    }

    #[test]
    fn repeated_x_is_rank_deficient() {
        let err = fit_polynomial(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0], 1);
        assert!(matches!(err, Err(ForecastError::FitFailure(_))));
    }

    #[test]
    fn non_finite_input_is_fit_failure() {
        let err = fit_polynomial(&[0.0, 1.0, 2.0], &[1.0, f64::NAN, 3.0], 1);
        assert!(matches!(err, Err(ForecastError::FitFailure(_))));
    }

    #[test]
    fn mismatched_lengths_is_fit_failure() {
        let err = fit_polynomial(&[0.0, 1.0, 2.0], &[1.0, 2.0], 1);
        assert!(matches!(err, Err(ForecastError::FitFailure(_))));
    }
}
