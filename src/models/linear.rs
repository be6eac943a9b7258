//! Ordinary least squares and ridge regression

use ndarray::{Array1, Array2, Axis};

use super::traits::{check_fit_input, check_n_features, ModelFactory, Regressor};
use crate::config::ModelParams;
use crate::error::{ErrorKind, PipelineError, Result};

/// Solve the symmetric positive-definite system `a · x = b` by Cholesky
/// decomposition. Returns `None` when a pivot falls below `tol`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>, tol: f64) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= tol {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L · y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Lᵀ · x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Solves the normal equations, adding growing diagonal jitter when the
/// system is singular (collinear one-hot blocks, fewer rows than features).
fn solve_normal_equations(xtx: &Array2<f64>, xty: &Array1<f64>) -> Result<Array1<f64>> {
    let n = xtx.nrows();
    if n == 0 {
        return Ok(Array1::zeros(0));
    }
    let max_diag = xtx.diag().iter().cloned().fold(0.0_f64, f64::max);
    let base = if max_diag > 0.0 { max_diag } else { 1.0 };
    let tol = 1e-12 * base;

    if let Some(w) = cholesky_solve(xtx, xty, tol) {
        return Ok(w);
    }
    for jitter in [1e-10, 1e-8, 1e-6, 1e-4] {
        let mut reg = xtx.clone();
        reg.diag_mut().mapv_inplace(|d| d + jitter * base);
        if let Some(w) = cholesky_solve(&reg, xty, tol) {
            return Ok(w);
        }
    }
    Err(PipelineError::new(ErrorKind::Model(
        "normal equations are singular".to_string(),
    )))
}

/// Linear regression with intercept; `alpha > 0` adds an L2 penalty.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    alpha: f64,
    coefficients: Option<Array1<f64>>,
    intercept: f64,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ridge(alpha: f64) -> Self {
        Self {
            alpha,
            ..Self::default()
        }
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for LinearRegression {
    fn name(&self) -> &'static str {
        if self.alpha > 0.0 {
            "Ridge"
        } else {
            "LinearRegression"
        }
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_fit_input(x, y)?;

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| ErrorKind::EmptyInput("no training rows".to_string()))?;
        let y_mean = y.mean().unwrap_or(0.0);
        let x_centered = x - &x_mean.view().insert_axis(Axis(0));
        let y_centered = y - y_mean;

        let mut xtx = x_centered.t().dot(&x_centered);
        if self.alpha > 0.0 {
            xtx.diag_mut().mapv_inplace(|d| d + self.alpha);
        }
        let xty = x_centered.t().dot(&y_centered);
        let coefficients = solve_normal_equations(&xtx, &xty)?;

        self.intercept = y_mean - coefficients.dot(&x_mean);
        self.coefficients = Some(coefficients);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(ErrorKind::NotFitted("LinearRegression"))?;
        check_n_features(coefficients.len(), x)?;
        Ok(x.dot(coefficients) + self.intercept)
    }
}

/// Plain OLS.
pub struct LinearRegressionFactory;

impl ModelFactory for LinearRegressionFactory {
    type ModelType = LinearRegression;

    fn create(_params: &ModelParams) -> Result<LinearRegression> {
        Ok(LinearRegression::new())
    }
}

pub struct RidgeFactory;

impl ModelFactory for RidgeFactory {
    type ModelType = LinearRegression;

    fn create(params: &ModelParams) -> Result<LinearRegression> {
        if !(params.ridge_alpha >= 0.0) {
            return Err(PipelineError::new(ErrorKind::InvalidParameter {
                name: "ridge_alpha".to_string(),
                value: params.ridge_alpha.to_string(),
                reason: "must be non-negative".to_string(),
            }));
        }
        Ok(LinearRegression::ridge(params.ridge_alpha))
    }
}
