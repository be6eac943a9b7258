use ndarray::Array1;
use serde::Serialize;

use crate::error::{ErrorKind, PipelineError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub r_squared: f64,
    pub mae: f64,
    pub rmse: f64,
}

impl RegressionMetrics {
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        Ok(Self {
            r_squared: r2_score(y_true, y_pred)?,
            mae: mean_absolute_error(y_true, y_pred)?,
            rmse: root_mean_squared_error(y_true, y_pred)?,
        })
    }
}

fn check_lengths(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(PipelineError::new(ErrorKind::Shape {
            expected: format!("{} predictions", y_true.len()),
            actual: format!("{} predictions", y_pred.len()),
        }));
    }
    if y_true.is_empty() {
        return Err(PipelineError::new(ErrorKind::EmptyInput(
            "no samples to score".to_string(),
        )));
    }
    Ok(())
}

/// Coefficient of determination.
///
/// A constant `y_true` scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    if y_true.len() < 2 {
        return Err(PipelineError::new(ErrorKind::EmptyInput(
            "R² needs at least two samples".to_string(),
        )));
    }

    let mean = y_true.mean().unwrap_or(0.0);
    let ss_res = (y_true - y_pred).mapv(|v| v * v).sum();
    let ss_tot = y_true.mapv(|v| (v - mean) * (v - mean)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

pub fn mean_absolute_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    Ok((y_true - y_pred).mapv(f64::abs).mean().unwrap_or(0.0))
}

pub fn root_mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    Ok((y_true - y_pred).mapv(|v| v * v).mean().unwrap_or(0.0).sqrt())
}
