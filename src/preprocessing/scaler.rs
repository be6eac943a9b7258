//! Feature scaling

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, PipelineError, Result};

/// Fitted per-column statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Standard scaling: `(x - mean) / std`, or `x / std` without centering.
///
/// Uses the population standard deviation. Columns with zero variance keep a
/// scale of 1.0 so they pass through unchanged (apart from centering).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    with_mean: bool,
    params: Option<ScalerParams>,
}

impl StandardScaler {
    pub fn new(with_mean: bool) -> Self {
        Self {
            with_mean,
            params: None,
        }
    }

    pub fn with_mean(&self) -> bool {
        self.with_mean
    }

    pub fn params(&self) -> Option<&ScalerParams> {
        self.params.as_ref()
    }

    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let n = x.nrows();
        if n == 0 {
            return Err(PipelineError::new(ErrorKind::EmptyInput(
                "StandardScaler needs at least one row".to_string(),
            )));
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| ErrorKind::EmptyInput("no rows to scale".to_string()))?;
        let scale = x
            .axis_iter(Axis(1))
            .zip(mean.iter())
            .map(|(col, &m)| {
                let var = col.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n as f64;
                let std = var.sqrt();
                if std <= 10.0 * f64::EPSILON * m.abs().max(1.0) {
                    1.0
                } else {
                    std
                }
            })
            .collect();

        self.params = Some(ScalerParams {
            mean: mean.to_vec(),
            scale,
        });
        Ok(self)
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let params = self
            .params
            .as_ref()
            .ok_or(ErrorKind::NotFitted("StandardScaler"))?;
        if x.ncols() != params.scale.len() {
            return Err(PipelineError::new(ErrorKind::Shape {
                expected: format!("{} columns", params.scale.len()),
                actual: format!("{} columns", x.ncols()),
            }));
        }

        let mut out = x.clone();
        for (j, mut col) in out.axis_iter_mut(Axis(1)).enumerate() {
            let center = if self.with_mean { params.mean[j] } else { 0.0 };
            let scale = params.scale[j];
            col.mapv_inplace(|v| (v - center) / scale);
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}
