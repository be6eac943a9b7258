use ndarray::{Array1, Array2};

use crate::config::ModelParams;
use crate::error::{ErrorKind, PipelineError, Result};

/// A regression model trained in place and queried afterwards.
pub trait Regressor {
    fn name(&self) -> &'static str;
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

pub trait ModelFactory {
    type ModelType: Regressor;

    fn create(params: &ModelParams) -> Result<Self::ModelType>;
}

/// Rejects empty training sets and row-count mismatches between `x` and `y`.
pub fn check_fit_input(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(PipelineError::new(ErrorKind::Shape {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        }));
    }
    if x.nrows() == 0 {
        return Err(PipelineError::new(ErrorKind::EmptyInput(
            "no training rows".to_string(),
        )));
    }
    Ok(())
}

pub fn check_n_features(expected: usize, x: &Array2<f64>) -> Result<()> {
    if x.ncols() != expected {
        return Err(PipelineError::new(ErrorKind::Shape {
            expected: format!("{expected} features"),
            actual: format!("{} features", x.ncols()),
        }));
    }
    Ok(())
}
