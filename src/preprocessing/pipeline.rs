//! The two processing chains routed by [`ColumnTransformer`](super::ColumnTransformer).

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::encoder::{OneHotEncoder, UnknownPolicy};
use super::imputer::{CategoricalImputer, ImputeStrategy, NumericImputer};
use super::scaler::StandardScaler;
use crate::error::Result;

fn to_matrix(columns: &[Vec<f64>]) -> Array2<f64> {
    let n_rows = columns.first().map_or(0, Vec::len);
    Array2::from_shape_fn((n_rows, columns.len()), |(i, j)| columns[j][i])
}

/// imputer → standard scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericPipeline {
    pub imputer: NumericImputer,
    pub scaler: StandardScaler,
}

impl NumericPipeline {
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            imputer: NumericImputer::new(strategy),
            scaler: StandardScaler::new(true),
        }
    }

    pub fn fit_transform(
        &mut self,
        names: &[String],
        columns: &[Vec<Option<f64>>],
    ) -> Result<Array2<f64>> {
        let imputed = self.imputer.fit_transform(names, columns)?;
        self.scaler.fit_transform(&to_matrix(&imputed))
    }

    pub fn transform(&self, columns: &[Vec<Option<f64>>]) -> Result<Array2<f64>> {
        let imputed = self.imputer.transform(columns)?;
        self.scaler.transform(&to_matrix(&imputed))
    }
}

/// imputer → one-hot encoder → scaler without centering
///
/// Indicator columns are only divided by their standard deviation; centering
/// them would destroy their sparsity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalPipeline {
    pub imputer: CategoricalImputer,
    pub encoder: OneHotEncoder,
    pub scaler: StandardScaler,
}

impl CategoricalPipeline {
    pub fn new(strategy: ImputeStrategy, handle_unknown: UnknownPolicy) -> Result<Self> {
        Ok(Self {
            imputer: CategoricalImputer::new(strategy)?,
            encoder: OneHotEncoder::new(handle_unknown),
            scaler: StandardScaler::new(false),
        })
    }

    pub fn fit_transform(
        &mut self,
        names: &[String],
        columns: &[Vec<Option<String>>],
    ) -> Result<Array2<f64>> {
        let imputed = self.imputer.fit_transform(names, columns)?;
        let encoded = self.encoder.fit_transform(names, &imputed)?;
        self.scaler.fit_transform(&encoded)
    }

    pub fn transform(&self, columns: &[Vec<Option<String>>]) -> Result<Array2<f64>> {
        let imputed = self.imputer.transform(columns)?;
        let encoded = self.encoder.transform(&imputed)?;
        self.scaler.transform(&encoded)
    }
}
