use super::traits::{check_fit_input, check_n_features, ModelFactory, Regressor};
use crate::config::ModelParams;
use crate::error::{ErrorKind, PipelineError, Result};
use gbdt::{config::Config as GBDTConfig, decision_tree::{Data, DataVec}, gradient_boost::GBDT};
use ndarray::{Array1, Array2};

/// Gradient boosted regression trees with squared-error loss.
pub struct GradientBoostingRegressor {
    model: Option<GBDT>,
    n_features: usize,
    iterations: usize,
    max_depth: u32,
    shrinkage: f32,
}

impl GradientBoostingRegressor {
    pub fn new(iterations: usize, max_depth: u32, learning_rate: f64) -> Result<Self> {
        if iterations == 0 || max_depth == 0 || !(learning_rate > 0.0) {
            return Err(PipelineError::new(ErrorKind::InvalidParameter {
                name: "gradient boosting".to_string(),
                value: format!(
                    "iterations={iterations}, max_depth={max_depth}, learning_rate={learning_rate}"
                ),
                reason: "all must be positive".to_string(),
            }));
        }
        Ok(Self {
            model: None,
            n_features: 0,
            iterations,
            max_depth,
            shrinkage: learning_rate as f32,
        })
    }

    fn config(&self, n_features: usize) -> GBDTConfig {
        let mut config = GBDTConfig::new();
        config.set_feature_size(n_features);
        config.set_iterations(self.iterations);
        config.set_max_depth(self.max_depth);
        config.set_shrinkage(self.shrinkage);
        config.set_loss("SquaredError");
        config.set_debug(false);
        config.set_data_sample_ratio(1.0);
        config.set_feature_sample_ratio(1.0);
        config.set_training_optimization_level(2);
        config
    }
}

fn rows_to_datavec(x: &Array2<f64>, y: Option<&Array1<f64>>) -> DataVec {
    x.rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let feature: Vec<f32> = row.iter().map(|&v| v as f32).collect();
            match y {
                Some(y) => Data::new_training_data(feature, 1.0, y[i] as f32, None),
                None => Data::new_test_data(feature, None),
            }
        })
        .collect()
}

impl Regressor for GradientBoostingRegressor {
    fn name(&self) -> &'static str {
        "GradientBoostingRegressor"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_fit_input(x, y)?;
        if x.ncols() == 0 {
            return Err(PipelineError::new(ErrorKind::Model(
                "gradient boosting needs at least one feature".to_string(),
            )));
        }

        let mut train_data = rows_to_datavec(x, Some(y));
        let mut gbdt = GBDT::new(&self.config(x.ncols()));
        gbdt.fit(&mut train_data);

        self.model = Some(gbdt);
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or(ErrorKind::NotFitted("GradientBoostingRegressor"))?;
        check_n_features(self.n_features, x)?;

        let test_data = rows_to_datavec(x, None);
        let predictions = model.predict(&test_data);
        Ok(predictions.into_iter().map(f64::from).collect())
    }
}

impl ModelFactory for GradientBoostingRegressor {
    type ModelType = Self;

    fn create(params: &ModelParams) -> Result<Self> {
        Self::new(params.iterations, params.max_depth, params.learning_rate)
    }
}
